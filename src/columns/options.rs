//! The configured set of standard and additional columns.

use std::collections::HashSet;

use crate::columns::{ColumnDescriptor, StandardColumn};
use crate::error::{Result, SinkError};
use crate::serialize::{LogEventPolicy, SerializationPolicy};
use crate::types::TypeMapper;

/// Which standard columns are stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ColumnSelection {
    /// Every standard column except the whole-event column.
    #[default]
    Default,
    All,
    /// Explicit set; stored in canonical order whatever order it is given in.
    Only(Vec<StandardColumn>),
}

impl ColumnSelection {
    pub fn contains(&self, kind: StandardColumn) -> bool {
        match self {
            ColumnSelection::Default => StandardColumn::DEFAULT_STORE.contains(&kind),
            ColumnSelection::All => true,
            ColumnSelection::Only(kinds) => kinds.contains(&kind),
        }
    }

    /// Selected kinds in canonical order.
    pub fn columns(&self) -> Vec<StandardColumn> {
        StandardColumn::ALL
            .into_iter()
            .filter(|kind| self.contains(*kind))
            .collect()
    }
}

/// Reference to the primary key column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrimaryKey {
    Standard(StandardColumn),
    /// Matched case-insensitively against active column names.
    Named(String),
}

/// Standard and additional column configuration for one log table.
///
/// Owns the type mapper. Invariants across columns (unique names, a
/// resolvable primary key) are checked when the table shape is resolved,
/// not on mutation.
#[derive(Debug, Clone)]
pub struct ColumnSetOptions<M: TypeMapper> {
    mapper: M,
    standard: Vec<ColumnDescriptor<M::DataType>>,
    store: ColumnSelection,
    level_store_as_enum: bool,

    pub primary_key: Option<PrimaryKey>,
    pub additional_columns: Vec<ColumnDescriptor<M::DataType>>,
    pub clustered_columnstore_index: bool,
    pub disable_triggers: bool,
    /// Project timestamps in UTC instead of the event's own offset.
    pub timestamp_convert_to_utc: bool,
    pub properties: SerializationPolicy,
    pub log_event: LogEventPolicy,
}

impl<M: TypeMapper + Default> Default for ColumnSetOptions<M> {
    fn default() -> Self {
        Self::new(M::default())
    }
}

impl<M: TypeMapper> ColumnSetOptions<M> {
    pub fn new(mapper: M) -> Self {
        let standard = StandardColumn::ALL
            .into_iter()
            .map(|kind| ColumnDescriptor::standard(&mapper, kind))
            .collect();

        Self {
            mapper,
            standard,
            store: ColumnSelection::Default,
            level_store_as_enum: false,
            primary_key: Some(PrimaryKey::Standard(StandardColumn::Id)),
            additional_columns: Vec::new(),
            clustered_columnstore_index: false,
            disable_triggers: false,
            timestamp_convert_to_utc: false,
            properties: SerializationPolicy::default(),
            log_event: LogEventPolicy::default(),
        }
    }

    pub fn mapper(&self) -> &M {
        &self.mapper
    }

    /// The descriptor for a standard column, whether stored or not.
    pub fn standard_column(&self, kind: StandardColumn) -> &ColumnDescriptor<M::DataType> {
        &self.standard[kind.index()]
    }

    pub fn standard_column_mut(
        &mut self,
        kind: StandardColumn,
    ) -> &mut ColumnDescriptor<M::DataType> {
        &mut self.standard[kind.index()]
    }

    /// Change a standard column's type within the kind's allowed list.
    pub fn set_standard_type(
        &mut self,
        kind: StandardColumn,
        data_type: M::DataType,
    ) -> Result<()> {
        self.standard[kind.index()].set_data_type(&self.mapper, data_type)?;
        self.sync_level_store_as_enum(kind);
        Ok(())
    }

    /// Change a standard column's type from a type name such as `"bigint"`.
    pub fn set_standard_type_name(&mut self, kind: StandardColumn, name: &str) -> Result<()> {
        self.standard[kind.index()].set_data_type_name(&self.mapper, name)?;
        self.sync_level_store_as_enum(kind);
        Ok(())
    }

    // A level column typed as the ordinal type stores the ordinal.
    fn sync_level_store_as_enum(&mut self, kind: StandardColumn) {
        if kind == StandardColumn::Level {
            self.level_store_as_enum =
                self.standard_column(kind).data_type() == self.mapper.level_ordinal_type();
        }
    }

    /// Add a user column. The type is validated by the mapper.
    pub fn add_column(
        &mut self,
        name: impl Into<String>,
        data_type: M::DataType,
    ) -> Result<&mut ColumnDescriptor<M::DataType>> {
        let column = ColumnDescriptor::new(&self.mapper, name, data_type)?;
        self.additional_columns.push(column);
        let last = self.additional_columns.len() - 1;
        Ok(&mut self.additional_columns[last])
    }

    pub fn store(&self) -> &ColumnSelection {
        &self.store
    }

    pub fn set_store(&mut self, store: ColumnSelection) {
        self.store = store;
    }

    pub fn is_stored(&self, kind: StandardColumn) -> bool {
        self.store.contains(kind)
    }

    /// Include a standard column. Its descriptor keeps any earlier customization.
    pub fn add_standard_column(&mut self, kind: StandardColumn) {
        if self.store.contains(kind) {
            return;
        }
        let mut kinds = self.store.columns();
        kinds.push(kind);
        self.store = ColumnSelection::Only(kinds);
    }

    /// Exclude a standard column without discarding its descriptor.
    pub fn remove_standard_column(&mut self, kind: StandardColumn) {
        if !self.store.contains(kind) {
            return;
        }
        let kinds = self
            .store
            .columns()
            .into_iter()
            .filter(|k| *k != kind)
            .collect();
        self.store = ColumnSelection::Only(kinds);
    }

    pub fn level_store_as_enum(&self) -> bool {
        self.level_store_as_enum
    }

    /// Store the level ordinal instead of its name, switching the column type.
    pub fn set_level_store_as_enum(&mut self, store_as_enum: bool) {
        self.level_store_as_enum = store_as_enum;
        let data_type = if store_as_enum {
            self.mapper.level_ordinal_type()
        } else {
            self.mapper.standard_shape(StandardColumn::Level).data_type
        };
        // Both candidates come from the mapper's own level table.
        self.standard[StandardColumn::Level.index()].set_data_type_unchecked(data_type);
    }

    /// Stored standard columns in canonical order, then additional columns
    /// in declaration order.
    pub fn active_columns(&self) -> Vec<&ColumnDescriptor<M::DataType>> {
        self.store
            .columns()
            .into_iter()
            .map(|kind| self.standard_column(kind))
            .chain(self.additional_columns.iter())
            .collect()
    }

    /// The primary key descriptor, if it references an active column.
    pub fn resolved_primary_key(&self) -> Option<&ColumnDescriptor<M::DataType>> {
        match self.primary_key.as_ref()? {
            PrimaryKey::Standard(kind) => {
                self.is_stored(*kind).then(|| self.standard_column(*kind))
            }
            PrimaryKey::Named(name) => self
                .active_columns()
                .into_iter()
                .find(|column| column.name().eq_ignore_ascii_case(name)),
        }
    }

    /// Check that every active column has a non-empty, unique name.
    pub fn validate_names(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for column in self.active_columns() {
            let name = column.name().trim();
            if name.is_empty() {
                return Err(SinkError::EmptyColumnName);
            }
            if !seen.insert(name.to_lowercase()) {
                return Err(SinkError::DuplicateColumnName(column.name().to_string()));
            }
        }
        Ok(())
    }
}
