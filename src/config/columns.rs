//! Column configuration types.

use serde::Deserialize;

use crate::columns::{ColumnSelection, ColumnSetOptions, PrimaryKey, StandardColumn};
use crate::error::Result;
use crate::serialize::{LogEventPolicy, SerializationPolicy};
use crate::types::TypeMapper;

/// Overrides shared by every standard column section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StandardColumnConfig {
    pub column_name: Option<String>,
    /// Type name, e.g. `"nvarchar"`.
    pub data_type: Option<String>,
    pub allow_null: Option<bool>,
    pub data_length: Option<i32>,
    pub non_clustered_index: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LevelColumnConfig {
    #[serde(flatten)]
    pub column: StandardColumnConfig,
    pub store_as_enum: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TimeStampColumnConfig {
    #[serde(flatten)]
    pub column: StandardColumnConfig,
    pub convert_to_utc: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PropertiesColumnConfig {
    #[serde(flatten)]
    pub column: StandardColumnConfig,
    #[serde(flatten)]
    pub policy: SerializationPolicy,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LogEventColumnConfig {
    #[serde(flatten)]
    pub column: StandardColumnConfig,
    #[serde(flatten)]
    pub policy: LogEventPolicy,
}

/// A user column mapped from the event property of the same name.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AdditionalColumnConfig {
    pub column_name: String,
    pub data_type: String,
    pub allow_null: bool,
    pub data_length: i32,
    pub non_clustered_index: bool,
}

impl Default for AdditionalColumnConfig {
    fn default() -> Self {
        Self {
            column_name: String::new(),
            data_type: "varchar".to_string(),
            allow_null: true,
            data_length: -1,
            non_clustered_index: false,
        }
    }
}

/// Column layout of the log table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ColumnOptionsConfig {
    /// Explicit standard column set. Unset keeps the default set.
    pub store: Option<Vec<StandardColumn>>,
    pub add_standard_columns: Vec<StandardColumn>,
    pub remove_standard_columns: Vec<StandardColumn>,
    pub additional_columns: Vec<AdditionalColumnConfig>,
    pub id: StandardColumnConfig,
    pub message: StandardColumnConfig,
    pub message_template: StandardColumnConfig,
    pub level: LevelColumnConfig,
    pub timestamp: TimeStampColumnConfig,
    pub exception: StandardColumnConfig,
    pub properties: PropertiesColumnConfig,
    pub log_event: LogEventColumnConfig,
    /// Column name of the primary key. Unset keeps the identity column.
    pub primary_key_column_name: Option<String>,
    pub clustered_columnstore_index: bool,
    pub disable_triggers: bool,
}

impl ColumnOptionsConfig {
    /// Build column options, validating every type name with the mapper.
    pub fn apply<M: TypeMapper>(&self, mapper: M) -> Result<ColumnSetOptions<M>> {
        let mut options = ColumnSetOptions::new(mapper);

        if let Some(store) = &self.store {
            options.set_store(ColumnSelection::Only(store.clone()));
        }
        for kind in &self.add_standard_columns {
            options.add_standard_column(*kind);
        }
        for kind in &self.remove_standard_columns {
            options.remove_standard_column(*kind);
        }

        let sections = [
            (StandardColumn::Id, &self.id),
            (StandardColumn::Message, &self.message),
            (StandardColumn::MessageTemplate, &self.message_template),
            (StandardColumn::Level, &self.level.column),
            (StandardColumn::TimeStamp, &self.timestamp.column),
            (StandardColumn::Exception, &self.exception),
            (StandardColumn::Properties, &self.properties.column),
            (StandardColumn::LogEvent, &self.log_event.column),
        ];
        for (kind, section) in sections {
            apply_standard(&mut options, kind, section)?;
        }

        if self.level.store_as_enum {
            options.set_level_store_as_enum(true);
        }
        options.timestamp_convert_to_utc = self.timestamp.convert_to_utc;
        options.properties = self.properties.policy.clone();
        options.log_event = self.log_event.policy.clone();

        for column in &self.additional_columns {
            let data_type = options.mapper().parse_type_name(&column.data_type)?;
            let added = options.add_column(column.column_name.clone(), data_type)?;
            added.set_allow_null(column.allow_null);
            added.set_data_length(column.data_length);
            added.set_non_clustered_index(column.non_clustered_index);
        }

        if let Some(name) = &self.primary_key_column_name {
            options.primary_key = Some(PrimaryKey::Named(name.clone()));
        }
        options.clustered_columnstore_index = self.clustered_columnstore_index;
        options.disable_triggers = self.disable_triggers;

        Ok(options)
    }
}

fn apply_standard<M: TypeMapper>(
    options: &mut ColumnSetOptions<M>,
    kind: StandardColumn,
    section: &StandardColumnConfig,
) -> Result<()> {
    if let Some(data_type) = &section.data_type {
        options.set_standard_type_name(kind, data_type)?;
    }

    let column = options.standard_column_mut(kind);
    if let Some(name) = &section.column_name {
        column.set_name(name.clone());
    }
    if let Some(allow_null) = section.allow_null {
        column.set_allow_null(allow_null);
    }
    if let Some(data_length) = section.data_length {
        column.set_data_length(data_length);
    }
    if let Some(non_clustered_index) = section.non_clustered_index {
        column.set_non_clustered_index(non_clustered_index);
    }
    Ok(())
}
