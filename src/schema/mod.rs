//! Resolved table layout and DDL generation.

use std::fmt;

use crate::columns::{ColumnSetOptions, StandardColumn};
use crate::error::Result;
use crate::serialize::NameSet;
use crate::types::TypeMapper;

mod ddl;

pub use ddl::{create_table_sql, render_create_table};

/// One active column with its host type resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedColumn<T, H> {
    pub name: String,
    pub data_type: T,
    pub host_type: H,
    pub allow_null: bool,
    /// Present only for length-requiring types; `-1` means maximum.
    pub max_length: Option<i32>,
    pub standard: Option<StandardColumn>,
    pub non_clustered_index: bool,
}

impl<T, H> ResolvedColumn<T, H> {
    pub fn is_identity(&self) -> bool {
        self.standard == Some(StandardColumn::Id)
    }
}

/// The active columns of a log table, validated and in store order.
///
/// Built once when the sink is assembled and read for every event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableShape<T, H> {
    columns: Vec<ResolvedColumn<T, H>>,
    primary_key: Option<usize>,
    clustered_columnstore_index: bool,
}

impl<T, H> TableShape<T, H>
where
    T: Copy + Eq + fmt::Display,
    H: Copy,
{
    /// Resolve every active column.
    ///
    /// Fails on the first column whose type, length or name is invalid, and
    /// on case-insensitive name clashes. A primary key that does not match
    /// an active column is dropped.
    pub fn resolve<M>(options: &ColumnSetOptions<M>) -> Result<Self>
    where
        M: TypeMapper<DataType = T, HostType = H>,
    {
        let mapper = options.mapper();
        let primary_key = options.resolved_primary_key();

        let mut columns = Vec::new();
        let mut primary_key_index = None;
        for (index, descriptor) in options.active_columns().into_iter().enumerate() {
            let schema = descriptor.to_schema_column(mapper)?;
            if primary_key.is_some_and(|pk| std::ptr::eq(pk, descriptor)) {
                primary_key_index = Some(index);
            }
            columns.push(ResolvedColumn {
                name: schema.name,
                data_type: descriptor.data_type(),
                host_type: schema.host_type,
                allow_null: schema.allow_null,
                max_length: schema.max_length,
                standard: descriptor.standard_column(),
                non_clustered_index: descriptor.non_clustered_index(),
            });
        }
        options.validate_names()?;

        Ok(Self {
            columns,
            primary_key: primary_key_index,
            clustered_columnstore_index: options.clustered_columnstore_index,
        })
    }

    pub fn columns(&self) -> &[ResolvedColumn<T, H>] {
        &self.columns
    }

    /// Case-insensitive column lookup.
    pub fn column(&self, name: &str) -> Option<&ResolvedColumn<T, H>> {
        self.columns
            .iter()
            .find(|column| column.name.eq_ignore_ascii_case(name))
    }

    /// Case-sensitive column lookup.
    pub fn column_exact(&self, name: &str) -> Option<&ResolvedColumn<T, H>> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn primary_key(&self) -> Option<&ResolvedColumn<T, H>> {
        self.primary_key.map(|index| &self.columns[index])
    }

    pub fn clustered_columnstore_index(&self) -> bool {
        self.clustered_columnstore_index
    }

    pub fn standard_names(&self) -> NameSet {
        self.columns
            .iter()
            .filter(|column| column.standard.is_some())
            .map(|column| column.name.as_str())
            .collect()
    }

    pub fn additional_names(&self) -> NameSet {
        self.columns
            .iter()
            .filter(|column| column.standard.is_none())
            .map(|column| column.name.as_str())
            .collect()
    }
}
