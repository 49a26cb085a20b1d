//! Column metadata.
//!
//! A [`ColumnDescriptor`] carries one column's name, storage type, nullability,
//! length and index flag. Standard columns are ordinary descriptors tagged
//! with a [`StandardColumn`] kind; their defaults and allowed types come from
//! the [`TypeMapper`].

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{Result, SinkError};
use crate::types::TypeMapper;

mod options;

pub use options::{ColumnSelection, ColumnSetOptions, PrimaryKey};

/// Built-in log event columns, in canonical store order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(try_from = "String")]
pub enum StandardColumn {
    Id,
    Message,
    MessageTemplate,
    Level,
    TimeStamp,
    Exception,
    Properties,
    LogEvent,
}

impl StandardColumn {
    pub const ALL: [StandardColumn; 8] = [
        StandardColumn::Id,
        StandardColumn::Message,
        StandardColumn::MessageTemplate,
        StandardColumn::Level,
        StandardColumn::TimeStamp,
        StandardColumn::Exception,
        StandardColumn::Properties,
        StandardColumn::LogEvent,
    ];

    /// Columns stored when no explicit selection is configured.
    pub const DEFAULT_STORE: [StandardColumn; 7] = [
        StandardColumn::Id,
        StandardColumn::Message,
        StandardColumn::MessageTemplate,
        StandardColumn::Level,
        StandardColumn::TimeStamp,
        StandardColumn::Exception,
        StandardColumn::Properties,
    ];

    /// Canonical column name.
    pub fn name(self) -> &'static str {
        match self {
            StandardColumn::Id => "Id",
            StandardColumn::Message => "Message",
            StandardColumn::MessageTemplate => "MessageTemplate",
            StandardColumn::Level => "Level",
            StandardColumn::TimeStamp => "TimeStamp",
            StandardColumn::Exception => "Exception",
            StandardColumn::Properties => "Properties",
            StandardColumn::LogEvent => "LogEvent",
        }
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for StandardColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StandardColumn {
    type Err = String;

    /// Accepts `TimeStamp`, `timestamp` and `time_stamp` alike.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted: String = s.chars().filter(|c| *c != '_').collect();
        StandardColumn::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(wanted.trim()))
            .ok_or_else(|| format!("unknown standard column: {s}"))
    }
}

impl TryFrom<String> for StandardColumn {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

/// A column materialized with its host type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaColumn<H> {
    pub name: String,
    pub host_type: H,
    pub allow_null: bool,
    /// Set only for length-requiring types; `-1` means maximum.
    pub max_length: Option<i32>,
}

/// A column described by host type only, as older configurations do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalColumn<H> {
    pub name: String,
    pub host_type: H,
    pub allow_null: bool,
    pub max_length: i32,
}

/// Metadata for one table column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor<T> {
    name: String,
    data_type: T,
    allow_null: bool,
    data_length: i32,
    non_clustered_index: bool,
    standard: Option<StandardColumn>,
}

impl<T> ColumnDescriptor<T>
where
    T: Copy + Eq + fmt::Display,
{
    /// Create a nullable, maximum-length column.
    pub fn new<M>(mapper: &M, name: impl Into<String>, data_type: T) -> Result<Self>
    where
        M: TypeMapper<DataType = T>,
    {
        if !mapper.is_supported(data_type) {
            return Err(SinkError::unsupported(data_type));
        }
        Ok(Self {
            name: name.into(),
            data_type,
            allow_null: true,
            data_length: -1,
            non_clustered_index: false,
            standard: None,
        })
    }

    /// Descriptor for a standard column with the mapper's default shape.
    pub fn standard<M>(mapper: &M, kind: StandardColumn) -> Self
    where
        M: TypeMapper<DataType = T>,
    {
        let shape = mapper.standard_shape(kind);
        Self {
            name: String::new(),
            data_type: shape.data_type,
            allow_null: shape.allow_null,
            data_length: shape.data_length,
            non_clustered_index: false,
            standard: Some(kind),
        }
    }

    /// Reverse-construct a descriptor from a host-typed column.
    pub fn from_external<M>(mapper: &M, column: &ExternalColumn<M::HostType>) -> Result<Self>
    where
        M: TypeMapper<DataType = T>,
    {
        let data_type = mapper.from_host_type(column.host_type)?;
        if column.max_length == 0 && mapper.requires_length(data_type) {
            return Err(SinkError::missing_length(&column.name, data_type));
        }
        Ok(Self {
            name: column.name.clone(),
            data_type,
            allow_null: column.allow_null,
            data_length: column.max_length,
            non_clustered_index: false,
            standard: None,
        })
    }

    /// Column name, falling back to the standard name when unset.
    pub fn name(&self) -> &str {
        match self.standard {
            Some(kind) if self.name.trim().is_empty() => kind.name(),
            _ => &self.name,
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn data_type(&self) -> T {
        self.data_type
    }

    /// Change the storage type.
    ///
    /// Standard columns only accept the types the mapper lists for their kind.
    pub fn set_data_type<M>(&mut self, mapper: &M, data_type: T) -> Result<()>
    where
        M: TypeMapper<DataType = T>,
    {
        let allowed = match self.standard {
            Some(kind) => mapper.standard_types(kind).contains(&data_type),
            None => true,
        };
        if !allowed || !mapper.is_supported(data_type) {
            return Err(SinkError::unsupported(data_type));
        }
        self.data_type = data_type;
        Ok(())
    }

    /// Change the storage type from a configuration string such as `"nvarchar"`.
    pub fn set_data_type_name<M>(&mut self, mapper: &M, name: &str) -> Result<()>
    where
        M: TypeMapper<DataType = T>,
    {
        let data_type = mapper.parse_type_name(name)?;
        self.set_data_type(mapper, data_type)
    }

    pub(crate) fn set_data_type_unchecked(&mut self, data_type: T) {
        self.data_type = data_type;
    }

    /// The identity column is never nullable.
    pub fn allow_null(&self) -> bool {
        self.allow_null && self.standard != Some(StandardColumn::Id)
    }

    pub fn set_allow_null(&mut self, allow_null: bool) {
        self.allow_null = allow_null;
    }

    pub fn data_length(&self) -> i32 {
        self.data_length
    }

    /// `-1` means maximum length.
    pub fn set_data_length(&mut self, data_length: i32) {
        self.data_length = data_length;
    }

    pub fn non_clustered_index(&self) -> bool {
        self.non_clustered_index
    }

    pub fn set_non_clustered_index(&mut self, non_clustered_index: bool) {
        self.non_clustered_index = non_clustered_index;
    }

    pub fn standard_column(&self) -> Option<StandardColumn> {
        self.standard
    }

    pub fn is_identity(&self) -> bool {
        self.standard == Some(StandardColumn::Id)
    }

    pub fn with_allow_null(mut self, allow_null: bool) -> Self {
        self.set_allow_null(allow_null);
        self
    }

    pub fn with_data_length(mut self, data_length: i32) -> Self {
        self.set_data_length(data_length);
        self
    }

    pub fn with_non_clustered_index(mut self, non_clustered_index: bool) -> Self {
        self.set_non_clustered_index(non_clustered_index);
        self
    }

    /// Materialize the column with its resolved host type.
    pub fn to_schema_column<M>(&self, mapper: &M) -> Result<SchemaColumn<M::HostType>>
    where
        M: TypeMapper<DataType = T>,
    {
        if !mapper.is_supported(self.data_type) {
            return Err(SinkError::unsupported(self.data_type));
        }
        let host_type = mapper.to_host_type(self.data_type)?;

        if self.name().trim().is_empty() {
            return Err(SinkError::EmptyColumnName);
        }

        let max_length = if mapper.requires_length(self.data_type) {
            if self.data_length == 0 {
                return Err(SinkError::missing_length(self.name(), self.data_type));
            }
            Some(self.data_length)
        } else {
            None
        };

        Ok(SchemaColumn {
            name: self.name().to_string(),
            host_type,
            allow_null: self.allow_null(),
            max_length,
        })
    }
}

#[cfg(test)]
mod tests;
