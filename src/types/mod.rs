//! Database type mapping.
//!
//! A [`TypeMapper`] validates and converts between a storage engine's type
//! vocabulary and host value types. Column descriptors and the schema
//! generator only ever talk to a mapper, never to a concrete type enum.

use std::fmt;
use std::hash::Hash;

use crate::columns::StandardColumn;
use crate::error::Result;

mod sql;
mod value;

pub use sql::{SqlDataType, SqlTypeMapper};
pub use value::ColumnValue;

/// Host value types a database column materializes to.
///
/// The last four appear only on externally described columns; no storage
/// type maps to them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostType {
    Int64,
    Bool,
    String,
    DateTime,
    DateTimeOffset,
    Decimal,
    Double,
    Int32,
    Single,
    Int16,
    TimeSpan,
    Byte,
    Guid,
    Bytes,
    UInt32,
    Char,
    Object,
}

impl fmt::Display for HostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HostType::Int64 => "i64",
            HostType::Bool => "bool",
            HostType::String => "String",
            HostType::DateTime => "NaiveDateTime",
            HostType::DateTimeOffset => "DateTime<FixedOffset>",
            HostType::Decimal => "BigDecimal",
            HostType::Double => "f64",
            HostType::Int32 => "i32",
            HostType::Single => "f32",
            HostType::Int16 => "i16",
            HostType::TimeSpan => "TimeDelta",
            HostType::Byte => "u8",
            HostType::Guid => "Uuid",
            HostType::Bytes => "Vec<u8>",
            HostType::UInt32 => "u32",
            HostType::Char => "char",
            HostType::Object => "object",
        };
        f.write_str(name)
    }
}

/// Default shape of a standard column for one storage engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandardShape<T> {
    pub data_type: T,
    pub allow_null: bool,
    pub data_length: i32,
}

/// Validation and conversion between a storage type domain and host types.
///
/// Reverse mapping is partial: several storage types may share one host
/// type, so `from_host_type` picks a single canonical storage type.
pub trait TypeMapper: Send + Sync {
    type DataType: Copy + Eq + Hash + fmt::Debug + fmt::Display + Send + Sync;
    type HostType: Copy + Eq + fmt::Debug + fmt::Display + Send + Sync;

    /// Storage types this mapper accepts for columns.
    fn supported_types(&self) -> &[Self::DataType];

    fn is_supported(&self, data_type: Self::DataType) -> bool {
        self.supported_types().contains(&data_type)
    }

    /// Whether the type needs an explicit, non-zero length.
    fn requires_length(&self, data_type: Self::DataType) -> bool;

    /// Whether the type can live in a clustered columnstore table.
    fn is_compact_storage_compatible(&self, data_type: Self::DataType) -> bool;

    fn to_host_type(&self, data_type: Self::DataType) -> Result<Self::HostType>;

    fn from_host_type(&self, host_type: Self::HostType) -> Result<Self::DataType>;

    /// Parse a type name (case-insensitive) and check it is supported.
    fn parse_type_name(&self, name: &str) -> Result<Self::DataType>;

    /// Render the type for a column clause, without length.
    fn type_sql(&self, data_type: Self::DataType) -> String;

    /// Default shape for a standard column kind.
    fn standard_shape(&self, kind: StandardColumn) -> StandardShape<Self::DataType>;

    /// Types a standard column kind may be set to.
    fn standard_types(&self, kind: StandardColumn) -> &[Self::DataType];

    /// Type used by the level column when it stores the level ordinal.
    fn level_ordinal_type(&self) -> Self::DataType;
}
