//! SQL Server type vocabulary.

use std::fmt;
use std::str::FromStr;

use super::{HostType, StandardShape, TypeMapper};
use crate::columns::StandardColumn;
use crate::error::{Result, SinkError};

/// SQL Server column types.
///
/// Includes types the sink refuses (`Variant`, `Text`, `Image`, ...) so
/// that configuration naming them fails validation instead of parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlDataType {
    BigInt,
    Binary,
    Bit,
    Char,
    DateTime,
    Decimal,
    Float,
    Image,
    Int,
    Money,
    NChar,
    NText,
    NVarChar,
    Real,
    UniqueIdentifier,
    SmallDateTime,
    SmallInt,
    SmallMoney,
    Text,
    Timestamp,
    TinyInt,
    VarBinary,
    VarChar,
    Variant,
    Xml,
    Udt,
    Structured,
    Date,
    Time,
    DateTime2,
    DateTimeOffset,
}

impl SqlDataType {
    pub const ALL: [SqlDataType; 31] = [
        SqlDataType::BigInt,
        SqlDataType::Binary,
        SqlDataType::Bit,
        SqlDataType::Char,
        SqlDataType::DateTime,
        SqlDataType::Decimal,
        SqlDataType::Float,
        SqlDataType::Image,
        SqlDataType::Int,
        SqlDataType::Money,
        SqlDataType::NChar,
        SqlDataType::NText,
        SqlDataType::NVarChar,
        SqlDataType::Real,
        SqlDataType::UniqueIdentifier,
        SqlDataType::SmallDateTime,
        SqlDataType::SmallInt,
        SqlDataType::SmallMoney,
        SqlDataType::Text,
        SqlDataType::Timestamp,
        SqlDataType::TinyInt,
        SqlDataType::VarBinary,
        SqlDataType::VarChar,
        SqlDataType::Variant,
        SqlDataType::Xml,
        SqlDataType::Udt,
        SqlDataType::Structured,
        SqlDataType::Date,
        SqlDataType::Time,
        SqlDataType::DateTime2,
        SqlDataType::DateTimeOffset,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SqlDataType::BigInt => "BigInt",
            SqlDataType::Binary => "Binary",
            SqlDataType::Bit => "Bit",
            SqlDataType::Char => "Char",
            SqlDataType::DateTime => "DateTime",
            SqlDataType::Decimal => "Decimal",
            SqlDataType::Float => "Float",
            SqlDataType::Image => "Image",
            SqlDataType::Int => "Int",
            SqlDataType::Money => "Money",
            SqlDataType::NChar => "NChar",
            SqlDataType::NText => "NText",
            SqlDataType::NVarChar => "NVarChar",
            SqlDataType::Real => "Real",
            SqlDataType::UniqueIdentifier => "UniqueIdentifier",
            SqlDataType::SmallDateTime => "SmallDateTime",
            SqlDataType::SmallInt => "SmallInt",
            SqlDataType::SmallMoney => "SmallMoney",
            SqlDataType::Text => "Text",
            SqlDataType::Timestamp => "Timestamp",
            SqlDataType::TinyInt => "TinyInt",
            SqlDataType::VarBinary => "VarBinary",
            SqlDataType::VarChar => "VarChar",
            SqlDataType::Variant => "Variant",
            SqlDataType::Xml => "Xml",
            SqlDataType::Udt => "Udt",
            SqlDataType::Structured => "Structured",
            SqlDataType::Date => "Date",
            SqlDataType::Time => "Time",
            SqlDataType::DateTime2 => "DateTime2",
            SqlDataType::DateTimeOffset => "DateTimeOffset",
        }
    }
}

impl fmt::Display for SqlDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SqlDataType {
    type Err = SinkError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        SqlDataType::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| SinkError::UnrecognizedOrUnsupportedType {
                name: s.to_string(),
            })
    }
}

const SUPPORTED: [SqlDataType; 22] = [
    SqlDataType::BigInt,
    SqlDataType::Bit,
    SqlDataType::Char,
    SqlDataType::Date,
    SqlDataType::DateTime,
    SqlDataType::DateTime2,
    SqlDataType::DateTimeOffset,
    SqlDataType::Decimal,
    SqlDataType::Float,
    SqlDataType::Int,
    SqlDataType::Money,
    SqlDataType::NChar,
    SqlDataType::NVarChar,
    SqlDataType::Real,
    SqlDataType::SmallDateTime,
    SqlDataType::SmallInt,
    SqlDataType::SmallMoney,
    SqlDataType::Time,
    SqlDataType::TinyInt,
    SqlDataType::UniqueIdentifier,
    SqlDataType::VarChar,
    SqlDataType::Xml,
];

const LENGTH_REQUIRED: [SqlDataType; 4] = [
    SqlDataType::Char,
    SqlDataType::NChar,
    SqlDataType::NVarChar,
    SqlDataType::VarChar,
];

const COLUMNSTORE_COMPATIBLE: [SqlDataType; 23] = [
    SqlDataType::DateTimeOffset,
    SqlDataType::DateTime2,
    SqlDataType::DateTime,
    SqlDataType::SmallDateTime,
    SqlDataType::Date,
    SqlDataType::Time,
    SqlDataType::Float,
    SqlDataType::Real,
    SqlDataType::Decimal,
    SqlDataType::Money,
    SqlDataType::SmallMoney,
    SqlDataType::BigInt,
    SqlDataType::Int,
    SqlDataType::SmallInt,
    SqlDataType::TinyInt,
    SqlDataType::Bit,
    SqlDataType::NVarChar,
    SqlDataType::NChar,
    SqlDataType::VarChar,
    SqlDataType::Char,
    SqlDataType::VarBinary,
    SqlDataType::Binary,
    SqlDataType::UniqueIdentifier,
];

const ID_TYPES: [SqlDataType; 2] = [SqlDataType::Int, SqlDataType::BigInt];
const LEVEL_TYPES: [SqlDataType; 2] = [SqlDataType::NVarChar, SqlDataType::TinyInt];
const TIMESTAMP_TYPES: [SqlDataType; 3] = [
    SqlDataType::DateTime,
    SqlDataType::DateTime2,
    SqlDataType::DateTimeOffset,
];
const PROPERTIES_TYPES: [SqlDataType; 3] =
    [SqlDataType::NVarChar, SqlDataType::VarChar, SqlDataType::Xml];
const TEXT_TYPES: [SqlDataType; 2] = [SqlDataType::NVarChar, SqlDataType::VarChar];

/// SQL Server implementation of [`TypeMapper`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlTypeMapper;

impl SqlTypeMapper {
    pub fn new() -> Self {
        Self
    }
}

impl TypeMapper for SqlTypeMapper {
    type DataType = SqlDataType;
    type HostType = HostType;

    fn supported_types(&self) -> &[SqlDataType] {
        &SUPPORTED
    }

    fn requires_length(&self, data_type: SqlDataType) -> bool {
        LENGTH_REQUIRED.contains(&data_type)
    }

    fn is_compact_storage_compatible(&self, data_type: SqlDataType) -> bool {
        COLUMNSTORE_COMPATIBLE.contains(&data_type)
    }

    fn to_host_type(&self, data_type: SqlDataType) -> Result<HostType> {
        let host = match data_type {
            SqlDataType::BigInt => HostType::Int64,
            SqlDataType::Bit => HostType::Bool,
            SqlDataType::Char
            | SqlDataType::NChar
            | SqlDataType::NVarChar
            | SqlDataType::VarChar
            | SqlDataType::Xml => HostType::String,
            SqlDataType::Date
            | SqlDataType::DateTime
            | SqlDataType::DateTime2
            | SqlDataType::SmallDateTime => HostType::DateTime,
            SqlDataType::DateTimeOffset => HostType::DateTimeOffset,
            SqlDataType::Decimal | SqlDataType::Money | SqlDataType::SmallMoney => {
                HostType::Decimal
            }
            SqlDataType::Float => HostType::Double,
            SqlDataType::Int => HostType::Int32,
            SqlDataType::Real => HostType::Single,
            SqlDataType::SmallInt => HostType::Int16,
            SqlDataType::Time => HostType::TimeSpan,
            SqlDataType::TinyInt => HostType::Byte,
            SqlDataType::UniqueIdentifier => HostType::Guid,
            other => return Err(SinkError::unsupported(other)),
        };
        Ok(host)
    }

    fn from_host_type(&self, host_type: HostType) -> Result<SqlDataType> {
        let data_type = match host_type {
            HostType::Int64 => SqlDataType::BigInt,
            HostType::Bool => SqlDataType::Bit,
            HostType::DateTime => SqlDataType::DateTime,
            HostType::DateTimeOffset => SqlDataType::DateTimeOffset,
            HostType::Decimal => SqlDataType::Decimal,
            HostType::Double => SqlDataType::Float,
            HostType::Int32 => SqlDataType::Int,
            HostType::String => SqlDataType::NVarChar,
            HostType::Single => SqlDataType::Real,
            HostType::Int16 => SqlDataType::SmallInt,
            HostType::TimeSpan => SqlDataType::Time,
            HostType::Byte => SqlDataType::TinyInt,
            HostType::Guid => SqlDataType::UniqueIdentifier,
            HostType::Bytes | HostType::UInt32 | HostType::Char | HostType::Object => {
                return Err(SinkError::NoReverseMapping {
                    host_type: host_type.to_string(),
                });
            }
        };
        Ok(data_type)
    }

    fn parse_type_name(&self, name: &str) -> Result<SqlDataType> {
        let data_type: SqlDataType = name.parse()?;
        if !self.is_supported(data_type) {
            return Err(SinkError::UnrecognizedOrUnsupportedType {
                name: name.to_string(),
            });
        }
        Ok(data_type)
    }

    fn type_sql(&self, data_type: SqlDataType) -> String {
        data_type.name().to_uppercase()
    }

    fn standard_shape(&self, kind: StandardColumn) -> StandardShape<SqlDataType> {
        let (data_type, allow_null, data_length) = match kind {
            StandardColumn::Id => (SqlDataType::Int, false, -1),
            StandardColumn::Level => (SqlDataType::NVarChar, true, 128),
            StandardColumn::TimeStamp => (SqlDataType::DateTime, false, -1),
            StandardColumn::Message
            | StandardColumn::MessageTemplate
            | StandardColumn::Exception
            | StandardColumn::Properties
            | StandardColumn::LogEvent => (SqlDataType::NVarChar, true, -1),
        };
        StandardShape {
            data_type,
            allow_null,
            data_length,
        }
    }

    fn standard_types(&self, kind: StandardColumn) -> &[SqlDataType] {
        match kind {
            StandardColumn::Id => &ID_TYPES,
            StandardColumn::Level => &LEVEL_TYPES,
            StandardColumn::TimeStamp => &TIMESTAMP_TYPES,
            StandardColumn::Properties => &PROPERTIES_TYPES,
            StandardColumn::Message
            | StandardColumn::MessageTemplate
            | StandardColumn::Exception
            | StandardColumn::LogEvent => &TEXT_TYPES,
        }
    }

    fn level_ordinal_type(&self) -> SqlDataType {
        SqlDataType::TinyInt
    }
}
