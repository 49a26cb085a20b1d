//! Host-typed column values and best-effort scalar coercion.

use bigdecimal::BigDecimal;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeDelta};
use num_traits::{FromPrimitive, ToPrimitive};
use uuid::Uuid;

use super::HostType;
use crate::event::ScalarValue;

/// A value ready to be written to one column.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValue {
    Null,
    Bool(bool),
    Byte(u8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Single(f32),
    Double(f64),
    Decimal(BigDecimal),
    String(String),
    DateTime(NaiveDateTime),
    DateTimeOffset(DateTime<FixedOffset>),
    TimeSpan(TimeDelta),
    Guid(Uuid),
}

impl ColumnValue {
    pub fn is_null(&self) -> bool {
        matches!(self, ColumnValue::Null)
    }

    /// Host type of the value; `None` for null.
    pub fn host_type(&self) -> Option<HostType> {
        let host = match self {
            ColumnValue::Null => return None,
            ColumnValue::Bool(_) => HostType::Bool,
            ColumnValue::Byte(_) => HostType::Byte,
            ColumnValue::Int16(_) => HostType::Int16,
            ColumnValue::Int32(_) => HostType::Int32,
            ColumnValue::Int64(_) => HostType::Int64,
            ColumnValue::Single(_) => HostType::Single,
            ColumnValue::Double(_) => HostType::Double,
            ColumnValue::Decimal(_) => HostType::Decimal,
            ColumnValue::String(_) => HostType::String,
            ColumnValue::DateTime(_) => HostType::DateTime,
            ColumnValue::DateTimeOffset(_) => HostType::DateTimeOffset,
            ColumnValue::TimeSpan(_) => HostType::TimeSpan,
            ColumnValue::Guid(_) => HostType::Guid,
        };
        Some(host)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ColumnValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Convert a scalar to the given host type.
    ///
    /// Integer targets round floating values half-to-even and reject
    /// out-of-range results. Returns `None` when no conversion exists;
    /// callers fall back to the scalar's text rendering.
    pub fn coerce(scalar: &ScalarValue, target: HostType) -> Option<ColumnValue> {
        if scalar.is_null() {
            return None;
        }
        match target {
            HostType::String => scalar.to_plain_string().map(ColumnValue::String),
            HostType::Bool => to_bool(scalar).map(ColumnValue::Bool),
            HostType::Byte => to_i128(scalar)
                .and_then(|v| u8::try_from(v).ok())
                .map(ColumnValue::Byte),
            HostType::Int16 => to_i128(scalar)
                .and_then(|v| i16::try_from(v).ok())
                .map(ColumnValue::Int16),
            HostType::Int32 => to_i128(scalar)
                .and_then(|v| i32::try_from(v).ok())
                .map(ColumnValue::Int32),
            HostType::Int64 => to_i128(scalar)
                .and_then(|v| i64::try_from(v).ok())
                .map(ColumnValue::Int64),
            HostType::Single => to_f64(scalar)
                .map(|v| v as f32)
                .filter(|v| v.is_finite())
                .map(ColumnValue::Single),
            HostType::Double => to_f64(scalar).map(ColumnValue::Double),
            HostType::Decimal => to_decimal(scalar).map(ColumnValue::Decimal),
            HostType::DateTime => to_datetime(scalar).map(ColumnValue::DateTime),
            HostType::DateTimeOffset => to_datetime_offset(scalar).map(ColumnValue::DateTimeOffset),
            HostType::TimeSpan => match scalar {
                ScalarValue::TimeSpan(span) => Some(ColumnValue::TimeSpan(*span)),
                _ => None,
            },
            HostType::Guid => match scalar {
                ScalarValue::Guid(g) => Some(ColumnValue::Guid(*g)),
                ScalarValue::String(s) => Uuid::parse_str(s.trim()).ok().map(ColumnValue::Guid),
                _ => None,
            },
            HostType::Bytes | HostType::UInt32 | HostType::Char | HostType::Object => None,
        }
    }
}

impl From<String> for ColumnValue {
    fn from(value: String) -> Self {
        ColumnValue::String(value)
    }
}

impl From<&str> for ColumnValue {
    fn from(value: &str) -> Self {
        ColumnValue::String(value.to_string())
    }
}

impl From<Option<String>> for ColumnValue {
    fn from(value: Option<String>) -> Self {
        value.map(ColumnValue::String).unwrap_or(ColumnValue::Null)
    }
}

fn to_bool(scalar: &ScalarValue) -> Option<bool> {
    match scalar {
        ScalarValue::Bool(b) => Some(*b),
        ScalarValue::Int(i) => Some(*i != 0),
        ScalarValue::UInt(u) => Some(*u != 0),
        ScalarValue::Float(f) => Some(*f != 0.0),
        ScalarValue::String(s) => {
            let s = s.trim();
            if s.eq_ignore_ascii_case("true") {
                Some(true)
            } else if s.eq_ignore_ascii_case("false") {
                Some(false)
            } else {
                None
            }
        }
        _ => None,
    }
}

fn to_i128(scalar: &ScalarValue) -> Option<i128> {
    match scalar {
        ScalarValue::Bool(b) => Some(i128::from(*b)),
        ScalarValue::Int(i) => Some(i128::from(*i)),
        ScalarValue::UInt(u) => Some(i128::from(*u)),
        ScalarValue::Float(f) if f.is_finite() => f.round_ties_even().to_i128(),
        ScalarValue::Decimal(d) => d.round(0).to_i128(),
        ScalarValue::String(s) => s.trim().parse::<i128>().ok(),
        _ => None,
    }
}

fn to_f64(scalar: &ScalarValue) -> Option<f64> {
    match scalar {
        ScalarValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        ScalarValue::Int(i) => Some(*i as f64),
        ScalarValue::UInt(u) => Some(*u as f64),
        ScalarValue::Float(f) => Some(*f),
        ScalarValue::Decimal(d) => d.to_f64(),
        ScalarValue::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn to_decimal(scalar: &ScalarValue) -> Option<BigDecimal> {
    match scalar {
        ScalarValue::Bool(b) => Some(BigDecimal::from(i32::from(*b))),
        ScalarValue::Int(i) => Some(BigDecimal::from(*i)),
        ScalarValue::UInt(u) => Some(BigDecimal::from(*u)),
        ScalarValue::Float(f) => BigDecimal::from_f64(*f),
        ScalarValue::Decimal(d) => Some(d.clone()),
        ScalarValue::String(s) => s.trim().parse::<BigDecimal>().ok(),
        _ => None,
    }
}

const NAIVE_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
];

fn to_datetime(scalar: &ScalarValue) -> Option<NaiveDateTime> {
    match scalar {
        ScalarValue::DateTime(dt) => Some(dt.naive_local()),
        ScalarValue::String(s) => {
            let s = s.trim();
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(dt.naive_local());
            }
            NAIVE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .or_else(|| {
                    NaiveDate::parse_from_str(s, "%Y-%m-%d")
                        .ok()
                        .and_then(|d| d.and_hms_opt(0, 0, 0))
                })
        }
        _ => None,
    }
}

fn to_datetime_offset(scalar: &ScalarValue) -> Option<DateTime<FixedOffset>> {
    match scalar {
        ScalarValue::DateTime(dt) => Some(*dt),
        ScalarValue::String(s) => DateTime::parse_from_rfc3339(s.trim()).ok(),
        _ => None,
    }
}
