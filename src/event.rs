//! Log event model consumed by the sink.
//!
//! Events are immutable once handed to the sink. Property values form a
//! closed tree of scalars, sequences, dictionaries and structures.

use std::fmt;

use bigdecimal::BigDecimal;
use chrono::{DateTime, FixedOffset, TimeDelta};
use indexmap::IndexMap;
use uuid::Uuid;

/// Severity of a log event, in ascending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    Verbose,
    Debug,
    Information,
    Warning,
    Error,
    Fatal,
}

impl LogLevel {
    /// Ordinal stored when the level column keeps the enum representation.
    pub fn ordinal(self) -> u8 {
        self as u8
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Verbose => "Verbose",
            LogLevel::Debug => "Debug",
            LogLevel::Information => "Information",
            LogLevel::Warning => "Warning",
            LogLevel::Error => "Error",
            LogLevel::Fatal => "Fatal",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A leaf value attached to a log event.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Decimal(BigDecimal),
    String(String),
    DateTime(DateTime<FixedOffset>),
    TimeSpan(TimeDelta),
    Guid(Uuid),
}

impl ScalarValue {
    pub fn is_null(&self) -> bool {
        matches!(self, ScalarValue::Null)
    }

    /// Plain text form of the value, without quoting.
    ///
    /// Returns `None` for null so callers can tell "absent" from "empty".
    pub fn to_plain_string(&self) -> Option<String> {
        let text = match self {
            ScalarValue::Null => return None,
            ScalarValue::Bool(b) => b.to_string(),
            ScalarValue::Int(i) => i.to_string(),
            ScalarValue::UInt(u) => u.to_string(),
            ScalarValue::Float(x) => x.to_string(),
            ScalarValue::Decimal(d) => d.to_string(),
            ScalarValue::String(s) => s.clone(),
            ScalarValue::DateTime(dt) => dt.to_rfc3339(),
            ScalarValue::TimeSpan(span) => format_time_span(*span),
            ScalarValue::Guid(g) => g.to_string(),
        };
        Some(text)
    }
}

/// Format a span as `[-][d.]hh:mm:ss[.fffffff]`.
pub(crate) fn format_time_span(span: TimeDelta) -> String {
    let negative = span < TimeDelta::zero();
    let span = if negative { -span } else { span };

    let total_seconds = span.num_seconds();
    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3_600;
    let minutes = (total_seconds % 3_600) / 60;
    let seconds = total_seconds % 60;
    let ticks = span.subsec_nanos() / 100;

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    if days > 0 {
        out.push_str(&format!("{days}."));
    }
    out.push_str(&format!("{hours:02}:{minutes:02}:{seconds:02}"));
    if ticks > 0 {
        out.push_str(&format!(".{ticks:07}"));
    }
    out
}

impl fmt::Display for ScalarValue {
    /// Renders strings quoted, everything else in plain form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Null => f.write_str("null"),
            ScalarValue::String(s) => {
                f.write_str("\"")?;
                f.write_str(&s.replace('"', "\\\""))?;
                f.write_str("\"")
            }
            other => f.write_str(&other.to_plain_string().unwrap_or_default()),
        }
    }
}

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        ScalarValue::String(value.to_string())
    }
}

impl From<String> for ScalarValue {
    fn from(value: String) -> Self {
        ScalarValue::String(value)
    }
}

impl From<bool> for ScalarValue {
    fn from(value: bool) -> Self {
        ScalarValue::Bool(value)
    }
}

impl From<i32> for ScalarValue {
    fn from(value: i32) -> Self {
        ScalarValue::Int(value.into())
    }
}

impl From<i64> for ScalarValue {
    fn from(value: i64) -> Self {
        ScalarValue::Int(value)
    }
}

impl From<u64> for ScalarValue {
    fn from(value: u64) -> Self {
        ScalarValue::UInt(value)
    }
}

impl From<f64> for ScalarValue {
    fn from(value: f64) -> Self {
        ScalarValue::Float(value)
    }
}

impl From<BigDecimal> for ScalarValue {
    fn from(value: BigDecimal) -> Self {
        ScalarValue::Decimal(value)
    }
}

impl From<DateTime<FixedOffset>> for ScalarValue {
    fn from(value: DateTime<FixedOffset>) -> Self {
        ScalarValue::DateTime(value)
    }
}

impl From<TimeDelta> for ScalarValue {
    fn from(value: TimeDelta) -> Self {
        ScalarValue::TimeSpan(value)
    }
}

impl From<Uuid> for ScalarValue {
    fn from(value: Uuid) -> Self {
        ScalarValue::Guid(value)
    }
}

/// A node in an event's property tree.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Scalar(ScalarValue),
    Sequence(Vec<PropertyValue>),
    Dictionary(Vec<(ScalarValue, PropertyValue)>),
    Structure {
        type_tag: Option<String>,
        properties: Vec<(String, PropertyValue)>,
    },
}

impl PropertyValue {
    pub fn scalar(value: impl Into<ScalarValue>) -> Self {
        PropertyValue::Scalar(value.into())
    }

    pub fn null() -> Self {
        PropertyValue::Scalar(ScalarValue::Null)
    }

    pub fn structure<I, K>(type_tag: Option<&str>, properties: I) -> Self
    where
        I: IntoIterator<Item = (K, PropertyValue)>,
        K: Into<String>,
    {
        PropertyValue::Structure {
            type_tag: type_tag.map(str::to_string),
            properties: properties
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        }
    }
}

impl From<ScalarValue> for PropertyValue {
    fn from(value: ScalarValue) -> Self {
        PropertyValue::Scalar(value)
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Scalar(scalar) => fmt::Display::fmt(scalar, f),
            PropertyValue::Sequence(elements) => {
                f.write_str("[")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    fmt::Display::fmt(element, f)?;
                }
                f.write_str("]")
            }
            PropertyValue::Dictionary(entries) => {
                f.write_str("[")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "({key}: {value})")?;
                }
                f.write_str("]")
            }
            PropertyValue::Structure {
                type_tag,
                properties,
            } => {
                if let Some(tag) = type_tag {
                    write!(f, "{tag} ")?;
                }
                f.write_str("{ ")?;
                for (i, (name, value)) in properties.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{name}: {value}")?;
                }
                f.write_str(" }")
            }
        }
    }
}

/// An immutable log record.
#[derive(Debug, Clone)]
pub struct LogEvent {
    pub timestamp: DateTime<FixedOffset>,
    pub level: LogLevel,
    pub message_template: String,
    pub rendered_message: String,
    pub exception: Option<String>,
    pub properties: IndexMap<String, PropertyValue>,
}

impl LogEvent {
    pub fn new(
        timestamp: DateTime<FixedOffset>,
        level: LogLevel,
        message_template: impl Into<String>,
        rendered_message: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            level,
            message_template: message_template.into(),
            rendered_message: rendered_message.into(),
            exception: None,
            properties: IndexMap::new(),
        }
    }

    pub fn with_exception(mut self, exception: impl Into<String>) -> Self {
        self.exception = Some(exception.into());
        self
    }

    pub fn with_property(
        mut self,
        name: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }
}
