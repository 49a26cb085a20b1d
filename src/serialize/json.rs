//! Whole-event JSON document.

use serde_json::{Map, Number, Value};

use crate::event::{format_time_span, PropertyValue, ScalarValue};
use crate::types::ColumnValue;

/// Member name carrying a structure's type tag.
pub const TYPE_TAG_MEMBER: &str = "_typeTag";

/// Member holding the event properties.
pub const PROPERTIES_MEMBER: &str = "Properties";

/// Build the event document from projected standard values and the
/// selected properties. `Properties` is omitted when nothing survives.
pub fn event_document<'a, S, P>(standard: S, properties: P) -> Value
where
    S: IntoIterator<Item = (String, ColumnValue)>,
    P: IntoIterator<Item = (&'a str, &'a PropertyValue)>,
{
    let mut document = Map::new();
    for (name, value) in standard {
        document.insert(name, column_value_to_json(&value));
    }

    let properties: Map<String, Value> = properties
        .into_iter()
        .map(|(name, value)| (name.to_string(), property_to_json(value)))
        .collect();
    if !properties.is_empty() {
        document.insert(PROPERTIES_MEMBER.to_string(), Value::Object(properties));
    }

    Value::Object(document)
}

pub fn property_to_json(value: &PropertyValue) -> Value {
    match value {
        PropertyValue::Scalar(scalar) => scalar_to_json(scalar),
        PropertyValue::Sequence(elements) => {
            Value::Array(elements.iter().map(property_to_json).collect())
        }
        PropertyValue::Dictionary(entries) => Value::Object(
            entries
                .iter()
                .map(|(key, value)| {
                    (
                        key.to_plain_string().unwrap_or_default(),
                        property_to_json(value),
                    )
                })
                .collect(),
        ),
        PropertyValue::Structure {
            type_tag,
            properties,
        } => {
            let mut object = Map::new();
            if let Some(tag) = type_tag {
                object.insert(TYPE_TAG_MEMBER.to_string(), Value::String(tag.clone()));
            }
            for (name, value) in properties {
                object.insert(name.clone(), property_to_json(value));
            }
            Value::Object(object)
        }
    }
}

pub fn scalar_to_json(scalar: &ScalarValue) -> Value {
    match scalar {
        ScalarValue::Null => Value::Null,
        ScalarValue::Bool(b) => Value::Bool(*b),
        ScalarValue::Int(i) => Value::from(*i),
        ScalarValue::UInt(u) => Value::from(*u),
        ScalarValue::Float(f) => float(*f),
        // Decimal text keeps full precision.
        ScalarValue::Decimal(d) => Value::String(d.to_string()),
        ScalarValue::String(s) => Value::String(s.clone()),
        ScalarValue::DateTime(dt) => Value::String(dt.to_rfc3339()),
        ScalarValue::TimeSpan(span) => Value::String(format_time_span(*span)),
        ScalarValue::Guid(g) => Value::String(g.to_string()),
    }
}

pub fn column_value_to_json(value: &ColumnValue) -> Value {
    match value {
        ColumnValue::Null => Value::Null,
        ColumnValue::Bool(b) => Value::Bool(*b),
        ColumnValue::Byte(v) => Value::from(*v),
        ColumnValue::Int16(v) => Value::from(*v),
        ColumnValue::Int32(v) => Value::from(*v),
        ColumnValue::Int64(v) => Value::from(*v),
        ColumnValue::Single(v) => float(f64::from(*v)),
        ColumnValue::Double(v) => float(*v),
        ColumnValue::Decimal(d) => Value::String(d.to_string()),
        ColumnValue::String(s) => Value::String(s.clone()),
        ColumnValue::DateTime(dt) => Value::String(dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string()),
        ColumnValue::DateTimeOffset(dt) => Value::String(dt.to_rfc3339()),
        ColumnValue::TimeSpan(span) => Value::String(format_time_span(*span)),
        ColumnValue::Guid(g) => Value::String(g.to_string()),
    }
}

/// Non-finite floats have no JSON number form and are written as text.
fn float(value: f64) -> Value {
    Number::from_f64(value)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(value.to_string()))
}
