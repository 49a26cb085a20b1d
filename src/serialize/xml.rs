//! Tagged-text rendering of property trees.

use std::fmt::Write;

use super::{escape_attribute, escape_text, valid_element_name, SerializationPolicy};
use crate::event::{PropertyValue, ScalarValue};

/// Render the selected top-level properties inside the root element.
///
/// The root element is always written, even when no property survives.
pub fn serialize_properties<'a, I>(properties: I, policy: &SerializationPolicy) -> String
where
    I: IntoIterator<Item = (&'a str, &'a PropertyValue)>,
{
    let mut out = String::new();
    let _ = write!(out, "<{}>", policy.root_element_name);
    for (name, value) in properties {
        let text = serialize_value(value, policy);
        if policy.omit_element_if_empty && text.is_empty() {
            continue;
        }
        write_keyed(&mut out, &policy.item_element_name, name, &text, policy);
    }
    let _ = write!(out, "</{}>", policy.root_element_name);
    out
}

/// Render one value. Null scalars and fully omitted containers yield `""`.
pub fn serialize_value(value: &PropertyValue, policy: &SerializationPolicy) -> String {
    match value {
        PropertyValue::Scalar(scalar) => serialize_scalar(scalar),
        PropertyValue::Sequence(elements) => {
            let items: Vec<String> = elements
                .iter()
                .map(|element| serialize_value(element, policy))
                .filter(|text| !(policy.omit_element_if_empty && text.is_empty()))
                .collect();
            if items.is_empty() {
                return String::new();
            }

            let mut out = String::new();
            open(&mut out, &policy.sequence_element_name, policy.omit_sequence_container_element);
            for text in items {
                let _ = write!(out, "<{0}>{1}</{0}>", policy.item_element_name, text);
            }
            close(&mut out, &policy.sequence_element_name, policy.omit_sequence_container_element);
            out
        }
        PropertyValue::Dictionary(entries) => {
            let items: Vec<(String, String)> = entries
                .iter()
                .map(|(key, value)| {
                    (
                        key.to_plain_string().unwrap_or_default(),
                        serialize_value(value, policy),
                    )
                })
                .filter(|(_, text)| !(policy.omit_element_if_empty && text.is_empty()))
                .collect();
            if items.is_empty() {
                return String::new();
            }

            let mut out = String::new();
            open(
                &mut out,
                &policy.dictionary_element_name,
                policy.omit_dictionary_container_element,
            );
            for (key, text) in items {
                write_keyed(&mut out, &policy.item_element_name, &key, &text, policy);
            }
            close(
                &mut out,
                &policy.dictionary_element_name,
                policy.omit_dictionary_container_element,
            );
            out
        }
        PropertyValue::Structure {
            type_tag,
            properties,
        } => {
            let items: Vec<(&str, String)> = properties
                .iter()
                .map(|(name, value)| (name.as_str(), serialize_value(value, policy)))
                .filter(|(_, text)| !(policy.omit_element_if_empty && text.is_empty()))
                .collect();
            if items.is_empty() {
                return String::new();
            }

            let tag = type_tag.as_deref().unwrap_or_default();
            let container = if policy.use_property_key_as_element_name {
                valid_element_name(tag)
            } else {
                policy.structure_element_name.clone()
            };

            let mut out = String::new();
            if !policy.omit_structure_container_element {
                if policy.use_property_key_as_element_name {
                    let _ = write!(out, "<{container}>");
                } else {
                    let _ = write!(out, "<{container} type='{}'>", escape_attribute(tag));
                }
            }
            for (name, text) in items {
                write_keyed(&mut out, &policy.property_element_name, name, &text, policy);
            }
            close(&mut out, &container, policy.omit_structure_container_element);
            out
        }
    }
}

fn serialize_scalar(scalar: &ScalarValue) -> String {
    scalar
        .to_plain_string()
        .map(|text| escape_text(&text))
        .unwrap_or_default()
}

/// `<element key='K'>V</element>` or `<K>V</K>` in key-as-name mode.
fn write_keyed(
    out: &mut String,
    element: &str,
    key: &str,
    text: &str,
    policy: &SerializationPolicy,
) {
    if policy.use_property_key_as_element_name {
        let _ = write!(out, "<{0}>{1}</{0}>", valid_element_name(key), text);
    } else {
        let _ = write!(out, "<{0} key='{1}'>{2}</{0}>", element, escape_attribute(key), text);
    }
}

fn open(out: &mut String, element: &str, omit: bool) {
    if !omit {
        let _ = write!(out, "<{element}>");
    }
}

fn close(out: &mut String, element: &str, omit: bool) {
    if !omit {
        let _ = write!(out, "</{element}>");
    }
}
