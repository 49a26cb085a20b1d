//! Structured property serialization.
//!
//! Two renderings of an event's property tree:
//! - [`xml`]: tagged text for the properties column
//! - [`json`]: one document per event for the whole-event column

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use tracing::warn;

use crate::error::{BoxError, SinkError};
use crate::event::PropertyValue;

pub mod json;
pub mod xml;

/// Property-name predicate. An `Err` disables filtering for that call.
pub type PropertyFilter = Arc<dyn Fn(&str) -> Result<bool, BoxError> + Send + Sync>;

/// Naming and omission rules for the tagged properties rendering.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct SerializationPolicy {
    pub root_element_name: String,
    pub property_element_name: String,
    pub item_element_name: String,
    pub dictionary_element_name: String,
    pub sequence_element_name: String,
    pub structure_element_name: String,
    pub omit_dictionary_container_element: bool,
    pub omit_sequence_container_element: bool,
    pub omit_structure_container_element: bool,
    pub omit_element_if_empty: bool,
    pub use_property_key_as_element_name: bool,
    /// Drop properties already stored in an additional column.
    pub exclude_additional_properties: bool,
    #[serde(skip)]
    pub property_filter: Option<PropertyFilter>,
}

impl Default for SerializationPolicy {
    fn default() -> Self {
        Self {
            root_element_name: "properties".to_string(),
            property_element_name: "property".to_string(),
            item_element_name: "item".to_string(),
            dictionary_element_name: "dictionary".to_string(),
            sequence_element_name: "sequence".to_string(),
            structure_element_name: "structure".to_string(),
            omit_dictionary_container_element: false,
            omit_sequence_container_element: false,
            omit_structure_container_element: false,
            omit_element_if_empty: false,
            use_property_key_as_element_name: false,
            exclude_additional_properties: false,
            property_filter: None,
        }
    }
}

impl fmt::Debug for SerializationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerializationPolicy")
            .field("root_element_name", &self.root_element_name)
            .field("property_element_name", &self.property_element_name)
            .field("item_element_name", &self.item_element_name)
            .field("dictionary_element_name", &self.dictionary_element_name)
            .field("sequence_element_name", &self.sequence_element_name)
            .field("structure_element_name", &self.structure_element_name)
            .field("omit_dictionary_container_element", &self.omit_dictionary_container_element)
            .field("omit_sequence_container_element", &self.omit_sequence_container_element)
            .field("omit_structure_container_element", &self.omit_structure_container_element)
            .field("omit_element_if_empty", &self.omit_element_if_empty)
            .field("use_property_key_as_element_name", &self.use_property_key_as_element_name)
            .field("exclude_additional_properties", &self.exclude_additional_properties)
            .field("property_filter", &self.property_filter.is_some())
            .finish()
    }
}

impl SerializationPolicy {
    /// Install a property-name predicate.
    pub fn with_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&str) -> Result<bool, BoxError> + Send + Sync + 'static,
    {
        self.property_filter = Some(Arc::new(filter));
        self
    }
}

/// Switches for the whole-event document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LogEventPolicy {
    pub exclude_additional_properties: bool,
    pub exclude_standard_columns: bool,
}

/// Lower-cased set of names, matched case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameSet(HashSet<String>);

impl NameSet {
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(&name.to_lowercase())
    }

    pub fn insert(&mut self, name: &str) -> bool {
        self.0.insert(name.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> FromIterator<&'a str> for NameSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut set = NameSet::default();
        for name in iter {
            set.insert(name);
        }
        set
    }
}

/// Top-level property selection applied once before rendering.
///
/// Excluded names are dropped first, then the predicate runs. If the
/// predicate fails for any property, the failure is reported and the
/// unfiltered list is kept.
pub fn select_properties<'a, I>(
    properties: I,
    excluded: Option<&NameSet>,
    filter: Option<&PropertyFilter>,
) -> Vec<(&'a str, &'a PropertyValue)>
where
    I: IntoIterator<Item = (&'a String, &'a PropertyValue)>,
{
    let kept: Vec<(&str, &PropertyValue)> = properties
        .into_iter()
        .map(|(name, value)| (name.as_str(), value))
        .filter(|(name, _)| excluded.map_or(true, |set| !set.contains(name)))
        .collect();

    let Some(filter) = filter else {
        return kept;
    };

    let mut filtered = Vec::with_capacity(kept.len());
    for (name, value) in &kept {
        match filter(*name) {
            Ok(true) => filtered.push((*name, *value)),
            Ok(false) => {}
            Err(source) => {
                let error = SinkError::PropertyFilterFailed { source };
                warn!(
                    error = %error,
                    property = %name,
                    "Property filter failed, storing unfiltered"
                );
                return kept;
            }
        }
    }
    filtered
}

/// Turn an arbitrary key into a usable element name. Never fails.
pub fn valid_element_name(name: &str) -> String {
    let trimmed = name.trim();
    let Some(first) = trimmed.chars().next() else {
        return "x".to_string();
    };

    let reserved = trimmed
        .get(..3)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("xml"));

    let mut out = String::with_capacity(trimmed.len() + 1);
    if !first.is_alphabetic() || reserved {
        out.push('x');
    }

    let mut in_whitespace = false;
    for c in trimmed.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                out.push('_');
            }
            in_whitespace = true;
        } else {
            out.push(c);
            in_whitespace = false;
        }
    }
    out
}

/// Characters that cannot appear in stored XML text.
fn is_invalid_xml_char(c: char) -> bool {
    matches!(
        c,
        '\u{00}'..='\u{08}'
            | '\u{0B}'
            | '\u{0C}'
            | '\u{0E}'..='\u{1F}'
            | '\u{7F}'..='\u{9F}'
            | '\u{FEFF}'
            | '\u{FFFE}'
            | '\u{FFFF}'
    )
}

/// Escape text content: invalid characters become `\uXXXX`, then `&`, `<`
/// and `>` become entities.
pub(crate) fn escape_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c if is_invalid_xml_char(c) => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out
}

/// Escape an attribute value quoted with `'`.
pub(crate) fn escape_attribute(raw: &str) -> String {
    escape_text(raw).replace('\'', "&apos;")
}
