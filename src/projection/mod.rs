//! Shaping one log event into column values.

use chrono::Utc;
use tracing::debug;

use crate::columns::{ColumnSetOptions, StandardColumn};
use crate::error::Result;
use crate::event::{LogEvent, PropertyValue};
use crate::schema::{ResolvedColumn, TableShape};
use crate::serialize::{json, select_properties, xml, NameSet};
use crate::types::{ColumnValue, HostType, TypeMapper};

/// Produces the `(column, value)` row for each event.
///
/// Holds the resolved table shape and the column name sets; nothing here is
/// mutated after construction, so one projector serves concurrent callers.
#[derive(Debug, Clone)]
pub struct RowProjector<M: TypeMapper<HostType = HostType>> {
    options: ColumnSetOptions<M>,
    shape: TableShape<M::DataType, HostType>,
    standard_names: NameSet,
    additional_names: NameSet,
}

impl<M: TypeMapper<HostType = HostType>> RowProjector<M> {
    /// Validate the column set and cache its resolved shape.
    pub fn new(options: ColumnSetOptions<M>) -> Result<Self> {
        let shape = TableShape::resolve(&options)?;
        let standard_names = shape.standard_names();
        let additional_names = shape.additional_names();
        Ok(Self {
            options,
            shape,
            standard_names,
            additional_names,
        })
    }

    pub fn options(&self) -> &ColumnSetOptions<M> {
        &self.options
    }

    pub fn shape(&self) -> &TableShape<M::DataType, HostType> {
        &self.shape
    }

    pub fn standard_names(&self) -> &NameSet {
        &self.standard_names
    }

    pub fn additional_names(&self) -> &NameSet {
        &self.additional_names
    }

    /// Stored standard columns (identity excluded), then additional columns
    /// whose property is present on the event.
    pub fn project(&self, event: &LogEvent) -> Vec<(String, ColumnValue)> {
        let mut row = Vec::with_capacity(self.shape.columns().len());
        for column in self.shape.columns() {
            match column.standard {
                Some(StandardColumn::Id) => {}
                Some(kind) => {
                    let value = self.standard_value(kind, column, event);
                    row.push((column.name.clone(), value));
                }
                None => {
                    if let Some(value) = self.additional_value(column, event) {
                        row.push((column.name.clone(), value));
                    }
                }
            }
        }
        row
    }

    fn standard_value(
        &self,
        kind: StandardColumn,
        column: &ResolvedColumn<M::DataType, HostType>,
        event: &LogEvent,
    ) -> ColumnValue {
        match kind {
            StandardColumn::Id => ColumnValue::Null,
            StandardColumn::Message => ColumnValue::from(event.rendered_message.as_str()),
            StandardColumn::MessageTemplate => ColumnValue::from(event.message_template.as_str()),
            StandardColumn::Level => match column.host_type {
                HostType::String => ColumnValue::from(event.level.as_str()),
                _ => ColumnValue::Byte(event.level.ordinal()),
            },
            StandardColumn::TimeStamp => {
                let utc = self.options.timestamp_convert_to_utc;
                match column.host_type {
                    HostType::DateTimeOffset if utc => ColumnValue::DateTimeOffset(
                        event.timestamp.with_timezone(&Utc).fixed_offset(),
                    ),
                    HostType::DateTimeOffset => ColumnValue::DateTimeOffset(event.timestamp),
                    _ if utc => ColumnValue::DateTime(event.timestamp.naive_utc()),
                    _ => ColumnValue::DateTime(event.timestamp.naive_local()),
                }
            }
            StandardColumn::Exception => ColumnValue::from(event.exception.clone()),
            StandardColumn::Properties => ColumnValue::String(self.properties_xml(event)),
            StandardColumn::LogEvent => ColumnValue::String(self.event_json(event)),
        }
    }

    /// The tagged properties text for the properties column.
    pub fn properties_xml(&self, event: &LogEvent) -> String {
        let policy = &self.options.properties;
        let excluded = policy
            .exclude_additional_properties
            .then_some(&self.additional_names);
        let selected = select_properties(
            &event.properties,
            excluded,
            policy.property_filter.as_ref(),
        );
        xml::serialize_properties(selected, policy)
    }

    /// The whole-event document for the log event column.
    pub fn event_json(&self, event: &LogEvent) -> String {
        let policy = &self.options.log_event;

        let standard: Vec<(String, ColumnValue)> = if policy.exclude_standard_columns {
            Vec::new()
        } else {
            self.shape
                .columns()
                .iter()
                .filter_map(|column| match column.standard {
                    Some(
                        StandardColumn::Id | StandardColumn::Properties | StandardColumn::LogEvent,
                    )
                    | None => None,
                    Some(kind) => {
                        Some((column.name.clone(), self.standard_value(kind, column, event)))
                    }
                })
                .collect()
        };

        let excluded = policy
            .exclude_additional_properties
            .then_some(&self.additional_names);
        let selected = select_properties(&event.properties, excluded, None);
        json::event_document(standard, selected).to_string()
    }

    fn additional_value(
        &self,
        column: &ResolvedColumn<M::DataType, HostType>,
        event: &LogEvent,
    ) -> Option<ColumnValue> {
        if self.standard_names.contains(&column.name) {
            return None;
        }
        let property = event.properties.get(&column.name)?;

        let scalar = match property {
            PropertyValue::Scalar(scalar) => scalar,
            other => return Some(ColumnValue::String(other.to_string())),
        };

        if scalar.is_null() && column.allow_null {
            return Some(ColumnValue::Null);
        }

        let value = ColumnValue::coerce(scalar, column.host_type).unwrap_or_else(|| {
            debug!(
                column = %column.name,
                host_type = %column.host_type,
                "Property value not convertible, storing its text"
            );
            ColumnValue::String(property.to_string())
        });
        Some(value)
    }
}

#[cfg(test)]
mod tests;
