use chrono::{DateTime, NaiveDate};

use super::*;
use crate::columns::ColumnSelection;
use crate::event::{LogLevel, ScalarValue};
use crate::types::{SqlDataType, SqlTypeMapper};

fn event() -> LogEvent {
    let ts = DateTime::parse_from_rfc3339("2024-03-01T12:30:00+02:00").unwrap();
    LogEvent::new(ts, LogLevel::Information, "Hello {user}", "Hello \"alice\"")
        .with_property("user", PropertyValue::scalar("alice"))
}

fn options() -> ColumnSetOptions<SqlTypeMapper> {
    ColumnSetOptions::new(SqlTypeMapper::new())
}

fn value<'a>(row: &'a [(String, ColumnValue)], name: &str) -> Option<&'a ColumnValue> {
    row.iter().find(|(n, _)| n == name).map(|(_, v)| v)
}

#[test]
fn test_default_row_skips_identity() {
    let projector = RowProjector::new(options()).unwrap();
    let row = projector.project(&event());
    let names: Vec<_> = row.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(
        names,
        ["Message", "MessageTemplate", "Level", "TimeStamp", "Exception", "Properties"]
    );
    assert_eq!(value(&row, "Message"), Some(&ColumnValue::from("Hello \"alice\"")));
    assert_eq!(value(&row, "MessageTemplate"), Some(&ColumnValue::from("Hello {user}")));
    assert_eq!(value(&row, "Level"), Some(&ColumnValue::from("Information")));
    assert_eq!(value(&row, "Exception"), Some(&ColumnValue::Null));
    assert_eq!(
        value(&row, "Properties"),
        Some(&ColumnValue::from("<properties><item key='user'>alice</item></properties>"))
    );
}

#[test]
fn test_level_as_enum() {
    let mut opts = options();
    opts.set_level_store_as_enum(true);
    let row = RowProjector::new(opts).unwrap().project(&event());
    assert_eq!(value(&row, "Level"), Some(&ColumnValue::Byte(2)));
}

#[test]
fn test_level_typed_tinyint_projects_ordinal() {
    let mut opts = options();
    opts.set_standard_type(StandardColumn::Level, SqlDataType::TinyInt).unwrap();
    let projector = RowProjector::new(opts).unwrap();
    assert_eq!(
        projector.shape().column_exact("Level").map(|c| c.host_type),
        Some(HostType::Byte)
    );

    let row = projector.project(&event());
    assert_eq!(value(&row, "Level"), Some(&ColumnValue::Byte(2)));
}

#[test]
fn test_level_typed_through_descriptor_projects_ordinal() {
    let mut opts = options();
    let mapper = SqlTypeMapper::new();
    opts.standard_column_mut(StandardColumn::Level)
        .set_data_type(&mapper, SqlDataType::TinyInt)
        .unwrap();
    let row = RowProjector::new(opts).unwrap().project(&event());
    assert_eq!(value(&row, "Level"), Some(&ColumnValue::Byte(2)));
}

#[test]
fn test_timestamp_local_and_utc() {
    let local = RowProjector::new(options()).unwrap().project(&event());
    let expected_local = NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(12, 30, 0)
        .unwrap();
    assert_eq!(value(&local, "TimeStamp"), Some(&ColumnValue::DateTime(expected_local)));

    let mut opts = options();
    opts.timestamp_convert_to_utc = true;
    let utc = RowProjector::new(opts).unwrap().project(&event());
    let expected_utc = NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(10, 30, 0)
        .unwrap();
    assert_eq!(value(&utc, "TimeStamp"), Some(&ColumnValue::DateTime(expected_utc)));
}

#[test]
fn test_timestamp_offset_column_keeps_offset() {
    let mut opts = options();
    opts.set_standard_type(StandardColumn::TimeStamp, SqlDataType::DateTimeOffset)
        .unwrap();
    let row = RowProjector::new(opts).unwrap().project(&event());
    assert_eq!(
        value(&row, "TimeStamp"),
        Some(&ColumnValue::DateTimeOffset(event().timestamp))
    );
}

#[test]
fn test_additional_column_coerces_text_to_integer() {
    let mut opts = options();
    opts.add_column("Count", SqlDataType::Int).unwrap();
    let projector = RowProjector::new(opts).unwrap();
    let row = projector.project(&event().with_property("Count", PropertyValue::scalar("42")));
    assert_eq!(value(&row, "Count"), Some(&ColumnValue::Int32(42)));
}

#[test]
fn test_additional_column_match_is_case_sensitive() {
    let mut opts = options();
    opts.add_column("Count", SqlDataType::Int).unwrap();
    let row = RowProjector::new(opts)
        .unwrap()
        .project(&event().with_property("count", PropertyValue::scalar(1)));
    assert_eq!(value(&row, "Count"), None);
}

#[test]
fn test_additional_column_fallbacks() {
    let mut opts = options();
    opts.add_column("Count", SqlDataType::Int).unwrap();
    opts.add_column("Required", SqlDataType::Int)
        .unwrap()
        .set_allow_null(false);
    opts.add_column("Nullable", SqlDataType::Int).unwrap();
    opts.add_column("Tags", SqlDataType::NVarChar).unwrap();
    let projector = RowProjector::new(opts).unwrap();

    let event = event()
        .with_property("Count", PropertyValue::scalar("many"))
        .with_property("Required", PropertyValue::null())
        .with_property("Nullable", PropertyValue::null())
        .with_property(
            "Tags",
            PropertyValue::Sequence(vec![PropertyValue::scalar("a"), PropertyValue::scalar(1)]),
        );
    let row = projector.project(&event);

    assert_eq!(value(&row, "Count"), Some(&ColumnValue::from("\"many\"")));
    assert_eq!(value(&row, "Required"), Some(&ColumnValue::from("null")));
    assert_eq!(value(&row, "Nullable"), Some(&ColumnValue::Null));
    assert_eq!(value(&row, "Tags"), Some(&ColumnValue::from("[\"a\", 1]")));
}

#[test]
fn test_properties_exclude_additional_columns() {
    let mut opts = options();
    opts.add_column("Count", SqlDataType::Int).unwrap();
    opts.properties.exclude_additional_properties = true;
    let projector = RowProjector::new(opts).unwrap();
    let xml = projector.properties_xml(&event().with_property("Count", PropertyValue::scalar(3)));
    assert_eq!(xml, "<properties><item key='user'>alice</item></properties>");
}

#[test]
fn test_log_event_document() {
    let mut opts = options();
    opts.set_store(ColumnSelection::Only(vec![
        StandardColumn::Message,
        StandardColumn::Level,
        StandardColumn::LogEvent,
    ]));
    let projector = RowProjector::new(opts).unwrap();
    let row = projector.project(&event());
    assert_eq!(
        value(&row, "LogEvent"),
        Some(&ColumnValue::from(
            r#"{"Message":"Hello \"alice\"","Level":"Information","Properties":{"user":"alice"}}"#
        ))
    );
}

#[test]
fn test_log_event_document_exclusions() {
    let mut opts = options();
    opts.add_standard_column(StandardColumn::LogEvent);
    opts.add_column("user", SqlDataType::NVarChar).unwrap();
    opts.log_event.exclude_standard_columns = true;
    opts.log_event.exclude_additional_properties = true;
    let projector = RowProjector::new(opts).unwrap();
    assert_eq!(projector.event_json(&event()), "{}");
}

#[test]
fn test_decimal_and_guid_coercion() {
    let mut opts = options();
    opts.add_column("Amount", SqlDataType::Money).unwrap();
    opts.add_column("Correlation", SqlDataType::UniqueIdentifier).unwrap();
    let projector = RowProjector::new(opts).unwrap();
    let id = uuid::Uuid::new_v4();
    let row = projector.project(
        &event()
            .with_property("Amount", PropertyValue::scalar(12.5))
            .with_property("Correlation", PropertyValue::Scalar(ScalarValue::from(id.to_string()))),
    );
    assert!(matches!(value(&row, "Amount"), Some(ColumnValue::Decimal(_))));
    assert_eq!(value(&row, "Correlation"), Some(&ColumnValue::Guid(id)));
}
