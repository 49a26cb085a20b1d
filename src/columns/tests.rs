use super::*;
use crate::types::{HostType, SqlDataType, SqlTypeMapper};

fn mapper() -> SqlTypeMapper {
    SqlTypeMapper::new()
}

#[test]
fn test_standard_column_names_parse() {
    assert_eq!("timestamp".parse::<StandardColumn>(), Ok(StandardColumn::TimeStamp));
    assert_eq!("message_template".parse::<StandardColumn>(), Ok(StandardColumn::MessageTemplate));
    assert_eq!("LogEvent".parse::<StandardColumn>(), Ok(StandardColumn::LogEvent));
    assert!("Severity".parse::<StandardColumn>().is_err());
}

#[test]
fn test_new_rejects_unsupported_type() {
    let result = ColumnDescriptor::new(&mapper(), "Blob", SqlDataType::Image);
    assert!(matches!(result, Err(SinkError::UnsupportedColumnType { .. })));
}

#[test]
fn test_standard_name_falls_back_when_unset() {
    let mut column = ColumnDescriptor::standard(&mapper(), StandardColumn::MessageTemplate);
    assert_eq!(column.name(), "MessageTemplate");

    column.set_name("Template");
    assert_eq!(column.name(), "Template");

    column.set_name("  ");
    assert_eq!(column.name(), "MessageTemplate");
}

#[test]
fn test_additional_column_keeps_empty_name() {
    let mut column = ColumnDescriptor::new(&mapper(), "Count", SqlDataType::Int).unwrap();
    column.set_name("");
    assert_eq!(column.name(), "");
    assert!(matches!(
        column.to_schema_column(&mapper()),
        Err(SinkError::EmptyColumnName)
    ));
}

#[test]
fn test_identity_is_never_nullable() {
    let mut id = ColumnDescriptor::standard(&mapper(), StandardColumn::Id);
    id.set_allow_null(true);
    assert!(!id.allow_null());
    assert!(!id.to_schema_column(&mapper()).unwrap().allow_null);
}

#[test]
fn test_standard_type_restricted_to_kind() {
    let m = mapper();
    let mut level = ColumnDescriptor::standard(&m, StandardColumn::Level);
    assert!(level.set_data_type(&m, SqlDataType::TinyInt).is_ok());
    assert!(matches!(
        level.set_data_type(&m, SqlDataType::BigInt),
        Err(SinkError::UnsupportedColumnType { .. })
    ));
    assert_eq!(level.data_type(), SqlDataType::TinyInt);

    let mut properties = ColumnDescriptor::standard(&m, StandardColumn::Properties);
    assert!(properties.set_data_type_name(&m, "xml").is_ok());
}

#[test]
fn test_zero_length_is_missing_length() {
    let m = mapper();
    let column = ColumnDescriptor::new(&m, "Code", SqlDataType::NVarChar)
        .unwrap()
        .with_data_length(0);
    match column.to_schema_column(&m) {
        Err(SinkError::MissingLength { column, data_type }) => {
            assert_eq!(column, "Code");
            assert_eq!(data_type, "nvarchar");
        }
        other => panic!("expected MissingLength, got {other:?}"),
    }
}

#[test]
fn test_max_length_is_valid() {
    let m = mapper();
    let column = ColumnDescriptor::new(&m, "Code", SqlDataType::VarChar).unwrap();
    let schema = column.to_schema_column(&m).unwrap();
    assert_eq!(schema.max_length, Some(-1));
    assert_eq!(schema.host_type, HostType::String);

    let int = ColumnDescriptor::new(&m, "Count", SqlDataType::Int)
        .unwrap()
        .with_data_length(0);
    assert_eq!(int.to_schema_column(&m).unwrap().max_length, None);
}

#[test]
fn test_from_external_column() {
    let m = mapper();
    let external = ExternalColumn {
        name: "Elapsed".to_string(),
        host_type: HostType::Double,
        allow_null: false,
        max_length: -1,
    };
    let column = ColumnDescriptor::from_external(&m, &external).unwrap();
    assert_eq!(column.data_type(), SqlDataType::Float);
    assert!(!column.allow_null());

    let text = ExternalColumn {
        name: "Tag".to_string(),
        host_type: HostType::String,
        allow_null: true,
        max_length: 0,
    };
    assert!(matches!(
        ColumnDescriptor::from_external(&m, &text),
        Err(SinkError::MissingLength { .. })
    ));
}

#[test]
fn test_from_external_without_reverse_mapping() {
    let external = ExternalColumn {
        name: "Payload".to_string(),
        host_type: HostType::Bytes,
        allow_null: true,
        max_length: -1,
    };
    assert!(matches!(
        ColumnDescriptor::from_external(&mapper(), &external),
        Err(SinkError::NoReverseMapping { .. })
    ));
}

#[test]
fn test_default_store_excludes_log_event() {
    let options = ColumnSetOptions::new(mapper());
    let names: Vec<_> = options.active_columns().iter().map(|c| c.name()).collect();
    assert_eq!(
        names,
        [
            "Id",
            "Message",
            "MessageTemplate",
            "Level",
            "TimeStamp",
            "Exception",
            "Properties"
        ]
    );
}

#[test]
fn test_active_columns_follow_canonical_then_declaration_order() {
    let mut options = ColumnSetOptions::new(mapper());
    options.set_store(ColumnSelection::Only(vec![
        StandardColumn::LogEvent,
        StandardColumn::Message,
        StandardColumn::Id,
    ]));
    options.add_column("Zeta", SqlDataType::Int).unwrap();
    options.add_column("Alpha", SqlDataType::Int).unwrap();

    let names: Vec<_> = options.active_columns().iter().map(|c| c.name()).collect();
    assert_eq!(names, ["Id", "Message", "LogEvent", "Zeta", "Alpha"]);
}

#[test]
fn test_remove_and_re_add_keeps_customization() {
    let mut options = ColumnSetOptions::new(mapper());
    options
        .standard_column_mut(StandardColumn::Exception)
        .set_name("Error");

    options.remove_standard_column(StandardColumn::Exception);
    assert!(!options.is_stored(StandardColumn::Exception));
    assert!(options.active_columns().iter().all(|c| c.name() != "Error"));

    options.add_standard_column(StandardColumn::Exception);
    assert!(options.active_columns().iter().any(|c| c.name() == "Error"));
}

#[test]
fn test_add_standard_column_from_default_selection() {
    let mut options = ColumnSetOptions::new(mapper());
    options.add_standard_column(StandardColumn::LogEvent);
    assert_eq!(options.store().columns(), StandardColumn::ALL.to_vec());
}

#[test]
fn test_primary_key_degrades_when_column_removed() {
    let mut options = ColumnSetOptions::new(mapper());
    assert_eq!(
        options.resolved_primary_key().map(|c| c.name()),
        Some("Id")
    );

    options.remove_standard_column(StandardColumn::Id);
    assert!(options.resolved_primary_key().is_none());
}

#[test]
fn test_named_primary_key_matches_additional_column() {
    let mut options = ColumnSetOptions::new(mapper());
    options.add_column("EventId", SqlDataType::UniqueIdentifier).unwrap();
    options.primary_key = Some(PrimaryKey::Named("eventid".to_string()));
    assert_eq!(
        options.resolved_primary_key().map(|c| c.name()),
        Some("EventId")
    );
}

#[test]
fn test_level_store_as_enum_switches_type() {
    let mut options = ColumnSetOptions::new(mapper());
    options.set_level_store_as_enum(true);
    assert_eq!(
        options.standard_column(StandardColumn::Level).data_type(),
        SqlDataType::TinyInt
    );
    options.set_level_store_as_enum(false);
    assert_eq!(
        options.standard_column(StandardColumn::Level).data_type(),
        SqlDataType::NVarChar
    );
}

#[test]
fn test_level_type_keeps_store_as_enum_in_sync() {
    let mut options = ColumnSetOptions::new(mapper());
    options.set_standard_type(StandardColumn::Level, SqlDataType::TinyInt).unwrap();
    assert!(options.level_store_as_enum());

    options.set_standard_type_name(StandardColumn::Level, "nvarchar").unwrap();
    assert!(!options.level_store_as_enum());
}

#[test]
fn test_validate_names_rejects_case_insensitive_duplicates() {
    let mut options = ColumnSetOptions::new(mapper());
    options.add_column("message", SqlDataType::NVarChar).unwrap();
    assert!(matches!(
        options.validate_names(),
        Err(SinkError::DuplicateColumnName(name)) if name == "message"
    ));
}
