//! Sink configuration.
//!
//! Loaded from YAML files and environment variables with the `config` crate.

mod columns;

pub use columns::{
    AdditionalColumnConfig, ColumnOptionsConfig, LevelColumnConfig, LogEventColumnConfig,
    PropertiesColumnConfig, StandardColumnConfig, TimeStampColumnConfig,
};

use serde::Deserialize;

use crate::error::Result;
use crate::sink::{LogTable, DEFAULT_SCHEMA};
use crate::types::SqlTypeMapper;

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "logsink.yaml";
/// Environment variable for configuration file path.
pub const CONFIG_ENV_VAR: &str = "LOGSINK_CONFIG";
/// Prefix for configuration environment variables.
pub const CONFIG_ENV_PREFIX: &str = "LOGSINK";
/// Environment variable for logging configuration.
pub const LOG_ENV_VAR: &str = "LOGSINK_LOG";

/// Log table configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SinkConfig {
    pub table_name: String,
    pub schema_name: String,
    /// Run the creation script when the sink starts.
    pub auto_create_table: bool,
    pub columns: ColumnOptionsConfig,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            table_name: String::new(),
            schema_name: DEFAULT_SCHEMA.to_string(),
            auto_create_table: false,
            columns: ColumnOptionsConfig::default(),
        }
    }
}

impl SinkConfig {
    /// Load configuration from file and environment.
    ///
    /// Configuration sources (in order of priority, later overrides earlier):
    /// 1. `logsink.yaml` in current directory (if exists)
    /// 2. File specified by `path` argument (if provided)
    /// 3. File specified by `LOGSINK_CONFIG` environment variable (if set)
    /// 4. Environment variables with `LOGSINK__` prefix
    pub fn load(path: Option<&str>) -> Result<Self> {
        use ::config::{Config as ConfigLib, Environment, File, FileFormat};

        let mut builder = ConfigLib::builder()
            .add_source(File::new(DEFAULT_CONFIG_FILE, FileFormat::Yaml).required(false));

        if let Some(config_path) = path {
            builder = builder.add_source(File::new(config_path, FileFormat::Yaml).required(true));
        }

        if let Ok(config_path) = std::env::var(CONFIG_ENV_VAR) {
            builder = builder.add_source(File::new(&config_path, FileFormat::Yaml).required(true));
        }

        let config = builder
            .add_source(
                Environment::with_prefix(CONFIG_ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Parse configuration from a YAML document.
    pub fn from_yaml(yaml: &str) -> std::result::Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Build the SQL Server log table this configuration describes.
    pub fn build_table(&self) -> Result<LogTable> {
        let options = self.columns.apply(SqlTypeMapper::new())?;
        LogTable::new(self.table_name.clone(), self.schema_name.clone(), options)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use serial_test::serial;

    use super::*;
    use crate::columns::StandardColumn;
    use crate::error::SinkError;
    use crate::types::SqlDataType;

    const FULL_YAML: &str = r#"
table_name: Logs
schema_name: app
auto_create_table: true
columns:
  remove_standard_columns: [properties]
  add_standard_columns: [log_event]
  id:
    data_type: bigint
  level:
    store_as_enum: true
  timestamp:
    column_name: LoggedAt
    data_type: datetimeoffset
    convert_to_utc: true
  properties:
    omit_element_if_empty: true
    root_element_name: props
  log_event:
    exclude_standard_columns: true
  additional_columns:
    - column_name: Count
      data_type: int
      non_clustered_index: true
    - column_name: Source
      data_length: 64
  clustered_columnstore_index: false
"#;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".yaml")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = SinkConfig::default();
        assert_eq!(config.schema_name, "dbo");
        assert!(!config.auto_create_table);
        assert!(config.columns.store.is_none());
    }

    #[test]
    fn test_from_yaml_applies_columns() {
        let config = SinkConfig::from_yaml(FULL_YAML).unwrap();
        let options = config.columns.apply(SqlTypeMapper::new()).unwrap();

        assert!(!options.is_stored(StandardColumn::Properties));
        assert!(options.is_stored(StandardColumn::LogEvent));
        assert_eq!(
            options.standard_column(StandardColumn::Id).data_type(),
            SqlDataType::BigInt
        );
        assert_eq!(
            options.standard_column(StandardColumn::Level).data_type(),
            SqlDataType::TinyInt
        );
        let timestamp = options.standard_column(StandardColumn::TimeStamp);
        assert_eq!(timestamp.name(), "LoggedAt");
        assert_eq!(timestamp.data_type(), SqlDataType::DateTimeOffset);
        assert!(options.timestamp_convert_to_utc);
        assert!(options.properties.omit_element_if_empty);
        assert_eq!(options.properties.root_element_name, "props");
        assert_eq!(options.properties.item_element_name, "item");
        assert!(options.log_event.exclude_standard_columns);

        let names: Vec<_> = options.additional_columns.iter().map(|c| c.name()).collect();
        assert_eq!(names, ["Count", "Source"]);
        assert!(options.additional_columns[0].non_clustered_index());
        assert_eq!(options.additional_columns[1].data_type(), SqlDataType::VarChar);
        assert_eq!(options.additional_columns[1].data_length(), 64);
    }

    #[test]
    fn test_unknown_type_name_fails() {
        let config = SinkConfig::from_yaml(
            "table_name: Logs\ncolumns:\n  additional_columns:\n    - column_name: X\n      data_type: varchar2\n",
        )
        .unwrap();
        assert!(matches!(
            config.columns.apply(SqlTypeMapper::new()),
            Err(SinkError::UnrecognizedOrUnsupportedType { .. })
        ));
    }

    #[test]
    fn test_standard_type_outside_kind_fails() {
        let config =
            SinkConfig::from_yaml("table_name: Logs\ncolumns:\n  level:\n    data_type: int\n")
                .unwrap();
        assert!(matches!(
            config.build_table(),
            Err(SinkError::UnsupportedColumnType { .. })
        ));
    }

    #[test]
    fn test_build_table_requires_name() {
        assert!(matches!(
            SinkConfig::default().build_table(),
            Err(SinkError::InvalidTableName)
        ));
    }

    #[test]
    #[serial]
    fn test_load_from_file() {
        let file = write_config(FULL_YAML);
        let config = SinkConfig::load(file.path().to_str()).unwrap();
        assert_eq!(config.table_name, "Logs");
        assert_eq!(config.schema_name, "app");
        assert!(config.auto_create_table);

        let table = config.build_table().unwrap();
        assert!(table.create_table_sql().contains("[LoggedAt] DATETIMEOFFSET NOT NULL"));
    }

    #[test]
    #[serial]
    fn test_env_overrides_file() {
        let file = write_config("table_name: Logs\nschema_name: app\n");
        std::env::set_var("LOGSINK__TABLE_NAME", "AuditLogs");
        let config = SinkConfig::load(file.path().to_str());
        std::env::remove_var("LOGSINK__TABLE_NAME");

        let config = config.unwrap();
        assert_eq!(config.table_name, "AuditLogs");
        assert_eq!(config.schema_name, "app");
    }

    #[test]
    #[serial]
    fn test_config_env_var_names_file() {
        let file = write_config("table_name: FromEnvFile\n");
        std::env::set_var(CONFIG_ENV_VAR, file.path());
        let config = SinkConfig::load(None);
        std::env::remove_var(CONFIG_ENV_VAR);

        assert_eq!(config.unwrap().table_name, "FromEnvFile");
    }

    #[test]
    #[serial]
    fn test_missing_explicit_file_fails() {
        assert!(matches!(
            SinkConfig::load(Some("/nonexistent/logsink.yaml")),
            Err(SinkError::Config(_))
        ));
    }
}
