//! Error types for column mapping, schema generation and provisioning.

/// Result type for sink-core operations.
pub type Result<T> = std::result::Result<T, SinkError>;

/// Boxed error returned by external collaborators (executors, filters).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised by the sink core.
///
/// Construction-time variants are fatal to sink construction. Provisioning
/// and filter failures are reported through `tracing` and recovered locally.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("Database column data type {data_type} is not supported by this sink")]
    UnsupportedColumnType { data_type: String },

    #[error("Column \"{column}\" is of type {data_type} which requires a non-zero data length")]
    MissingLength { column: String, data_type: String },

    #[error("Host type {host_type} does not map to a supported database column data type")]
    NoReverseMapping { host_type: String },

    #[error("Database column data type {name} is not recognized or not supported by this sink")]
    UnrecognizedOrUnsupportedType { name: String },

    #[error("Column name cannot be empty")]
    EmptyColumnName,

    #[error("Duplicate column name: {0}")]
    DuplicateColumnName(String),

    #[error("Table name cannot be empty")]
    InvalidTableName,

    #[error("Exception creating table {table}: {source}")]
    SchemaProvisioningFailed {
        table: String,
        #[source]
        source: BoxError,
    },

    #[error("Unable to filter properties due to the following error: {source}")]
    PropertyFilterFailed {
        #[source]
        source: BoxError,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl SinkError {
    pub(crate) fn unsupported(data_type: impl std::fmt::Display) -> Self {
        Self::UnsupportedColumnType {
            data_type: data_type.to_string(),
        }
    }

    pub(crate) fn missing_length(column: &str, data_type: impl std::fmt::Display) -> Self {
        Self::MissingLength {
            column: column.to_string(),
            data_type: data_type.to_string().to_lowercase(),
        }
    }
}
