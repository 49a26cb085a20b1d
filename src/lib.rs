//! SQL Server log sink core.
//!
//! Maps log events onto a relational table: column type mapping and
//! validation, table DDL generation, and flattening of nested event
//! properties into tagged text or a JSON document.
//!
//! ```no_run
//! use mssql_logsink::{ColumnSetOptions, LogTable, SqlDataType, SqlTypeMapper};
//!
//! let mut options = ColumnSetOptions::new(SqlTypeMapper::new());
//! options.add_column("UserId", SqlDataType::Int)?;
//! let table = LogTable::new("Logs", "dbo", options)?;
//! println!("{}", table.create_table_sql());
//! # Ok::<(), mssql_logsink::SinkError>(())
//! ```

pub mod columns;
pub mod config;
pub mod error;
pub mod event;
pub mod projection;
pub mod schema;
pub mod serialize;
pub mod sink;
pub mod types;
pub mod utils;

pub use columns::{
    ColumnDescriptor, ColumnSelection, ColumnSetOptions, ExternalColumn, PrimaryKey,
    SchemaColumn, StandardColumn,
};
pub use config::SinkConfig;
pub use error::{BoxError, Result, SinkError};
pub use event::{LogEvent, LogLevel, PropertyValue, ScalarValue};
pub use projection::RowProjector;
pub use schema::{create_table_sql, ResolvedColumn, TableShape};
pub use serialize::{LogEventPolicy, NameSet, PropertyFilter, SerializationPolicy};
pub use sink::{LogTable, SqlExecutor};
pub use types::{ColumnValue, HostType, SqlDataType, SqlTypeMapper, TypeMapper};
