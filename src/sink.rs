//! Assembled log table: validated columns, row projection and provisioning.

use async_trait::async_trait;
use tracing::{error, info};

use crate::columns::ColumnSetOptions;
use crate::error::{BoxError, Result, SinkError};
use crate::event::LogEvent;
use crate::projection::RowProjector;
use crate::schema::{render_create_table, TableShape};
use crate::serialize::NameSet;
use crate::types::{ColumnValue, HostType, SqlTypeMapper, TypeMapper};

/// Default schema for log tables.
pub const DEFAULT_SCHEMA: &str = "dbo";

/// Write path capability: run one SQL batch.
///
/// Returns the affected row count as reported by the database.
#[async_trait]
pub trait SqlExecutor: Send + Sync {
    async fn execute(&self, sql: &str) -> std::result::Result<u64, BoxError>;
}

/// One log table and the column configuration it is written with.
#[derive(Debug, Clone)]
pub struct LogTable<M: TypeMapper<HostType = HostType> = SqlTypeMapper> {
    table_name: String,
    schema_name: String,
    projector: RowProjector<M>,
}

impl<M: TypeMapper<HostType = HostType>> LogTable<M> {
    /// Validate the configuration and resolve the table shape.
    ///
    /// Any error here is a configuration error and should stop the sink.
    pub fn new(
        table_name: impl Into<String>,
        schema_name: impl Into<String>,
        options: ColumnSetOptions<M>,
    ) -> Result<Self> {
        let table_name = table_name.into();
        if table_name.trim().is_empty() {
            return Err(SinkError::InvalidTableName);
        }
        let schema_name = schema_name.into();
        let schema_name = if schema_name.trim().is_empty() {
            DEFAULT_SCHEMA.to_string()
        } else {
            schema_name
        };

        let projector = RowProjector::new(options)?;
        Ok(Self {
            table_name,
            schema_name,
            projector,
        })
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn schema_name(&self) -> &str {
        &self.schema_name
    }

    pub fn options(&self) -> &ColumnSetOptions<M> {
        self.projector.options()
    }

    pub fn shape(&self) -> &TableShape<M::DataType, HostType> {
        self.projector.shape()
    }

    pub fn standard_column_names(&self) -> &NameSet {
        self.projector.standard_names()
    }

    pub fn additional_column_names(&self) -> &NameSet {
        self.projector.additional_names()
    }

    /// Whether inserts should fire table triggers.
    pub fn fire_triggers(&self) -> bool {
        !self.options().disable_triggers
    }

    /// Row values for one event, in table column order.
    pub fn columns_and_values(&self, event: &LogEvent) -> Vec<(String, ColumnValue)> {
        self.projector.project(event)
    }

    /// The idempotent creation script for this table.
    pub fn create_table_sql(&self) -> String {
        render_create_table(
            self.options().mapper(),
            &self.schema_name,
            &self.table_name,
            self.shape(),
        )
    }

    /// Create the schema and table if missing.
    ///
    /// Failures are logged and swallowed; the sink carries on assuming the
    /// table already exists. Returns whether the script ran.
    pub async fn provision<E: SqlExecutor + ?Sized>(&self, executor: &E) -> bool {
        let sql = self.create_table_sql();
        match executor.execute(&sql).await {
            Ok(affected) => {
                info!(
                    schema = %self.schema_name,
                    table = %self.table_name,
                    affected,
                    "Log table provisioned"
                );
                true
            }
            Err(source) => {
                let e = SinkError::SchemaProvisioningFailed {
                    table: self.table_name.clone(),
                    source,
                };
                error!(error = %e, table = %self.table_name, "Schema provisioning failed");
                false
            }
        }
    }
}
