//! Print the creation script for a configured log table.
//!
//! Usage: `logsink-ddl [config.yaml]`. Without an argument, configuration
//! comes from `logsink.yaml`, `LOGSINK_CONFIG` and `LOGSINK__*` variables.

use std::env;

use tracing::{error, info};

use mssql_logsink::utils::bootstrap::init_tracing;
use mssql_logsink::SinkConfig;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let path = env::args().nth(1);
    let config = SinkConfig::load(path.as_deref())?;

    let table = match config.build_table() {
        Ok(table) => table,
        Err(e) => {
            error!(error = %e, "Invalid log table configuration");
            return Err(e.into());
        }
    };

    info!(
        schema = %table.schema_name(),
        table = %table.table_name(),
        columns = table.shape().columns().len(),
        "Generating log table DDL"
    );
    println!("{}", table.create_table_sql());
    Ok(())
}
