//! CREATE SCHEMA / CREATE TABLE script generation.
//!
//! The script is idempotent: both the schema and the table are guarded by
//! existence checks, so running it against a provisioned database is a no-op.

use tracing::{debug, warn};

use super::{ResolvedColumn, TableShape};
use crate::columns::ColumnSetOptions;
use crate::error::Result;
use crate::types::TypeMapper;

/// Resolve the table shape and render its creation script.
pub fn create_table_sql<M: TypeMapper>(
    schema_name: &str,
    table_name: &str,
    options: &ColumnSetOptions<M>,
) -> Result<String> {
    let shape = TableShape::resolve(options)?;
    Ok(render_create_table(options.mapper(), schema_name, table_name, &shape))
}

/// Render the creation script for an already-resolved shape.
///
/// Index numbering restarts at 1 on every call.
pub fn render_create_table<M: TypeMapper>(
    mapper: &M,
    schema_name: &str,
    table_name: &str,
    shape: &TableShape<M::DataType, M::HostType>,
) -> String {
    let schema = quote_identifier(schema_name);
    let table = quote_identifier(table_name);
    let qualified = format!("{schema}.{table}");

    let mut sql = String::new();

    // CREATE SCHEMA must be alone in its batch, hence EXEC.
    sql.push_str(&format!(
        "IF(NOT EXISTS(SELECT * FROM sys.schemas WHERE name = '{}'))\n",
        quote_literal(schema_name)
    ));
    sql.push_str("BEGIN\n");
    sql.push_str(&format!(
        "EXEC('CREATE SCHEMA {} AUTHORIZATION [dbo]')\n",
        quote_literal(&schema)
    ));
    sql.push_str("END\n");

    sql.push_str(&format!(
        "IF NOT EXISTS (SELECT s.name, t.name FROM sys.tables t JOIN sys.schemas s ON t.schema_id = s.schema_id WHERE s.name = '{}' AND t.name = '{}')\n",
        quote_literal(schema_name),
        quote_literal(table_name)
    ));
    sql.push_str("BEGIN\n");
    sql.push_str(&format!("CREATE TABLE {qualified} ( \n"));

    let clauses: Vec<String> = shape
        .columns()
        .iter()
        .map(|column| column_clause(mapper, column))
        .collect();
    sql.push_str(&clauses.join(",\n"));

    if let Some(pk) = shape.primary_key() {
        let clustering = if pk.non_clustered_index || shape.clustered_columnstore_index() {
            "NON"
        } else {
            ""
        };
        sql.push_str(&format!(
            ",\n CONSTRAINT {} PRIMARY KEY {clustering}CLUSTERED ({})",
            quote_identifier(&format!("PK_{table_name}")),
            quote_identifier(&pk.name)
        ));
    }
    sql.push_str("\n);\n");

    if shape.clustered_columnstore_index() {
        for column in shape.columns() {
            if !mapper.is_compact_storage_compatible(column.data_type) {
                warn!(
                    table = %table_name,
                    column = %column.name,
                    data_type = %column.data_type,
                    "Column type is not supported in a clustered columnstore index"
                );
            }
        }
        sql.push_str(&format!(
            "CREATE CLUSTERED COLUMNSTORE INDEX {} ON {qualified}\n",
            quote_identifier(&format!("CCI_{table_name}"))
        ));
    }

    let pk_name = shape.primary_key().map(|pk| pk.name.as_str());
    let mut index_count = 1;
    for column in shape.columns() {
        if !column.non_clustered_index || pk_name == Some(column.name.as_str()) {
            continue;
        }
        sql.push_str(&format!(
            "CREATE NONCLUSTERED INDEX {} ON {qualified} ({});\n",
            quote_identifier(&format!("IX{index_count}_{table_name}")),
            quote_identifier(&column.name)
        ));
        index_count += 1;
    }

    sql.push_str("END\n");

    debug!(
        table = %table_name,
        columns = shape.columns().len(),
        indexes = index_count - 1,
        "Generated table DDL"
    );
    sql
}

/// `[Name] TYPE[(len|MAX)][ IDENTITY(1,1)] NULL|NOT NULL`
fn column_clause<M: TypeMapper>(
    mapper: &M,
    column: &ResolvedColumn<M::DataType, M::HostType>,
) -> String {
    let mut clause = format!(
        "{} {}",
        quote_identifier(&column.name),
        mapper.type_sql(column.data_type)
    );
    match column.max_length {
        Some(-1) => clause.push_str("(MAX)"),
        Some(length) => clause.push_str(&format!("({length})")),
        None => {}
    }
    if column.is_identity() {
        clause.push_str(" IDENTITY(1,1)");
    }
    clause.push_str(if column.allow_null { " NULL" } else { " NOT NULL" });
    clause
}

/// Bracket-quote an identifier.
pub(crate) fn quote_identifier(name: &str) -> String {
    format!("[{}]", name.replace(']', "]]"))
}

/// Escape text for a single-quoted string literal.
pub(crate) fn quote_literal(value: &str) -> String {
    value.replace('\'', "''")
}
