//! Embedded default ledger DDL.
//!
//! The bundled create script is written against [`DEFAULT_TABLE_NAME`];
//! [`render_create`] substitutes a differently-configured table name into it
//! before execution. Caller-supplied create scripts are executed as-is.

/// Table name the bundled DDL is written against.
pub const DEFAULT_TABLE_NAME: &str = "milepost_version_ledger";

/// Bundled ledger create script.
pub const DEFAULT_CREATE_SQL: &str = include_str!("create_milepost_version_ledger.sql");

/// The bundled create script with `table` substituted for the default name.
///
/// Also renames the id sequence, which embeds the table name.
pub fn render_create(table: &str) -> String {
    if table == DEFAULT_TABLE_NAME {
        DEFAULT_CREATE_SQL.to_string()
    } else {
        DEFAULT_CREATE_SQL.replace(DEFAULT_TABLE_NAME, table)
    }
}
