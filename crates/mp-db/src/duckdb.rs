//! DuckDB database backend implementation

use crate::error::{DbError, DbResult};
use crate::traits::Database;
use crate::value::SqlValue;
use async_trait::async_trait;
use duckdb::types::{ToSqlOutput, Value};
use duckdb::{Connection, ToSql};
use std::path::Path;
use std::sync::Mutex;

impl ToSql for SqlValue {
    fn to_sql(&self) -> duckdb::Result<ToSqlOutput<'_>> {
        Ok(match self {
            SqlValue::Null => ToSqlOutput::Owned(Value::Null),
            SqlValue::Int(n) => ToSqlOutput::Owned(Value::BigInt(*n)),
            SqlValue::Text(s) => ToSqlOutput::Owned(Value::Text(s.clone())),
        })
    }
}

/// Read one column as a [`SqlValue`], trying integer, then text, then
/// boolean. A column that matches none of those (or is NULL) reads as Null.
fn read_cell(row: &duckdb::Row<'_>, idx: usize) -> SqlValue {
    if let Ok(Some(n)) = row.get::<_, Option<i64>>(idx) {
        return SqlValue::Int(n);
    }
    if let Ok(Some(s)) = row.get::<_, Option<String>>(idx) {
        return SqlValue::Text(s);
    }
    if let Ok(Some(b)) = row.get::<_, Option<bool>>(idx) {
        return SqlValue::Int(i64::from(b));
    }
    SqlValue::Null
}

/// DuckDB database backend
pub struct DuckDbBackend {
    conn: Mutex<Connection>,
}

impl DuckDbBackend {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path).map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    fn lock(&self) -> DbResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))
    }

    fn execute_sync(&self, sql: &str, params: &[SqlValue]) -> DbResult<usize> {
        let conn = self.lock()?;
        let refs: Vec<&dyn ToSql> = params.iter().map(|p| p as &dyn ToSql).collect();
        conn.execute(sql, refs.as_slice())
            .map_err(|e| DbError::ExecutionError(format!("{}: {}", e, sql)))
    }

    fn execute_batch_sync(&self, sql: &str) -> DbResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(sql)
            .map_err(|e| DbError::ExecutionError(e.to_string()))
    }

    fn query_sync(&self, sql: &str, params: &[SqlValue]) -> DbResult<Vec<Vec<SqlValue>>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| DbError::ExecutionError(format!("{}: {}", e, sql)))?;
        let refs: Vec<&dyn ToSql> = params.iter().map(|p| p as &dyn ToSql).collect();
        // Column count is only available on the row inside query_map;
        // stmt.column_count() panics before execution on recent DuckDB.
        let rows = stmt
            .query_map(refs.as_slice(), |row| {
                let cols = row.as_ref().column_count();
                Ok((0..cols).map(|i| read_cell(row, i)).collect::<Vec<_>>())
            })
            .map_err(|e| DbError::ExecutionError(format!("{}: {}", e, sql)))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| DbError::ExecutionError(e.to_string()))?;
        Ok(rows)
    }
}

#[async_trait]
impl Database for DuckDbBackend {
    async fn execute(&self, sql: &str, params: &[SqlValue]) -> DbResult<usize> {
        self.execute_sync(sql, params)
    }

    async fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.execute_batch_sync(sql)
    }

    async fn query(&self, sql: &str, params: &[SqlValue]) -> DbResult<Vec<Vec<SqlValue>>> {
        self.query_sync(sql, params)
    }

    fn db_type(&self) -> &'static str {
        "duckdb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory() {
        let db = DuckDbBackend::in_memory().unwrap();
        assert_eq!(db.db_type(), "duckdb");
    }

    #[tokio::test]
    async fn test_execute_with_params() {
        let db = DuckDbBackend::in_memory().unwrap();
        db.execute_batch("CREATE TABLE t (id INTEGER, name VARCHAR)")
            .await
            .unwrap();
        let affected = db
            .execute(
                "INSERT INTO t VALUES (?, ?)",
                &[SqlValue::Int(1), SqlValue::Text("one".to_string())],
            )
            .await
            .unwrap();
        assert_eq!(affected, 1);
    }

    #[tokio::test]
    async fn test_query_returns_typed_cells() {
        let db = DuckDbBackend::in_memory().unwrap();
        db.execute_batch(
            "CREATE TABLE t (id INTEGER, name VARCHAR, flag TINYINT);
             INSERT INTO t VALUES (7, 'seven', 1);",
        )
        .await
        .unwrap();

        let rows = db
            .query("SELECT id, name, flag FROM t", &[])
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][0], SqlValue::Int(7));
        assert_eq!(rows[0][1], SqlValue::Text("seven".to_string()));
        assert_eq!(rows[0][2], SqlValue::Int(1));
    }

    #[tokio::test]
    async fn test_query_with_params_and_null() {
        let db = DuckDbBackend::in_memory().unwrap();
        db.execute_batch(
            "CREATE TABLE t (id INTEGER, name VARCHAR);
             INSERT INTO t VALUES (1, NULL), (2, 'two');",
        )
        .await
        .unwrap();

        let rows = db
            .query("SELECT name FROM t WHERE id = ?", &[SqlValue::Int(1)])
            .await
            .unwrap();
        assert_eq!(rows[0][0], SqlValue::Null);

        let rows = db
            .query("SELECT name FROM t WHERE id = ?", &[SqlValue::Int(2)])
            .await
            .unwrap();
        assert_eq!(rows[0][0], SqlValue::Text("two".to_string()));
    }

    #[tokio::test]
    async fn test_show_tables_on_empty_database() {
        let db = DuckDbBackend::in_memory().unwrap();
        let rows = db.query("SHOW TABLES", &[]).await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_execution_error_carries_sql() {
        let db = DuckDbBackend::in_memory().unwrap();
        let err = db.execute("SELECT * FROM missing", &[]).await.unwrap_err();
        assert!(err.to_string().contains("missing"));
    }

    #[tokio::test]
    async fn test_from_path_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("target.duckdb");
        {
            let db = DuckDbBackend::from_path(&path).unwrap();
            db.execute_batch("CREATE TABLE t (id INTEGER)").await.unwrap();
        }
        let db = DuckDbBackend::from_path(&path).unwrap();
        let rows = db.query("SHOW TABLES", &[]).await.unwrap();
        assert_eq!(rows.len(), 1);
    }
}
