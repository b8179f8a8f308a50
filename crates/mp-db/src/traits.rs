//! Database trait definition

use crate::error::DbResult;
use crate::value::SqlValue;
use async_trait::async_trait;

/// Database abstraction trait for Milepost
///
/// One implementation instance represents one working connection held for a
/// whole run, with auto-commit semantics: every executed statement is its
/// own atomic unit. Implementations must be Send + Sync.
#[async_trait]
pub trait Database: Send + Sync {
    /// Execute a single statement with bind parameters, returning the number
    /// of affected rows
    async fn execute(&self, sql: &str, params: &[SqlValue]) -> DbResult<usize>;

    /// Execute multiple `;`-separated statements without parameters
    async fn execute_batch(&self, sql: &str) -> DbResult<()>;

    /// Run a query, returning every row as a vector of cells in select-list
    /// order
    async fn query(&self, sql: &str, params: &[SqlValue]) -> DbResult<Vec<Vec<SqlValue>>>;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}
