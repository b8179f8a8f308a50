//! Task: create the version ledger table.

use crate::chain::Task;
use crate::ddl;
use crate::error::{CtlError, CtlResult};
use async_trait::async_trait;
use mp_core::{split_statements, ScriptSource, VersionCtlConfig};
use mp_db::Database;

/// Creates the ledger table from the configured create script, or from the
/// bundled DDL (with the table name substituted) when no path is configured.
pub struct CreateLedgerTask {
    statements: Vec<String>,
}

impl CreateLedgerTask {
    /// Resolve and parse the create script. Fails fast if a configured path
    /// resolves to nothing.
    pub fn new(config: &VersionCtlConfig, source: &dyn ScriptSource) -> CtlResult<Self> {
        let sql = match &config.ledger_create_sql_path {
            Some(path) => source
                .load(path)?
                .ok_or_else(|| CtlError::ResourceNotFound { path: path.clone() })?,
            None => ddl::render_create(&config.ledger_table_name),
        };
        Ok(Self {
            statements: split_statements(&sql),
        })
    }
}

#[async_trait]
impl Task for CreateLedgerTask {
    fn name(&self) -> &'static str {
        "create_ledger_table"
    }

    async fn run(&self, db: &dyn Database) -> CtlResult<bool> {
        for stmt in &self.statements {
            db.execute(stmt, &[]).await?;
        }
        Ok(true)
    }
}
