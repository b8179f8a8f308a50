//! Task: alter an existing version ledger table.
//!
//! Runs only during DEPLOY_INCREASE and only when the `modify_ledger_table`
//! flag is set, executing the caller's alteration script as-is.

use crate::chain::Task;
use crate::error::{CtlError, CtlResult};
use async_trait::async_trait;
use mp_core::{split_statements, CoreError, ScriptSource, VersionCtlConfig};
use mp_db::Database;

pub struct ModifyLedgerTask {
    statements: Vec<String>,
}

impl ModifyLedgerTask {
    pub fn new(config: &VersionCtlConfig, source: &dyn ScriptSource) -> CtlResult<Self> {
        let path =
            config
                .ledger_modify_sql_path
                .as_ref()
                .ok_or_else(|| CoreError::ConfigInvalid {
                    message: "ledger_modify_sql_path is absent".to_string(),
                })?;
        let sql = source
            .load(path)?
            .ok_or_else(|| CtlError::ResourceNotFound { path: path.clone() })?;
        Ok(Self {
            statements: split_statements(&sql),
        })
    }
}

#[async_trait]
impl Task for ModifyLedgerTask {
    fn name(&self) -> &'static str {
        "modify_ledger_table"
    }

    async fn run(&self, db: &dyn Database) -> CtlResult<bool> {
        for stmt in &self.statements {
            db.execute(stmt, &[]).await?;
        }
        Ok(true)
    }
}
