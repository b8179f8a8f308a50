//! Task: drop the version ledger table ahead of a baseline reset.

use crate::chain::Task;
use crate::error::CtlResult;
use async_trait::async_trait;
use mp_db::Database;

pub struct DropLedgerTask {
    table: String,
}

impl DropLedgerTask {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
        }
    }
}

#[async_trait]
impl Task for DropLedgerTask {
    fn name(&self) -> &'static str {
        "drop_ledger_table"
    }

    async fn run(&self, db: &dyn Database) -> CtlResult<bool> {
        log::warn!("dropping version ledger table {}", self.table);
        db.execute(&format!("DROP TABLE {}", self.table), &[])
            .await?;
        Ok(true)
    }
}
