//! Task: insert baseline version records.

use crate::chain::Task;
use crate::error::CtlResult;
use crate::ledger::{LedgerStore, DATETIME_FMT};
use async_trait::async_trait;
use chrono::Local;
use mp_core::{parse_baseline_spec, BaselineEntry, VersionCtlConfig};
use mp_db::Database;

/// Writes one BaseLine ledger row per entry of the configured baseline spec.
pub struct InsertBaselineTask {
    entries: Vec<BaselineEntry>,
    ledger: LedgerStore,
    install_user: String,
}

impl InsertBaselineTask {
    /// Parse the baseline spec up front, failing fast on a blank or
    /// malformed spec before any database interaction.
    pub fn new(config: &VersionCtlConfig) -> CtlResult<Self> {
        let spec = config.baseline_versions.as_deref().unwrap_or("");
        let entries = parse_baseline_spec(spec)?;
        Ok(Self {
            entries,
            ledger: LedgerStore::new(&config.ledger_table_name),
            install_user: config.install_user.clone(),
        })
    }
}

#[async_trait]
impl Task for InsertBaselineTask {
    fn name(&self) -> &'static str {
        "insert_baseline"
    }

    async fn run(&self, db: &dyn Database) -> CtlResult<bool> {
        let install_time = Local::now().format(DATETIME_FMT).to_string();
        for entry in &self.entries {
            self.ledger
                .insert_baseline(db, entry, &install_time, &self.install_user)
                .await?;
            log::info!(
                "baseline recorded: business space {} at {}",
                entry.business_space,
                entry.version
            );
        }
        Ok(true)
    }
}
