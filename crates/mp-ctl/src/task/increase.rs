//! Task: find and apply increment scripts, maintaining the ledger.
//!
//! Appended last in every operation mode. For each business space the task
//! reads the latest recorded version, selects the strictly-newer scripts in
//! ascending tuple order, and applies them one by one: pending ledger row
//! first, then the script's statements (auto-commit, no enclosing
//! transaction), then the success update. A failure mid-script aborts the
//! run and leaves the pending row in place; recovery is manual.

use crate::chain::Task;
use crate::error::CtlResult;
use crate::ledger::{LedgerStore, DATETIME_FMT};
use async_trait::async_trait;
use chrono::Local;
use mp_core::{ScriptCatalog, ScriptFile, ScriptSource, VersionCtlConfig};
use mp_db::Database;
use std::sync::Arc;
use std::time::Instant;

pub struct ApplyIncrementsTask {
    script_dirs: Vec<String>,
    source: Arc<dyn ScriptSource>,
    ledger: LedgerStore,
    install_user: String,
    latest_success_only: bool,
}

impl ApplyIncrementsTask {
    pub fn new(config: &VersionCtlConfig, source: Arc<dyn ScriptSource>) -> Self {
        Self {
            script_dirs: config.script_dirs.clone(),
            source,
            ledger: LedgerStore::new(&config.ledger_table_name),
            install_user: config.install_user.clone(),
            latest_success_only: config.latest_success_only,
        }
    }

    async fn apply_script(&self, db: &dyn Database, script: &ScriptFile) -> CtlResult<()> {
        log::info!("applying increment script {}", script.file_name);
        let statements = script.statements();

        let started = Local::now();
        let timer = Instant::now();
        self.ledger
            .insert_pending(
                db,
                script,
                &started.format(DATETIME_FMT).to_string(),
                &self.install_user,
            )
            .await?;

        for stmt in &statements {
            db.execute(stmt, &[]).await?;
        }

        let elapsed_ms = timer.elapsed().as_millis() as i64;
        self.ledger.mark_success(db, script, elapsed_ms).await?;
        log::info!(
            "script {} executed in {} ms, ledger updated to {}",
            script.file_name,
            elapsed_ms,
            script.qualified_version()
        );
        Ok(())
    }
}

#[async_trait]
impl Task for ApplyIncrementsTask {
    fn name(&self) -> &'static str {
        "apply_increments"
    }

    async fn run(&self, db: &dyn Database) -> CtlResult<bool> {
        let catalog = ScriptCatalog::discover(self.source.as_ref(), &self.script_dirs)?;
        for business_space in catalog.business_spaces() {
            let current = self
                .ledger
                .latest_version(db, business_space, self.latest_success_only)
                .await?
                .unwrap_or_default();
            let pending = catalog.pending(business_space, current);
            if pending.is_empty() {
                log::info!(
                    "business space {} has no increment scripts to apply",
                    business_space
                );
                continue;
            }
            for script in pending {
                self.apply_script(db, script).await?;
            }
        }
        Ok(true)
    }
}
