//! Run orchestration: resolve the operation mode, assemble the task chain,
//! and drive it against one long-lived connection.

use crate::chain::TaskChain;
use crate::error::{CtlError, CtlResult};
use crate::mode::{resolve_mode, OperationMode};
use crate::task::{
    ApplyIncrementsTask, CreateLedgerTask, DropLedgerTask, InsertBaselineTask, ModifyLedgerTask,
};
use mp_core::{FilesystemSource, ScriptResourceMode, ScriptSource, VersionCtlConfig};
use mp_db::{Database, DuckDbBackend};
use std::sync::Arc;

/// The version-control engine entry point.
///
/// Holds the run's configuration, its database handle, and its script
/// source. The database handle represents the one working connection used
/// for the whole chain; it is released when the last `Arc` drops, on every
/// exit path including errors.
pub struct VersionCtl {
    config: VersionCtlConfig,
    db: Arc<dyn Database>,
    source: Arc<dyn ScriptSource>,
}

impl std::fmt::Debug for VersionCtl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VersionCtl")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl VersionCtl {
    /// Build a controller over a caller-supplied database, loading scripts
    /// from the filesystem.
    ///
    /// Fails when the config asks for `embedded` resources — those need
    /// [`VersionCtl::with_source`].
    pub fn new(config: VersionCtlConfig, db: Arc<dyn Database>) -> CtlResult<Self> {
        if config.script_resource_mode == ScriptResourceMode::Embedded {
            return Err(CtlError::MissingScriptSource);
        }
        Ok(Self {
            config,
            db,
            source: Arc::new(FilesystemSource),
        })
    }

    /// Build a controller with a caller-supplied script source (the
    /// `embedded` resource mode).
    pub fn with_source(
        config: VersionCtlConfig,
        db: Arc<dyn Database>,
        source: Arc<dyn ScriptSource>,
    ) -> Self {
        Self { config, db, source }
    }

    /// Open a DuckDB connection from `config.database` and build a
    /// controller over it.
    pub fn connect(config: VersionCtlConfig) -> CtlResult<Self> {
        let db = Arc::new(DuckDbBackend::new(&config.database.path)?);
        Self::new(config, db)
    }

    /// Execute one version-control run.
    ///
    /// Validates the configuration, resolves the operation mode, assembles
    /// the task chain for that mode, and drives it to completion. Returns
    /// the resolved mode. Any error aborts the remaining chain.
    pub async fn run(&self) -> CtlResult<OperationMode> {
        self.config.validate()?;
        let db = self.db.as_ref();
        log::info!("version control run begin ({})", db.db_type());

        let mode = resolve_mode(db, &self.config).await?;
        log::info!("operation mode: {mode}");

        let chain = self.assemble_chain(mode)?;
        log::debug!("task chain: {:?}", chain.task_names());
        chain.run(db).await?;

        log::info!("version control run end");
        Ok(mode)
    }

    /// Append tasks in the fixed per-mode order; every mode ends with
    /// apply-increments.
    fn assemble_chain(&self, mode: OperationMode) -> CtlResult<TaskChain> {
        let config = &self.config;
        let source = self.source.as_ref();
        let mut chain = TaskChain::new();
        match mode {
            OperationMode::DeployInit => {
                chain.push(Box::new(CreateLedgerTask::new(config, source)?));
            }
            OperationMode::BaselineInit => {
                chain.push(Box::new(CreateLedgerTask::new(config, source)?));
                chain.push(Box::new(InsertBaselineTask::new(config)?));
            }
            OperationMode::BaselineReset => {
                chain.push(Box::new(DropLedgerTask::new(&config.ledger_table_name)));
                chain.push(Box::new(CreateLedgerTask::new(config, source)?));
                chain.push(Box::new(InsertBaselineTask::new(config)?));
            }
            OperationMode::DeployIncrease => {
                if config.modify_ledger_table {
                    chain.push(Box::new(ModifyLedgerTask::new(config, source)?));
                }
            }
        }
        chain.push(Box::new(ApplyIncrementsTask::new(
            config,
            Arc::clone(&self.source),
        )));
        Ok(chain)
    }
}

#[cfg(test)]
#[path = "controller_test.rs"]
mod tests;
