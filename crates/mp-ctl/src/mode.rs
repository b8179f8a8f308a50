//! Operation mode resolution.
//!
//! The mode is a pure function of observed database state plus configuration
//! flags, recomputed on every run and never persisted.

use crate::error::CtlResult;
use mp_core::VersionCtlConfig;
use mp_db::Database;
use std::fmt;

/// Deployment strategy chosen for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationMode {
    /// Empty database, first deployment: create the ledger, run everything
    DeployInit,
    /// Ledger exists: run only increments beyond each space's latest version
    DeployIncrease,
    /// Tables exist but no ledger: create it and record the baseline first
    BaselineInit,
    /// Drop and recreate the ledger, re-baseline, then run increments
    BaselineReset,
}

impl fmt::Display for OperationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OperationMode::DeployInit => "DEPLOY_INIT",
            OperationMode::DeployIncrease => "DEPLOY_INCREASE",
            OperationMode::BaselineInit => "BASELINE_INIT",
            OperationMode::BaselineReset => "BASELINE_RESET",
        };
        f.write_str(name)
    }
}

/// Inspect the target database and choose the operation mode.
///
/// Checked in order of cost: table-list emptiness first, then ledger-table
/// presence, then the optional reset override. Reset only ever fires on top
/// of an existing ledger table.
pub async fn resolve_mode(
    db: &dyn Database,
    config: &VersionCtlConfig,
) -> CtlResult<OperationMode> {
    let tables = list_existing_tables(db, config).await?;
    if tables.is_empty() {
        return Ok(OperationMode::DeployInit);
    }
    if tables.iter().any(|t| *t == config.ledger_table_name) {
        if config.baseline_reset
            && !config.baseline_reset_condition.trim().is_empty()
            && reset_condition_holds(db, config).await?
        {
            return Ok(OperationMode::BaselineReset);
        }
        return Ok(OperationMode::DeployIncrease);
    }
    Ok(OperationMode::BaselineInit)
}

/// Run the configured exist-tables query; first column = table name.
async fn list_existing_tables(
    db: &dyn Database,
    config: &VersionCtlConfig,
) -> CtlResult<Vec<String>> {
    let rows = db.query(&config.exist_tables_query, &[]).await?;
    let names = rows
        .iter()
        .filter_map(|row| row.first().and_then(|c| c.as_str()).map(str::to_string))
        .collect();
    Ok(names)
}

async fn reset_condition_holds(db: &dyn Database, config: &VersionCtlConfig) -> CtlResult<bool> {
    let rows = db.query(&config.baseline_reset_condition, &[]).await?;
    Ok(!rows.is_empty())
}

#[cfg(test)]
#[path = "mode_test.rs"]
mod tests;
