//! Configuration for a version-control run.
//!
//! The config is an embeddable object owned by the caller and immutable for
//! the duration of a run. It deserializes from YAML with sensible defaults
//! for everything except the script directory list.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};

/// Main run configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VersionCtlConfig {
    /// Where scripts are loaded from
    #[serde(default)]
    pub script_resource_mode: ScriptResourceMode,

    /// Directories containing increment SQL scripts
    pub script_dirs: Vec<String>,

    /// Baseline spec, e.g. `"orders_V2.0.0,billing_V1.1.2"`.
    /// Required only when a run resolves to BASELINE_INIT or BASELINE_RESET.
    #[serde(default)]
    pub baseline_versions: Option<String>,

    /// Name of the version ledger table
    #[serde(default = "default_ledger_table_name")]
    pub ledger_table_name: String,

    /// Path of a custom ledger create script; the bundled DDL is used when
    /// absent
    #[serde(default)]
    pub ledger_create_sql_path: Option<String>,

    /// Path of the ledger alteration script, consulted only when
    /// `modify_ledger_table` is set
    #[serde(default)]
    pub ledger_modify_sql_path: Option<String>,

    /// Run the ledger alteration script during DEPLOY_INCREASE
    #[serde(default)]
    pub modify_ledger_table: bool,

    /// Query listing every table in the target database, first column =
    /// table name
    #[serde(default = "default_exist_tables_query")]
    pub exist_tables_query: String,

    /// Allow baseline reset when the reset condition holds
    #[serde(default)]
    pub baseline_reset: bool,

    /// Reset gating query; reset fires only if this is non-blank and returns
    /// at least one row
    #[serde(default)]
    pub baseline_reset_condition: String,

    /// Username recorded as `install_user` on every ledger row
    #[serde(default = "default_install_user")]
    pub install_user: String,

    /// When set, "latest recorded version" considers only `success = 1`
    /// rows, so a row left pending by a failed run does not mask the failure
    #[serde(default)]
    pub latest_success_only: bool,

    /// Target database connection settings
    #[serde(default)]
    pub database: DatabaseConfig,
}

/// Where the engine loads SQL scripts from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptResourceMode {
    /// Scripts live on the local filesystem (built-in source)
    #[default]
    Filesystem,
    /// Scripts ship inside the binary; the caller supplies the source
    Embedded,
}

/// Target database connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Database file path, `:memory:` for an in-memory target
    #[serde(default = "default_database_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

fn default_ledger_table_name() -> String {
    "milepost_version_ledger".to_string()
}

fn default_exist_tables_query() -> String {
    "SHOW TABLES".to_string()
}

fn default_install_user() -> String {
    "unknown".to_string()
}

fn default_database_path() -> String {
    ":memory:".to_string()
}

impl VersionCtlConfig {
    /// Minimal config over `script_dirs` with every other field defaulted.
    pub fn new(script_dirs: Vec<String>) -> Self {
        Self {
            script_resource_mode: ScriptResourceMode::default(),
            script_dirs,
            baseline_versions: None,
            ledger_table_name: default_ledger_table_name(),
            ledger_create_sql_path: None,
            ledger_modify_sql_path: None,
            modify_ledger_table: false,
            exist_tables_query: default_exist_tables_query(),
            baseline_reset: false,
            baseline_reset_condition: String::new(),
            install_user: default_install_user(),
            latest_success_only: false,
            database: DatabaseConfig::default(),
        }
    }

    /// Parse a config from YAML text.
    pub fn from_yaml(yaml: &str) -> CoreResult<Self> {
        serde_yaml::from_str(yaml).map_err(|e| CoreError::ConfigInvalid {
            message: e.to_string(),
        })
    }

    /// Validate fields a run depends on, before touching the database.
    pub fn validate(&self) -> CoreResult<()> {
        if self.script_dirs.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "script_dirs is empty".to_string(),
            });
        }
        if self.script_dirs.iter().any(|d| d.trim().is_empty()) {
            return Err(CoreError::ConfigInvalid {
                message: "script_dirs contains a blank entry".to_string(),
            });
        }
        if self.ledger_table_name.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "ledger_table_name is blank".to_string(),
            });
        }
        if self.exist_tables_query.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "exist_tables_query is blank".to_string(),
            });
        }
        if self.modify_ledger_table && self.ledger_modify_sql_path.is_none() {
            return Err(CoreError::ConfigInvalid {
                message: "modify_ledger_table is set but ledger_modify_sql_path is absent"
                    .to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
