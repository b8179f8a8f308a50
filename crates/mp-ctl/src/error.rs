//! Error types for mp-ctl

use thiserror::Error;

/// Orchestration errors
#[derive(Error, Debug)]
pub enum CtlError {
    /// V001: Configured create/modify script path resolves to nothing
    #[error("[V001] Resource not found: {path}")]
    ResourceNotFound { path: String },

    /// V002: A ledger row came back with an unexpected shape
    #[error("[V002] Malformed ledger row: {message}")]
    LedgerRow { message: String },

    /// V003: Embedded resource mode requires a caller-supplied source
    #[error("[V003] Script resource mode is 'embedded' but no ScriptSource was supplied")]
    MissingScriptSource,

    /// V004: Core error propagation
    #[error("[V004] Core error: {0}")]
    Core(#[from] mp_core::CoreError),

    /// V005: Database error propagation
    #[error("[V005] Database error: {0}")]
    Db(#[from] mp_db::DbError),
}

/// Result type alias for CtlError
pub type CtlResult<T> = Result<T, CtlError>;
