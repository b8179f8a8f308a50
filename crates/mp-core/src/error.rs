//! Error types for mp-core

use thiserror::Error;

/// Core error type for Milepost
#[derive(Error, Debug)]
pub enum CoreError {
    /// C001: Invalid configuration value
    #[error("[C001] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// C002: Script filename does not match the version grammar
    #[error("[C002] Script filename format is not correct: {file_name}")]
    ScriptNameInvalid { file_name: String },

    /// C003: Baseline spec token does not match the version grammar
    #[error("[C003] Baseline spec format is not correct: {token}")]
    BaselineSpecInvalid { token: String },

    /// C004: Baseline spec is required but empty
    #[error("[C004] Baseline spec is empty, required for baseline init/reset")]
    BaselineSpecEmpty,

    /// C005: Script directory missing or not a directory
    #[error("[C005] Script directory not found: {path}")]
    ScriptDirNotFound { path: String },

    /// C006: Script directory contains no SQL files
    #[error("[C006] No SQL files in script directory: {path}")]
    ScriptDirEmpty { path: String },

    /// C007: Script file could not be read (I/O or non-UTF-8 content)
    #[error("[C007] Failed to read script {path}: {message}")]
    ScriptRead { path: String, message: String },
}

/// Result type alias for [`CoreError`].
pub type CoreResult<T> = Result<T, CoreError>;
