//! mp-core - Core library for Milepost
//!
//! This crate provides the pure domain logic of the version-control engine:
//! run configuration, version tags, script filename parsing, statement
//! splitting, baseline spec parsing, the script catalog, and the script
//! source abstraction. Everything that talks to a database lives in
//! `mp-db` and `mp-ctl`.

pub mod baseline;
pub mod catalog;
pub mod config;
pub mod error;
pub mod reader;
pub mod script;
pub mod source;
pub mod version;

pub use baseline::{parse_baseline_spec, BaselineEntry};
pub use catalog::ScriptCatalog;
pub use config::{DatabaseConfig, ScriptResourceMode, VersionCtlConfig};
pub use error::{CoreError, CoreResult};
pub use reader::split_statements;
pub use script::ScriptFile;
pub use source::{FilesystemSource, NamedScript, ScriptSource};
pub use version::VersionTag;
