//! mp-ctl - Version-control orchestration engine for Milepost
//!
//! Tracks and applies incremental SQL scripts against a target database,
//! maintaining a ledger of which versioned scripts have run per business
//! space. A run inspects the database to choose an operation mode, assembles
//! a task chain for that mode, and executes it sequentially over one
//! long-lived connection.

pub mod chain;
pub mod ddl;
pub mod error;
pub mod ledger;
pub mod mode;
pub mod task;

mod controller;

pub use chain::{Task, TaskChain};
pub use controller::VersionCtl;
pub use error::{CtlError, CtlResult};
pub use ledger::{LedgerStore, VersionRecord, VersionType};
pub use mode::{resolve_mode, OperationMode};
