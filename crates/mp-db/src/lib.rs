//! mp-db - Database abstraction layer for Milepost
//!
//! This crate provides the `Database` trait the orchestration engine runs
//! against, the backend-neutral `SqlValue` parameter type, and a DuckDB
//! implementation.

pub mod duckdb;
pub mod error;
pub mod traits;
pub mod value;

pub use duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use traits::Database;
pub use value::SqlValue;
