//! Task implementations appended to the chain per operation mode.

mod baseline;
mod create;
mod drop;
mod increase;
mod modify;

pub use baseline::InsertBaselineTask;
pub use create::CreateLedgerTask;
pub use drop::DropLedgerTask;
pub use increase::ApplyIncrementsTask;
pub use modify::ModifyLedgerTask;
