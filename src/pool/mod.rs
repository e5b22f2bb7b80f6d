//! Balance accounting: per-asset reserves and the split fee ledger.

pub mod fees;
pub mod reserves;

pub use fees::FeeLedger;
pub use reserves::{ReservePool, ReserveSnapshot};
