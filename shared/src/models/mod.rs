//! Domain models for stock ledger reporting

mod ledger;
mod report;
mod stock;

pub use ledger::*;
pub use report::*;
pub use stock::*;
