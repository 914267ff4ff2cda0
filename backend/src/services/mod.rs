//! Business logic services for the Stock Ledger Reporting service

pub mod assets;
pub mod export;
pub mod ledger;
pub mod pdf;
pub mod report;
pub mod sink;
pub mod stock_events;

pub use ledger::{LedgerReport, LedgerService};
pub use stock_events::{EventFilter, StockEventStore};
