//! HTTP handlers for the Stock Ledger Reporting service

pub mod health;
pub mod ledger;

pub use health::health_check;
pub use ledger::{get_ledger, reconcile_events, render_report};
