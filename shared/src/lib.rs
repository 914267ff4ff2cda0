//! Shared types and logic for the Stock Ledger Reporting service
//!
//! This crate holds the pure parts of the system: stock event normalization,
//! ledger reconciliation and paginated table layout. It is used by the
//! backend and, through WASM, by the browser.

pub mod fields;
pub mod layout;
pub mod ledger;
pub mod models;
pub mod types;
pub mod validation;

pub use fields::*;
pub use ledger::*;
pub use models::*;
pub use types::*;
pub use validation::*;
