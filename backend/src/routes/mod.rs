//! Route definitions for the Stock Ledger Reporting service

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Event payloads for client-side reports can be large
const REPORT_BODY_LIMIT: usize = 16 * 1024 * 1024;

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Ledger reconciliation and export
        .nest("/ledger", ledger_routes())
}

/// Ledger routes
fn ledger_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::get_ledger))
        .route("/reconcile", post(handlers::reconcile_events))
        .route("/report", post(handlers::render_report))
        .layer(DefaultBodyLimit::max(REPORT_BODY_LIMIT))
}
