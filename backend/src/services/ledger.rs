//! Ledger service
//! Fetches stock events and reconciles them into ledger rows

use serde::Serialize;
use serde_json::Value;
use sqlx::PgPool;

use shared::{reconcile, reconcile_json, KeyMode, LedgerRow, LedgerTotals};

use super::stock_events::{EventFilter, StockEventStore};
use crate::error::AppResult;

/// Reconciled ledger with its column totals
#[derive(Debug, Clone, Serialize)]
pub struct LedgerReport {
    pub mode: KeyMode,
    pub rows: Vec<LedgerRow>,
    pub totals: LedgerTotals,
}

impl LedgerReport {
    pub fn new(mode: KeyMode, rows: Vec<LedgerRow>) -> Self {
        let totals = LedgerTotals::from_rows(&rows);
        Self { mode, rows, totals }
    }
}

/// Ledger service
#[derive(Clone)]
pub struct LedgerService {
    store: StockEventStore,
}

impl LedgerService {
    pub fn new(db: PgPool) -> Self {
        Self {
            store: StockEventStore::new(db),
        }
    }

    /// Build the ledger for the stored events matching `filter`
    pub async fn build_ledger(&self, filter: &EventFilter, mode: KeyMode) -> AppResult<LedgerReport> {
        let (inbound, outbound) = self.store.fetch_both(filter).await?;
        let rows = reconcile(&inbound, &outbound, mode);

        tracing::info!(
            warehouse = filter.warehouse_id.as_deref().unwrap_or("all"),
            mode = mode.as_str(),
            inbound = inbound.len(),
            outbound = outbound.len(),
            rows = rows.len(),
            "Ledger reconciled"
        );

        Ok(LedgerReport::new(mode, rows))
    }

    /// Reconcile client-supplied event collections
    pub fn reconcile_payload(inbound: &Value, outbound: &Value, mode: KeyMode) -> AppResult<LedgerReport> {
        let rows = reconcile_json(inbound, outbound, mode)?;
        Ok(LedgerReport::new(mode, rows))
    }
}
