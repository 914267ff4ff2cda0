//! Ledger models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{StockDirection, StockEvent};

/// Granularity at which inbound and outbound events are merged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyMode {
    /// `material|description`, for whole-warehouse reports
    #[default]
    Coarse,
    /// `material|description|scheme|date`, for scheme or dated views
    Fine,
}

impl KeyMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyMode::Coarse => "coarse",
            KeyMode::Fine => "fine",
        }
    }

    /// Derive the ledger key for an event.
    ///
    /// The date component of a fine key is the normalized UTC calendar date, so
    /// two timestamps on the same day always land on the same row.
    pub fn key_for(&self, event: &StockEvent) -> String {
        match self {
            KeyMode::Coarse => format!("{}|{}", event.material_code, event.description),
            KeyMode::Fine => format!(
                "{}|{}|{}|{}",
                event.material_code,
                event.description,
                event.scheme_or_po.as_deref().unwrap_or(super::MISSING_TEXT),
                event.occurred_at.date_naive().format("%Y-%m-%d")
            ),
        }
    }
}

impl std::fmt::Display for KeyMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for KeyMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "coarse" => Ok(KeyMode::Coarse),
            "fine" => Ok(KeyMode::Fine),
            other => Err(format!("unknown key mode '{}'", other)),
        }
    }
}

/// One reconciled line of the stock ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerRow {
    pub key: String,
    pub material_code: String,
    pub description: String,
    pub scheme_or_po: Option<String>,
    pub stock_in: Decimal,
    pub stock_out: Decimal,
    /// Always `stock_in - stock_out`
    pub remaining: Decimal,
    pub last_event_date: DateTime<Utc>,
}

impl LedgerRow {
    /// Open a row from the first event seen for its key
    pub fn open(key: String, direction: StockDirection, event: &StockEvent) -> Self {
        let mut row = Self {
            key,
            material_code: event.material_code.clone(),
            description: event.description.clone(),
            scheme_or_po: event.scheme_or_po.clone(),
            stock_in: Decimal::ZERO,
            stock_out: Decimal::ZERO,
            remaining: Decimal::ZERO,
            last_event_date: event.occurred_at,
        };
        row.apply(direction, event.quantity, event.occurred_at);
        row
    }

    /// Fold one contribution into the row.
    ///
    /// Sums saturate at the `Decimal` range instead of overflowing.
    pub fn apply(&mut self, direction: StockDirection, quantity: Decimal, occurred_at: DateTime<Utc>) {
        match direction {
            StockDirection::In => self.stock_in = self.stock_in.saturating_add(quantity),
            StockDirection::Out => self.stock_out = self.stock_out.saturating_add(quantity),
        }
        self.remaining = self.stock_in.saturating_sub(self.stock_out);
        if occurred_at > self.last_event_date {
            self.last_event_date = occurred_at;
        }
    }
}

/// Column totals over a set of ledger rows
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerTotals {
    pub row_count: usize,
    pub stock_in: Decimal,
    pub stock_out: Decimal,
    pub remaining: Decimal,
}

impl LedgerTotals {
    pub fn from_rows(rows: &[LedgerRow]) -> Self {
        rows.iter().fold(Self::default(), |mut totals, row| {
            totals.row_count += 1;
            totals.stock_in = totals.stock_in.saturating_add(row.stock_in);
            totals.stock_out = totals.stock_out.saturating_add(row.stock_out);
            totals.remaining = totals.remaining.saturating_add(row.remaining);
            totals
        })
    }
}
