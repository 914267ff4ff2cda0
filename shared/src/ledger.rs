//! Ledger reconciliation
//!
//! Folds independent inbound and outbound event streams into one ledger row per
//! key. Rows keep the order in which their key was first seen: inbound events
//! are folded before outbound ones, each stream in its own order.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde_json::Value;
use thiserror::Error;

use crate::models::{KeyMode, LedgerRow, RawStockEvent, StockDirection, StockEvent};

/// Reconciliation failures. Individual malformed events never produce one.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("{stream} events must be a list, found {found}")]
    InputShape {
        stream: &'static str,
        found: &'static str,
    },
}

/// Insertion-ordered accumulator owned by a single reconciliation call
#[derive(Debug)]
pub struct Reconciler {
    mode: KeyMode,
    now: DateTime<Utc>,
    rows: Vec<LedgerRow>,
    index: HashMap<String, usize>,
    dropped: usize,
}

impl Reconciler {
    /// `now` stands in for missing or unparseable event dates
    pub fn new(mode: KeyMode, now: DateTime<Utc>) -> Self {
        Self {
            mode,
            now,
            rows: Vec::new(),
            index: HashMap::new(),
            dropped: 0,
        }
    }

    pub fn fold(&mut self, direction: StockDirection, event: &StockEvent) {
        let key = self.mode.key_for(event);
        match self.index.get(&key) {
            Some(&position) => {
                self.rows[position].apply(direction, event.quantity, event.occurred_at);
            }
            None => {
                self.index.insert(key.clone(), self.rows.len());
                self.rows.push(LedgerRow::open(key, direction, event));
            }
        }
    }

    /// Normalize and fold a raw event; events without a material code are dropped
    pub fn fold_raw(&mut self, direction: StockDirection, raw: &RawStockEvent) {
        match raw.normalize(self.now) {
            Some(event) => self.fold(direction, &event),
            None => {
                self.dropped += 1;
                tracing::warn!(
                    direction = direction.as_str(),
                    "Dropping stock event without a material code"
                );
            }
        }
    }

    fn fold_value(&mut self, direction: StockDirection, value: &Value) {
        match serde_json::from_value::<RawStockEvent>(value.clone()) {
            Ok(raw) => self.fold_raw(direction, &raw),
            Err(e) => {
                self.dropped += 1;
                tracing::warn!(direction = direction.as_str(), "Dropping unreadable stock event: {}", e);
            }
        }
    }

    /// Number of events that could not be keyed
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn finish(self) -> Vec<LedgerRow> {
        self.rows
    }
}

/// Reconcile raw events, resolving missing dates to the current time
pub fn reconcile(inbound: &[RawStockEvent], outbound: &[RawStockEvent], mode: KeyMode) -> Vec<LedgerRow> {
    reconcile_at(inbound, outbound, mode, Utc::now())
}

/// Reconcile raw events with an explicit processing time
pub fn reconcile_at(
    inbound: &[RawStockEvent],
    outbound: &[RawStockEvent],
    mode: KeyMode,
    now: DateTime<Utc>,
) -> Vec<LedgerRow> {
    let mut reconciler = Reconciler::new(mode, now);
    for raw in inbound {
        reconciler.fold_raw(StockDirection::In, raw);
    }
    for raw in outbound {
        reconciler.fold_raw(StockDirection::Out, raw);
    }
    reconciler.finish()
}

/// Reconcile already-normalized events
pub fn reconcile_events(inbound: &[StockEvent], outbound: &[StockEvent], mode: KeyMode) -> Vec<LedgerRow> {
    let mut reconciler = Reconciler::new(mode, Utc::now());
    for event in inbound {
        reconciler.fold(StockDirection::In, event);
    }
    for event in outbound {
        reconciler.fold(StockDirection::Out, event);
    }
    reconciler.finish()
}

/// Reconcile untyped JSON collections.
///
/// Fails only when a collection is not a JSON array. Elements that are not
/// readable events are dropped and logged.
pub fn reconcile_json(inbound: &Value, outbound: &Value, mode: KeyMode) -> Result<Vec<LedgerRow>, LedgerError> {
    reconcile_json_at(inbound, outbound, mode, Utc::now())
}

pub fn reconcile_json_at(
    inbound: &Value,
    outbound: &Value,
    mode: KeyMode,
    now: DateTime<Utc>,
) -> Result<Vec<LedgerRow>, LedgerError> {
    let inbound = as_event_list("inbound", inbound)?;
    let outbound = as_event_list("outbound", outbound)?;

    let mut reconciler = Reconciler::new(mode, now);
    for value in inbound {
        reconciler.fold_value(StockDirection::In, value);
    }
    for value in outbound {
        reconciler.fold_value(StockDirection::Out, value);
    }

    if reconciler.dropped() > 0 {
        tracing::info!(dropped = reconciler.dropped(), "Reconciled with dropped events");
    }
    Ok(reconciler.finish())
}

fn as_event_list<'a>(stream: &'static str, value: &'a Value) -> Result<&'a Vec<Value>, LedgerError> {
    value.as_array().ok_or(LedgerError::InputShape {
        stream,
        found: json_type_name(value),
    })
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal::Decimal;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap()
    }

    fn raw(value: Value) -> RawStockEvent {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_inbound_and_outbound_merge() {
        let inbound = vec![raw(json!({"materialCode": "M1", "qty": 10, "date": "2024-01-01"}))];
        let outbound = vec![raw(json!({"materialCode": "M1", "qty": 4, "date": "2024-01-02"}))];

        let rows = reconcile_at(&inbound, &outbound, KeyMode::Coarse, now());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].stock_in, Decimal::from(10));
        assert_eq!(rows[0].stock_out, Decimal::from(4));
        assert_eq!(rows[0].remaining, Decimal::from(6));
        assert_eq!(rows[0].last_event_date, Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_outbound_only_row() {
        let outbound = vec![raw(json!({"materialCode": "M2", "qty": 5}))];

        let rows = reconcile_at(&[], &outbound, KeyMode::Coarse, now());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].stock_in, Decimal::ZERO);
        assert_eq!(rows[0].stock_out, Decimal::from(5));
        assert_eq!(rows[0].remaining, Decimal::from(-5));
        assert_eq!(rows[0].last_event_date, now());
    }

    #[test]
    fn test_non_numeric_quantity_is_zero() {
        let inbound = vec![raw(json!({"materialCode": "M3", "qty": "twelve"}))];

        let rows = reconcile_at(&inbound, &[], KeyMode::Coarse, now());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].stock_in, Decimal::ZERO);
        assert_eq!(rows[0].remaining, Decimal::ZERO);
    }

    #[test]
    fn test_rows_keep_first_seen_order() {
        let inbound = vec![
            raw(json!({"materialCode": "B", "qty": 1})),
            raw(json!({"materialCode": "A", "qty": 1})),
        ];
        let outbound = vec![
            raw(json!({"materialCode": "C", "qty": 1})),
            raw(json!({"materialCode": "B", "qty": 1})),
        ];

        let rows = reconcile_at(&inbound, &outbound, KeyMode::Coarse, now());
        let codes: Vec<&str> = rows.iter().map(|r| r.material_code.as_str()).collect();
        assert_eq!(codes, vec!["B", "A", "C"]);
    }

    #[test]
    fn test_description_splits_coarse_keys() {
        let inbound = vec![
            raw(json!({"materialCode": "M1", "description": "Cable 4mm", "qty": 3})),
            raw(json!({"materialCode": "M1", "description": "Cable 6mm", "qty": 2})),
        ];

        let rows = reconcile_at(&inbound, &[], KeyMode::Coarse, now());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].key, "M1|Cable 4mm");
        assert_eq!(rows[1].key, "M1|Cable 6mm");
    }

    #[test]
    fn test_fine_mode_separates_dates_and_schemes() {
        let inbound = vec![
            raw(json!({"materialCode": "M1", "scheme": "S1", "qty": 3, "date": "2024-01-01"})),
            raw(json!({"materialCode": "M1", "scheme": "S1", "qty": 2, "date": "2024-01-02"})),
            raw(json!({"materialCode": "M1", "scheme": "S2", "qty": 1, "date": "2024-01-01"})),
        ];

        let coarse = reconcile_at(&inbound, &[], KeyMode::Coarse, now());
        assert_eq!(coarse.len(), 1);
        assert_eq!(coarse[0].stock_in, Decimal::from(6));

        let fine = reconcile_at(&inbound, &[], KeyMode::Fine, now());
        assert_eq!(fine.len(), 3);
        assert_eq!(fine[0].key, "M1|N/A|S1|2024-01-01");
    }

    #[test]
    fn test_fine_mode_normalizes_date_formats() {
        let inbound = vec![
            raw(json!({"materialCode": "M1", "scheme": "S1", "qty": 3, "date": "2024-01-05"})),
            raw(json!({"materialCode": "M1", "scheme": "S1", "qty": 2, "date": "2024-01-05T14:20:00Z"})),
            raw(json!({"materialCode": "M1", "scheme": "S1", "qty": 1, "date": "05/01/2024"})),
        ];

        let rows = reconcile_at(&inbound, &[], KeyMode::Fine, now());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].stock_in, Decimal::from(6));
    }

    #[test]
    fn test_events_without_material_code_are_dropped() {
        let inbound = vec![raw(json!({"qty": 9})), raw(json!({"materialCode": "M1", "qty": 1}))];

        let rows = reconcile_at(&inbound, &[], KeyMode::Coarse, now());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].material_code, "M1");
    }

    #[test]
    fn test_json_input_shape() {
        let err = reconcile_json_at(&json!({"materialCode": "M1"}), &json!([]), KeyMode::Coarse, now())
            .unwrap_err();
        assert_eq!(
            err,
            LedgerError::InputShape {
                stream: "inbound",
                found: "object"
            }
        );

        let err = reconcile_json_at(&json!([]), &json!(null), KeyMode::Coarse, now()).unwrap_err();
        assert!(matches!(err, LedgerError::InputShape { stream: "outbound", .. }));
    }

    #[test]
    fn test_json_skips_non_object_elements() {
        let inbound = json!([42, "text", {"materialCode": "M1", "qty": "7"}]);

        let rows = reconcile_json_at(&inbound, &json!([]), KeyMode::Coarse, now()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].stock_in, Decimal::from(7));
    }
}
