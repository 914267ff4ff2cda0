//! Stock movement models
//!
//! Events arrive from the event store or from clients as loosely typed JSON.
//! `RawStockEvent` keeps every field untyped so that one malformed field never
//! rejects the event; `normalize` then applies the degrade-not-fail policy.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Placeholder for absent text values
pub const MISSING_TEXT: &str = "N/A";

/// Direction of a stock movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockDirection {
    /// Stock received into the warehouse
    In,
    /// Stock issued from the warehouse
    Out,
}

impl StockDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockDirection::In => "in",
            StockDirection::Out => "out",
        }
    }
}

/// A stock movement before normalization
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawStockEvent {
    #[serde(default, alias = "materialCode")]
    pub material_code: Value,
    #[serde(default, alias = "materialDescription")]
    pub description: Value,
    #[serde(default, alias = "schemeOrPO", alias = "scheme", alias = "po_number")]
    pub scheme_or_po: Value,
    #[serde(default, alias = "qty")]
    pub quantity: Value,
    #[serde(default, alias = "occurredAt", alias = "date")]
    pub occurred_at: Value,
    #[serde(default, alias = "warehouseId")]
    pub warehouse_id: Value,
}

impl RawStockEvent {
    /// Normalize into a typed event.
    ///
    /// Quantities parse or become zero, timestamps parse or become `now`, and a
    /// missing description becomes [`MISSING_TEXT`]. Returns `None` only when
    /// the material code is absent, since no ledger key can be derived.
    pub fn normalize(&self, now: DateTime<Utc>) -> Option<StockEvent> {
        let material_code = text_value(&self.material_code)?;

        Some(StockEvent {
            material_code,
            description: text_value(&self.description).unwrap_or_else(|| MISSING_TEXT.to_string()),
            scheme_or_po: text_value(&self.scheme_or_po),
            quantity: parse_quantity(&self.quantity),
            occurred_at: parse_timestamp(&self.occurred_at).unwrap_or(now),
            warehouse_id: text_value(&self.warehouse_id),
        })
    }
}

impl From<&StockEvent> for RawStockEvent {
    fn from(event: &StockEvent) -> Self {
        Self {
            material_code: Value::String(event.material_code.clone()),
            description: Value::String(event.description.clone()),
            scheme_or_po: event
                .scheme_or_po
                .clone()
                .map(Value::String)
                .unwrap_or(Value::Null),
            quantity: Value::String(event.quantity.to_string()),
            occurred_at: Value::String(event.occurred_at.to_rfc3339()),
            warehouse_id: event
                .warehouse_id
                .clone()
                .map(Value::String)
                .unwrap_or(Value::Null),
        }
    }
}

/// A normalized stock movement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockEvent {
    pub material_code: String,
    pub description: String,
    pub scheme_or_po: Option<String>,
    pub quantity: Decimal,
    pub occurred_at: DateTime<Utc>,
    /// Used by upstream filtering only
    pub warehouse_id: Option<String>,
}

impl StockEvent {
    pub fn new(material_code: impl Into<String>, quantity: Decimal, occurred_at: DateTime<Utc>) -> Self {
        Self {
            material_code: material_code.into(),
            description: MISSING_TEXT.to_string(),
            scheme_or_po: None,
            quantity,
            occurred_at,
            warehouse_id: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_scheme(mut self, scheme_or_po: impl Into<String>) -> Self {
        self.scheme_or_po = Some(scheme_or_po.into());
        self
    }
}

/// Read a JSON value as non-blank text
pub fn text_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Parse a quantity, degrading to zero.
///
/// Accepts JSON numbers (including exponent notation) and numeric strings with
/// optional thousands separators. Negative, non-numeric and absent values all
/// yield zero.
pub fn parse_quantity(value: &Value) -> Decimal {
    let parsed = match value {
        Value::Number(n) => parse_decimal(&n.to_string()),
        Value::String(s) => parse_decimal(&s.trim().replace(',', "")),
        _ => None,
    };

    match parsed {
        Some(q) if q >= Decimal::ZERO => q,
        _ => Decimal::ZERO,
    }
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    if s.is_empty() {
        return None;
    }
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"];
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d/%m/%Y"];

/// Parse a timestamp in any of the accepted shapes.
///
/// Strings may be RFC 3339, a naive date-time, or a bare date (midnight UTC).
/// Numbers are Unix epoch milliseconds.
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_timestamp_str(s.trim()),
        Value::Number(n) => n
            .as_i64()
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        _ => None,
    }
}

fn parse_timestamp_str(s: &str) -> Option<DateTime<Utc>> {
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_quantity_parsing() {
        assert_eq!(parse_quantity(&json!(10)), Decimal::from(10));
        assert_eq!(parse_quantity(&json!("4.5")), Decimal::new(45, 1));
        assert_eq!(parse_quantity(&json!("1,250")), Decimal::from(1250));
        assert_eq!(parse_quantity(&json!(1.5e2)), Decimal::from(150));
        assert_eq!(parse_quantity(&json!("abc")), Decimal::ZERO);
        assert_eq!(parse_quantity(&json!(null)), Decimal::ZERO);
        assert_eq!(parse_quantity(&json!(-3)), Decimal::ZERO);
        assert_eq!(parse_quantity(&json!({"n": 1})), Decimal::ZERO);
    }

    #[test]
    fn test_timestamp_shapes() {
        let midnight = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        assert_eq!(parse_timestamp(&json!("2024-01-02")), Some(midnight));
        assert_eq!(parse_timestamp(&json!("02/01/2024")), Some(midnight));
        assert_eq!(parse_timestamp(&json!("2024-01-02T00:00:00Z")), Some(midnight));
        assert_eq!(parse_timestamp(&json!("2024-01-02 00:00:00")), Some(midnight));
        assert_eq!(
            parse_timestamp(&json!(midnight.timestamp_millis())),
            Some(midnight)
        );
        assert_eq!(parse_timestamp(&json!("yesterday")), None);
    }

    #[test]
    fn test_normalize_defaults() {
        let raw: RawStockEvent = serde_json::from_value(json!({
            "materialCode": "M1",
            "qty": "n/a"
        }))
        .unwrap();

        let event = raw.normalize(now()).unwrap();
        assert_eq!(event.material_code, "M1");
        assert_eq!(event.description, MISSING_TEXT);
        assert_eq!(event.scheme_or_po, None);
        assert_eq!(event.quantity, Decimal::ZERO);
        assert_eq!(event.occurred_at, now());
    }

    #[test]
    fn test_normalize_requires_material_code() {
        let raw: RawStockEvent = serde_json::from_value(json!({ "quantity": 5 })).unwrap();
        assert!(raw.normalize(now()).is_none());

        let blank: RawStockEvent = serde_json::from_value(json!({ "material_code": "  " })).unwrap();
        assert!(blank.normalize(now()).is_none());
    }
}
