//! Stock event store
//! Reads inbound and outbound movements from PostgreSQL

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use sqlx::PgPool;

use shared::{DateRange, RawStockEvent, StockDirection};

use crate::error::AppResult;

/// Event query filter
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    pub warehouse_id: Option<String>,
    pub scheme: Option<String>,
    pub range: DateRange,
}

/// Stock event row as stored. Every column is nullable so a bad row still
/// reaches the reconciler, which applies its own defaults.
#[derive(Debug, sqlx::FromRow)]
pub struct StockEventRecord {
    pub material_code: Option<String>,
    pub description: Option<String>,
    pub scheme_or_po: Option<String>,
    pub quantity: Option<Decimal>,
    pub occurred_at: Option<DateTime<Utc>>,
    pub warehouse_id: Option<String>,
}

impl From<StockEventRecord> for RawStockEvent {
    fn from(record: StockEventRecord) -> Self {
        fn text(value: Option<String>) -> Value {
            value.map(Value::String).unwrap_or(Value::Null)
        }

        RawStockEvent {
            material_code: text(record.material_code),
            description: text(record.description),
            scheme_or_po: text(record.scheme_or_po),
            quantity: text(record.quantity.map(|q| q.to_string())),
            occurred_at: text(record.occurred_at.map(|t| t.to_rfc3339())),
            warehouse_id: text(record.warehouse_id),
        }
    }
}

fn table_for(direction: StockDirection) -> &'static str {
    match direction {
        StockDirection::In => "stock_in_events",
        StockDirection::Out => "stock_out_events",
    }
}

/// Filtered event select; date bounds compare the UTC calendar day
fn events_query(direction: StockDirection) -> String {
    format!(
        r#"
        SELECT material_code, description, scheme_or_po, quantity, occurred_at, warehouse_id
        FROM {}
        WHERE ($1::text IS NULL OR warehouse_id = $1)
          AND ($2::text IS NULL OR scheme_or_po = $2)
          AND ($3::date IS NULL OR (occurred_at AT TIME ZONE 'UTC')::date >= $3)
          AND ($4::date IS NULL OR (occurred_at AT TIME ZONE 'UTC')::date <= $4)
        ORDER BY occurred_at ASC NULLS LAST, id ASC
        "#,
        table_for(direction)
    )
}

/// Stock event store
#[derive(Clone)]
pub struct StockEventStore {
    db: PgPool,
}

impl StockEventStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Fetch one direction's events in occurrence order
    pub async fn fetch(&self, direction: StockDirection, filter: &EventFilter) -> AppResult<Vec<RawStockEvent>> {
        let query = events_query(direction);
        let records = sqlx::query_as::<_, StockEventRecord>(&query)
            .bind(filter.warehouse_id.as_deref())
            .bind(filter.scheme.as_deref())
            .bind(filter.range.start)
            .bind(filter.range.end)
            .fetch_all(&self.db)
            .await?;

        tracing::debug!(
            direction = direction.as_str(),
            count = records.len(),
            "Fetched stock events"
        );

        Ok(records.into_iter().map(RawStockEvent::from).collect())
    }

    /// Fetch inbound and outbound events concurrently
    pub async fn fetch_both(&self, filter: &EventFilter) -> AppResult<(Vec<RawStockEvent>, Vec<RawStockEvent>)> {
        tokio::try_join!(
            self.fetch(StockDirection::In, filter),
            self.fetch(StockDirection::Out, filter)
        )
    }
}
