//! Document output tests
//!
//! Tests for the CSV and PDF output helpers including:
//! - Download names stay filesystem and header safe
//! - WinAnsi encoding yields one byte per character
//! - CSV export writes one record per readable row

use chrono::{NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::{default_ledger_columns, reconcile_events, KeyMode, PageGeometry, StockEvent};

use stock_ledger_backend::services::export::export_csv;
use stock_ledger_backend::services::pdf::{encode_win_ansi, report_filename};

fn ledger_events() -> impl Strategy<Value = Vec<StockEvent>> {
    prop::collection::vec(("[A-D]", "[a-z ,\"]{0,12}", 0u32..10_000), 0..30).prop_map(|items| {
        let at = Utc.with_ymd_and_hms(2024, 4, 1, 8, 0, 0).unwrap();
        items
            .into_iter()
            .map(|(code, description, qty)| {
                StockEvent::new(code, Decimal::new(qty as i64, 2), at).with_description(description)
            })
            .collect()
    })
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_report_filename_is_safe(scope in ".{0,24}", day in 1u32..=28) {
        let date = NaiveDate::from_ymd_opt(2024, 2, day).unwrap();
        let name = report_filename(Some(&scope), date, "pdf");

        prop_assert!(name.starts_with("stock-ledger-"));
        prop_assert!(name.ends_with(".pdf"));
        prop_assert!(name.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')));
    }

    #[test]
    fn prop_win_ansi_is_one_byte_per_char(text in "\\PC{0,40}") {
        prop_assert_eq!(encode_win_ansi(&text).len(), text.chars().count());
    }

    #[test]
    fn prop_csv_has_one_record_per_row(inbound in ledger_events(), outbound in ledger_events()) {
        let rows = reconcile_events(&inbound, &outbound, KeyMode::Coarse);
        let columns = default_ledger_columns(PageGeometry::a4_portrait().content_width());

        let bytes = export_csv(&rows, &columns).unwrap();
        let mut reader = csv::Reader::from_reader(bytes.as_slice());

        let headers = reader.headers().unwrap().clone();
        prop_assert_eq!(headers.len(), columns.len());

        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        prop_assert_eq!(records.len(), rows.len());
        for (i, record) in records.iter().enumerate() {
            let expected = (i + 1).to_string();
            prop_assert_eq!(&record[0], expected.as_str());
        }
    }
}
