//! Flat CSV export of ledger rows
//! One record per row, one field per column, with the report's placeholders

use shared::layout::{cell_text, ReportRow};
use shared::ReportColumn;

use crate::error::{AppError, AppResult};

/// Write `rows` as CSV under the column labels.
///
/// Rows that cannot be read are skipped and logged, as in the PDF layout.
pub fn export_csv<R: ReportRow>(rows: &[R], columns: &[ReportColumn]) -> AppResult<Vec<u8>> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(columns.iter().map(|c| c.label.as_str()))
        .map_err(|e| AppError::Internal(format!("CSV serialization error: {}", e)))?;

    for (index, row) in rows.iter().enumerate() {
        let record: Result<Vec<String>, _> = columns.iter().map(|column| cell_text(row, column, index)).collect();
        match record {
            Ok(record) => wtr
                .write_record(&record)
                .map_err(|e| AppError::Internal(format!("CSV serialization error: {}", e)))?,
            Err(e) => tracing::warn!(row = index, "Skipping export row: {}", e),
        }
    }

    wtr.into_inner()
        .map_err(|e| AppError::Internal(format!("CSV writer error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shared::ColumnKind;

    fn columns() -> Vec<ReportColumn> {
        vec![
            ReportColumn::new("serial", "No.", 20.0, ColumnKind::Serial),
            ReportColumn::new("description", "Description", 100.0, ColumnKind::Text),
            ReportColumn::new("remaining", "Remaining", 40.0, ColumnKind::Numeric),
        ]
    }

    #[test]
    fn test_placeholders_for_missing_values() {
        let rows = vec![
            json!({"description": "Cement, grey", "remaining": "12.500"}),
            json!({"remaining": null}),
        ];

        let csv = String::from_utf8(export_csv(&rows, &columns()).unwrap()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "No.,Description,Remaining");
        assert_eq!(lines[1], "1,\"Cement, grey\",12.5");
        assert_eq!(lines[2], "2,N/A,0");
    }

    #[test]
    fn test_unreadable_rows_are_skipped() {
        let rows = vec![json!({"remaining": [1, 2]}), json!({"description": "ok", "remaining": 1})];

        let csv = String::from_utf8(export_csv(&rows, &columns()).unwrap()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "2,ok,1");
    }
}
