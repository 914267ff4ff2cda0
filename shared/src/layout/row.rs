//! Row sources for the table renderer

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::fields::LedgerField;
use crate::ledger::json_type_name;
use crate::models::{ColumnKind, LedgerRow, ReportColumn, MISSING_TEXT};

/// A cell value read from a row
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(Decimal),
    Date(DateTime<Utc>),
    Missing,
}

/// Reasons a row cannot be prepared for drawing
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CellError {
    #[error("unknown field '{0}'")]
    UnknownField(String),

    #[error("field '{field}' has unexpected type {found}")]
    UnexpectedType { field: String, found: &'static str },

    #[error("field '{field}' is not numeric: '{value}'")]
    NotNumeric { field: String, value: String },
}

/// Anything the renderer can lay out as a table row
pub trait ReportRow {
    fn cell(&self, field: &str) -> Result<CellValue, CellError>;
}

impl ReportRow for LedgerRow {
    fn cell(&self, field: &str) -> Result<CellValue, CellError> {
        let field = LedgerField::parse(field).ok_or_else(|| CellError::UnknownField(field.to_string()))?;
        Ok(match field {
            LedgerField::Key => CellValue::Text(self.key.clone()),
            LedgerField::MaterialCode => CellValue::Text(self.material_code.clone()),
            LedgerField::Description => CellValue::Text(self.description.clone()),
            LedgerField::SchemeOrPo => match &self.scheme_or_po {
                Some(scheme) => CellValue::Text(scheme.clone()),
                None => CellValue::Missing,
            },
            LedgerField::StockIn => CellValue::Number(self.stock_in),
            LedgerField::StockOut => CellValue::Number(self.stock_out),
            LedgerField::Remaining => CellValue::Number(self.remaining),
            LedgerField::LastEventDate => CellValue::Date(self.last_event_date),
        })
    }
}

impl ReportRow for Map<String, Value> {
    fn cell(&self, field: &str) -> Result<CellValue, CellError> {
        match self.get(field) {
            None | Some(Value::Null) => Ok(CellValue::Missing),
            Some(Value::String(s)) => Ok(CellValue::Text(s.clone())),
            Some(Value::Number(n)) => Decimal::from_str(&n.to_string())
                .or_else(|_| Decimal::from_scientific(&n.to_string()))
                .map(CellValue::Number)
                .map_err(|_| CellError::NotNumeric {
                    field: field.to_string(),
                    value: n.to_string(),
                }),
            Some(other) => Err(CellError::UnexpectedType {
                field: field.to_string(),
                found: json_type_name(other),
            }),
        }
    }
}

impl ReportRow for Value {
    fn cell(&self, field: &str) -> Result<CellValue, CellError> {
        match self {
            Value::Object(map) => map.cell(field),
            other => Err(CellError::UnexpectedType {
                field: field.to_string(),
                found: json_type_name(other),
            }),
        }
    }
}

/// Format a quantity for display: at most three decimals, no trailing zeros
pub fn format_quantity(value: Decimal) -> String {
    value.round_dp(3).normalize().to_string()
}

/// Produce the display text of one cell
pub fn cell_text<R>(row: &R, column: &ReportColumn, source_index: usize) -> Result<String, CellError>
where
    R: ReportRow + ?Sized,
{
    if column.kind == ColumnKind::Serial {
        return Ok((source_index + 1).to_string());
    }

    let value = row.cell(&column.field)?;
    match column.kind {
        ColumnKind::Numeric => match value {
            CellValue::Number(n) => Ok(format_quantity(n)),
            CellValue::Missing => Ok("0".to_string()),
            CellValue::Text(s) => Decimal::from_str(s.trim())
                .map(format_quantity)
                .map_err(|_| CellError::NotNumeric {
                    field: column.field.clone(),
                    value: s,
                }),
            CellValue::Date(_) => Err(CellError::UnexpectedType {
                field: column.field.clone(),
                found: "date",
            }),
        },
        ColumnKind::Date => Ok(match value {
            CellValue::Date(d) => d.format("%Y-%m-%d").to_string(),
            CellValue::Text(s) => s,
            CellValue::Number(n) => n.to_string(),
            CellValue::Missing => MISSING_TEXT.to_string(),
        }),
        _ => Ok(match value {
            CellValue::Text(s) if s.trim().is_empty() => MISSING_TEXT.to_string(),
            CellValue::Text(s) => s,
            CellValue::Number(n) => format_quantity(n),
            CellValue::Date(d) => d.format("%Y-%m-%d").to_string(),
            CellValue::Missing => MISSING_TEXT.to_string(),
        }),
    }
}
