//! WebAssembly module for Stock Ledger Reporting
//!
//! Provides client-side computation for:
//! - Ledger reconciliation of locally held events
//! - Cell text wrapping with the report font metrics
//! - Page planning before a report is requested from the server

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;

use shared::layout::{format_quantity, render, wrap_text, HelveticaMetrics, RowPlacement, SkippedRow};
use shared::{
    reconcile_json, validate_ledger_columns, KeyMode, LedgerRow, LedgerTotals, PageGeometry, ReportColumn, ReportMeta,
};

#[derive(Serialize)]
struct LedgerOutput {
    mode: KeyMode,
    rows: Vec<LedgerRow>,
    totals: LedgerTotals,
}

#[derive(Debug, Serialize)]
struct PagePlan {
    page_count: usize,
    placements: Vec<RowPlacement>,
    skipped: Vec<SkippedRow>,
}

fn to_js_error(message: String) -> JsValue {
    js_sys::Error::new(&message).into()
}

/// Reconcile inbound and outbound event arrays given as JSON.
///
/// Returns `{ mode, rows, totals }` as JSON.
#[wasm_bindgen]
pub fn reconcile_ledger(inbound_json: &str, outbound_json: &str, mode: &str) -> Result<String, JsValue> {
    reconcile_ledger_json(inbound_json, outbound_json, mode).map_err(to_js_error)
}

/// Wrap `text` to `width` points at `font_size`, returned as a JSON array of lines
#[wasm_bindgen]
pub fn wrap_cell_text(text: &str, width: f32, font_size: f32) -> Result<String, JsValue> {
    let lines = wrap_text(text, width, font_size, &HelveticaMetrics);
    serde_json::to_string(&lines).map_err(|e| to_js_error(e.to_string()))
}

/// Lay out rows without encoding a document.
///
/// Returns `{ page_count, placements, skipped }` as JSON. `geometry` is
/// either a geometry object or the name of a page preset.
#[wasm_bindgen]
pub fn plan_report_pages(
    rows_json: &str,
    columns_json: &str,
    geometry: &str,
    title: &str,
) -> Result<String, JsValue> {
    let plan = plan_pages(rows_json, columns_json, geometry, title).map_err(to_js_error)?;

    if !plan.skipped.is_empty() {
        web_sys::console::warn_1(&format!("{} report rows could not be laid out", plan.skipped.len()).into());
    }

    serde_json::to_string(&plan).map_err(|e| to_js_error(e.to_string()))
}

/// Format a quantity the way reports print it
#[wasm_bindgen]
pub fn format_ledger_quantity(value: &str) -> String {
    Decimal::from_str(value.trim())
        .map(format_quantity)
        .unwrap_or_else(|_| "0".to_string())
}

fn reconcile_ledger_json(inbound_json: &str, outbound_json: &str, mode: &str) -> Result<String, String> {
    let mode = if mode.trim().is_empty() {
        KeyMode::default()
    } else {
        KeyMode::from_str(mode)?
    };
    let inbound: Value = serde_json::from_str(inbound_json).map_err(|e| format!("Invalid inbound JSON: {}", e))?;
    let outbound: Value = serde_json::from_str(outbound_json).map_err(|e| format!("Invalid outbound JSON: {}", e))?;

    let rows = reconcile_json(&inbound, &outbound, mode).map_err(|e| e.to_string())?;
    let output = LedgerOutput {
        mode,
        totals: LedgerTotals::from_rows(&rows),
        rows,
    };
    serde_json::to_string(&output).map_err(|e| e.to_string())
}

fn parse_geometry(geometry: &str) -> Result<PageGeometry, String> {
    let geometry = geometry.trim();
    if geometry.is_empty() {
        return Err("geometry or preset is required".to_string());
    }
    if geometry.starts_with('{') {
        return serde_json::from_str(geometry).map_err(|e| format!("Invalid geometry JSON: {}", e));
    }
    PageGeometry::preset(geometry).ok_or_else(|| format!("Unknown page preset '{}'", geometry))
}

fn plan_pages(rows_json: &str, columns_json: &str, geometry: &str, title: &str) -> Result<PagePlan, String> {
    let rows: Vec<Value> = serde_json::from_str(rows_json).map_err(|e| format!("Invalid rows JSON: {}", e))?;
    let columns: Vec<ReportColumn> =
        serde_json::from_str(columns_json).map_err(|e| format!("Invalid columns JSON: {}", e))?;
    let geometry = parse_geometry(geometry)?;
    validate_ledger_columns(&columns).map_err(|e| e.to_string())?;

    let document = render(&rows, &columns, &geometry, &ReportMeta::titled(title), &HelveticaMetrics)
        .map_err(|e| e.to_string())?;

    Ok(PagePlan {
        page_count: document.page_count(),
        placements: document.placements,
        skipped: document.skipped,
    })
}
