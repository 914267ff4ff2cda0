//! Ledger handlers for reconciliation and report export

use std::str::FromStr;

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::Value;

use shared::{DateRange, KeyMode, PageGeometry, ReportColumn, ReportFormat, ReportMeta};

use crate::error::{AppError, AppResult};
use crate::services::assets::load_logo;
use crate::services::export::export_csv;
use crate::services::pdf::report_filename;
use crate::services::report::{ledger_meta, render_pdf_blocking, ReportLayout};
use crate::services::{EventFilter, LedgerReport, LedgerService};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LedgerQuery {
    pub warehouse_id: Option<String>,
    pub scheme: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub mode: Option<String>,
    pub format: Option<String>, // "json", "csv" or "pdf"
    pub preset: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ReconcileRequest {
    #[serde(default)]
    pub inbound: Value,
    #[serde(default)]
    pub outbound: Value,
    #[serde(default)]
    pub mode: KeyMode,
}

#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    #[serde(default)]
    pub inbound: Value,
    #[serde(default)]
    pub outbound: Value,
    #[serde(default)]
    pub mode: KeyMode,
    pub columns: Option<Vec<ReportColumn>>,
    pub geometry: Option<PageGeometry>,
    pub preset: Option<String>,
    pub title: Option<String>,
    pub subtitle: Option<Vec<String>>,
    pub signature_labels: Option<Vec<String>>,
    pub warehouse_id: Option<String>,
    #[serde(default = "default_report_format")]
    pub format: ReportFormat,
}

fn default_report_format() -> ReportFormat {
    ReportFormat::Pdf
}

/// How a reconciled ledger leaves the service
struct ExportOptions {
    format: ReportFormat,
    columns: Option<Vec<ReportColumn>>,
    geometry: Option<PageGeometry>,
    preset: Option<String>,
    meta: ReportMeta,
    scope: Option<String>,
}

/// Get the ledger for stored events
pub async fn get_ledger(State(state): State<AppState>, Query(query): Query<LedgerQuery>) -> AppResult<Response> {
    let mode: KeyMode = parse_param("mode", query.mode.as_deref())?;
    let format: ReportFormat = parse_param("format", query.format.as_deref())?;
    let range = DateRange::new(
        parse_date("start_date", query.start_date.as_deref())?,
        parse_date("end_date", query.end_date.as_deref())?,
    )
    .map_err(|e| AppError::validation("end_date", e))?;

    let filter = EventFilter {
        warehouse_id: query.warehouse_id.clone(),
        scheme: query.scheme.clone(),
        range,
    };

    let ledger = LedgerService::new(state.db.clone()).build_ledger(&filter, mode).await?;
    let meta = ledger_meta(
        &state.config.reports,
        None,
        filter.warehouse_id.as_deref(),
        filter.scheme.as_deref(),
        Utc::now(),
    );

    respond(
        &state,
        ledger,
        ExportOptions {
            format,
            columns: None,
            geometry: None,
            // The deployment's configured preset stands in when the query names none
            preset: Some(query.preset.unwrap_or_else(|| state.config.reports.default_preset.clone())),
            meta,
            scope: query.warehouse_id,
        },
    )
    .await
}

/// Reconcile client-supplied event collections
pub async fn reconcile_events(Json(request): Json<ReconcileRequest>) -> AppResult<Json<LedgerReport>> {
    let ledger = LedgerService::reconcile_payload(&request.inbound, &request.outbound, request.mode)?;
    Ok(Json(ledger))
}

/// Reconcile client-supplied events and export them as a document
pub async fn render_report(State(state): State<AppState>, Json(request): Json<ReportRequest>) -> AppResult<Response> {
    let ledger = LedgerService::reconcile_payload(&request.inbound, &request.outbound, request.mode)?;

    let mut meta = ledger_meta(
        &state.config.reports,
        request.title,
        request.warehouse_id.as_deref(),
        None,
        Utc::now(),
    );
    if let Some(subtitle) = request.subtitle {
        meta.subtitle = subtitle;
    }
    if let Some(labels) = request.signature_labels {
        meta.signature_labels = labels;
    }

    respond(
        &state,
        ledger,
        ExportOptions {
            format: request.format,
            columns: request.columns,
            geometry: request.geometry,
            preset: request.preset,
            meta,
            scope: request.warehouse_id,
        },
    )
    .await
}

async fn respond(state: &AppState, ledger: LedgerReport, options: ExportOptions) -> AppResult<Response> {
    if options.format == ReportFormat::Json {
        return Ok(Json(ledger).into_response());
    }

    let reports = &state.config.reports;
    let layout = ReportLayout::resolve(options.columns, options.geometry, options.preset.as_deref(), options.meta)?;
    let filename = report_filename(
        options.scope.as_deref(),
        Utc::now().date_naive(),
        options.format.extension(),
    );

    let body = match options.format {
        ReportFormat::Csv => export_csv(&ledger.rows, &layout.columns)?,
        _ => {
            let logo = load_logo(reports.logo_path.as_deref()).await;
            let archive_path = reports.archive_dir.as_ref().map(|dir| dir.join(&filename));
            render_pdf_blocking(ledger.rows, layout, logo, archive_path).await?.bytes
        }
    };

    Ok(attachment(options.format, &filename, body))
}

fn attachment(format: ReportFormat, filename: &str, body: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{}\"", filename)),
        ],
        body,
    )
        .into_response()
}

/// Parse an optional query parameter, falling back to the type's default
fn parse_param<T>(field: &str, value: Option<&str>) -> AppResult<T>
where
    T: FromStr<Err = String> + Default,
{
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => v.parse().map_err(|e| AppError::validation(field, e)),
        None => Ok(T::default()),
    }
}

fn parse_date(field: &str, value: Option<&str>) -> AppResult<Option<NaiveDate>> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => NaiveDate::parse_from_str(v, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| AppError::validation(field, format!("Expected a YYYY-MM-DD date, got '{}'", v))),
        None => Ok(None),
    }
}
