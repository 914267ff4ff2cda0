//! Report rendering service
//! Resolves layout settings, runs the paginator off the async runtime and
//! hands the encoded document to the output sinks

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};

use shared::layout::{HelveticaMetrics, TableRenderer};
use shared::{default_ledger_columns, validate_ledger_columns, LedgerRow, PageGeometry, ReportColumn, ReportMeta};

use super::assets::ImageAsset;
use super::pdf::encode_pdf;
use super::sink::{FileSink, MemorySink, ReportSink};
use crate::config::ReportsConfig;
use crate::error::{AppError, AppResult};

/// Everything the paginator needs besides the rows
#[derive(Debug, Clone)]
pub struct ReportLayout {
    pub columns: Vec<ReportColumn>,
    pub geometry: PageGeometry,
    pub meta: ReportMeta,
}

impl ReportLayout {
    /// Take explicit geometry, else the named preset; one of them is required.
    /// Columns default to the standard ledger set sized to the page.
    pub fn resolve(
        columns: Option<Vec<ReportColumn>>,
        geometry: Option<PageGeometry>,
        preset: Option<&str>,
        meta: ReportMeta,
    ) -> AppResult<Self> {
        let geometry = match (geometry, preset) {
            (Some(geometry), _) => geometry,
            (None, Some(name)) => PageGeometry::preset(name)
                .ok_or_else(|| AppError::validation("preset", format!("Unknown page preset '{}'", name)))?,
            (None, None) => return Err(AppError::validation("geometry", "geometry or preset is required")),
        };

        let columns = columns.unwrap_or_else(|| default_ledger_columns(geometry.content_width()));
        validate_ledger_columns(&columns)?;

        Ok(Self {
            columns,
            geometry,
            meta,
        })
    }
}

/// Title block and footer for a ledger report
pub fn ledger_meta(
    config: &ReportsConfig,
    title: Option<String>,
    warehouse_id: Option<&str>,
    scheme: Option<&str>,
    generated_at: DateTime<Utc>,
) -> ReportMeta {
    let mut subtitle = Vec::new();
    if let Some(warehouse) = warehouse_id {
        subtitle.push(format!("Warehouse: {}", warehouse));
    }
    if let Some(scheme) = scheme {
        subtitle.push(format!("Scheme / PO: {}", scheme));
    }
    subtitle.push(format!("Generated: {}", generated_at.format("%Y-%m-%d %H:%M UTC")));

    ReportMeta {
        title: title.unwrap_or_else(|| format!("{} - Material Stock Ledger", config.company_name)),
        subtitle,
        signature_labels: config.signature_labels.clone(),
        logo: None,
    }
}

#[derive(Debug)]
pub struct RenderedReport {
    pub bytes: Vec<u8>,
    pub page_count: usize,
    pub skipped_rows: usize,
}

/// Lay out and encode `rows`, then commit the bytes to memory and, when
/// `archive_path` is set, to disk. Blocking; call from a blocking thread.
pub fn render_pdf(
    rows: &[LedgerRow],
    layout: &ReportLayout,
    logo: Option<&ImageAsset>,
    cancel: &AtomicBool,
    archive_path: Option<&Path>,
) -> AppResult<RenderedReport> {
    let meta = ReportMeta {
        logo: logo.map(ImageAsset::asset_ref),
        ..layout.meta.clone()
    };

    let document = TableRenderer::new(&layout.columns, &layout.geometry, &meta, &HelveticaMetrics)?
        .with_cancellation(cancel)
        .render(rows)?;
    let bytes = encode_pdf(&document, logo);

    if let Some(path) = archive_path {
        let mut sink = FileSink::create(path)?;
        sink.write_document(&bytes)?;
        sink.finish()?;
    }

    let mut sink = MemorySink::new();
    sink.write_document(&bytes)?;
    sink.finish()?;

    Ok(RenderedReport {
        bytes: sink.into_bytes(),
        page_count: document.page_count(),
        skipped_rows: document.skipped.len(),
    })
}

/// Raises the cancellation flag when dropped
struct CancelOnDrop(Arc<AtomicBool>);

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        self.0.store(true, Ordering::Relaxed);
    }
}

/// Run [`render_pdf`] on the blocking pool.
///
/// Dropping the returned future (for example when the client disconnects)
/// stops the layout at the next row.
pub async fn render_pdf_blocking(
    rows: Vec<LedgerRow>,
    layout: ReportLayout,
    logo: Option<ImageAsset>,
    archive_path: Option<PathBuf>,
) -> AppResult<RenderedReport> {
    let cancel = Arc::new(AtomicBool::new(false));
    let _guard = CancelOnDrop(cancel.clone());

    let task = tokio::task::spawn_blocking(move || {
        render_pdf(&rows, &layout, logo.as_ref(), &cancel, archive_path.as_deref())
    });

    let report = task
        .await
        .map_err(|e| AppError::Internal(format!("Render task failed: {}", e)))??;

    tracing::info!(
        pages = report.page_count,
        skipped = report.skipped_rows,
        bytes = report.bytes.len(),
        "Report rendered"
    );
    Ok(report)
}
