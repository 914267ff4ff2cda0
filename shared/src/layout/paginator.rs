//! Paginated table layout
//!
//! A single pass over the rows drives an explicit state machine:
//!
//! ```text
//! AwaitingHeader -> RenderingHeader -> RenderingRows -> Finished
//!        ^                                   |
//!        +------------ PageBreak <-----------+
//! ```
//!
//! The row that overflows a page is held in a one-row lookahead and drawn
//! first on the next page. Rows are never split across pages.

use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;
use thiserror::Error;

use super::instruction::{DrawInstruction, FontWeight, Page, Rect, Rgb};
use super::metrics::TextMeasure;
use super::row::{cell_text, CellError, ReportRow};
use super::wrap::wrap_text;
use crate::models::{Align, PageGeometry, ReportColumn, ReportMeta};
use crate::validation::{validate_columns, validate_geometry};

/// Tolerance for floating point comparisons against page bounds
const EPSILON: f32 = 1e-3;

/// Helvetica cap height as a fraction of the font size
const CAP_HEIGHT: f32 = 0.718;

const BORDER_WIDTH: f32 = 0.5;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LayoutError {
    #[error("invalid page geometry: {0}")]
    InvalidGeometry(String),

    #[error("invalid columns: {0}")]
    InvalidColumns(String),

    #[error("rendering cancelled")]
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderState {
    AwaitingHeader,
    RenderingHeader,
    RenderingRows,
    PageBreak,
    Finished,
}

/// Mutable position of one rendering pass
#[derive(Debug, Clone, PartialEq)]
pub struct PageCursor {
    /// 1-based page number
    pub page: u32,
    /// Current vertical offset from the top of the page
    pub offset: f32,
    pub top: f32,
    /// Printable bottom; nothing in the table body may extend below it
    pub bottom: f32,
    pub rows_on_page: usize,
}

impl PageCursor {
    pub fn new(geometry: &PageGeometry) -> Self {
        Self {
            page: 1,
            offset: geometry.margin_top,
            top: geometry.margin_top,
            bottom: geometry.printable_bottom(),
            rows_on_page: 0,
        }
    }

    pub fn fits(&self, height: f32) -> bool {
        self.offset + height <= self.bottom + EPSILON
    }

    fn advance(&mut self, height: f32) {
        self.offset += height;
    }

    fn next_page(&mut self) {
        self.page += 1;
        self.offset = self.top;
        self.rows_on_page = 0;
    }
}

/// Background shade of a row, by parity of its source index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Band {
    Plain,
    Shaded,
}

impl Band {
    pub fn for_index(source_index: usize) -> Self {
        if source_index % 2 == 0 {
            Band::Plain
        } else {
            Band::Shaded
        }
    }

    pub fn color(&self) -> Rgb {
        match self {
            Band::Plain => Rgb::WHITE,
            Band::Shaded => Rgb::BAND_FILL,
        }
    }
}

/// Where a row ended up
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowPlacement {
    /// Position in the caller's input
    pub source_index: usize,
    pub page: u32,
    pub top: f32,
    pub height: f32,
    pub line_count: usize,
    pub band: Band,
    /// Lines were cut to fit an empty page
    pub truncated: bool,
}

impl RowPlacement {
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedRow {
    pub source_index: usize,
    pub reason: String,
}

/// A finished layout: pages of draw instructions plus row bookkeeping
#[derive(Debug, Clone, Serialize)]
pub struct ReportDocument {
    pub page_width: f32,
    pub page_height: f32,
    pub pages: Vec<Page>,
    pub placements: Vec<RowPlacement>,
    pub skipped: Vec<SkippedRow>,
}

impl ReportDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Source indices of the rows drawn on `page`
    pub fn rows_on_page(&self, page: u32) -> Vec<usize> {
        self.placements
            .iter()
            .filter(|p| p.page == page)
            .map(|p| p.source_index)
            .collect()
    }
}

/// A row measured and wrapped, ready to draw
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRow {
    pub source_index: usize,
    /// Wrapped lines per column
    pub cells: Vec<Vec<String>>,
    pub height: f32,
    pub truncated: bool,
}

impl PreparedRow {
    pub fn line_count(&self) -> usize {
        self.cells.iter().map(Vec::len).max().unwrap_or(1)
    }
}

struct RenderPass {
    cursor: PageCursor,
    current: Page,
    done: Vec<Page>,
    placements: Vec<RowPlacement>,
    skipped: Vec<SkippedRow>,
}

impl RenderPass {
    fn new(geometry: &PageGeometry) -> Self {
        Self {
            cursor: PageCursor::new(geometry),
            current: Page::new(1),
            done: Vec::new(),
            placements: Vec::new(),
            skipped: Vec::new(),
        }
    }

    fn push(&mut self, instruction: DrawInstruction) {
        self.current.push(instruction);
    }

    fn start_page(&mut self) {
        self.cursor.next_page();
        let finished = std::mem::replace(&mut self.current, Page::new(self.cursor.page));
        self.done.push(finished);
    }

    fn into_pages(mut self) -> (Vec<Page>, Vec<RowPlacement>, Vec<SkippedRow>) {
        self.done.push(self.current);
        (self.done, self.placements, self.skipped)
    }
}

/// Lays rows out into fixed-size pages
pub struct TableRenderer<'a, M: TextMeasure + ?Sized> {
    columns: &'a [ReportColumn],
    geometry: &'a PageGeometry,
    meta: &'a ReportMeta,
    measure: &'a M,
    cancel: Option<&'a AtomicBool>,
    column_x: Vec<f32>,
    table_width: f32,
}

impl<'a, M: TextMeasure + ?Sized> TableRenderer<'a, M> {
    pub fn new(
        columns: &'a [ReportColumn],
        geometry: &'a PageGeometry,
        meta: &'a ReportMeta,
        measure: &'a M,
    ) -> Result<Self, LayoutError> {
        validate_geometry(geometry).map_err(|e| LayoutError::InvalidGeometry(e.to_string()))?;
        validate_columns(columns, geometry).map_err(LayoutError::InvalidColumns)?;

        let mut column_x = Vec::with_capacity(columns.len());
        let mut x = geometry.margin_left;
        for column in columns {
            column_x.push(x);
            x += column.width;
        }

        Ok(Self {
            columns,
            geometry,
            meta,
            measure,
            cancel: None,
            column_x,
            table_width: x - geometry.margin_left,
        })
    }

    /// Stop at the next row once `flag` is raised
    pub fn with_cancellation(mut self, flag: &'a AtomicBool) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn render<R: ReportRow>(&self, rows: &[R]) -> Result<ReportDocument, LayoutError> {
        let mut pass = RenderPass::new(self.geometry);
        let mut next_index = 0;
        let mut deferred: Option<PreparedRow> = None;
        let mut state = RenderState::AwaitingHeader;

        loop {
            state = match state {
                RenderState::AwaitingHeader => {
                    if pass.cursor.page == 1 {
                        self.draw_title(&mut pass);
                    }
                    RenderState::RenderingHeader
                }
                RenderState::RenderingHeader => {
                    self.draw_header_bar(&mut pass);
                    RenderState::RenderingRows
                }
                RenderState::RenderingRows => {
                    self.check_cancelled()?;
                    let row = match deferred.take() {
                        Some(row) => Some(row),
                        None => self.next_prepared(rows, &mut next_index, &mut pass),
                    };

                    match row {
                        None => RenderState::Finished,
                        Some(row) if !pass.cursor.fits(row.height) && self.can_break(&pass.cursor) => {
                            tracing::debug!(
                                page = pass.cursor.page,
                                row = row.source_index,
                                "Deferring row to next page"
                            );
                            deferred = Some(row);
                            RenderState::PageBreak
                        }
                        Some(row) => {
                            self.draw_row(&mut pass, &row);
                            RenderState::RenderingRows
                        }
                    }
                }
                RenderState::PageBreak => {
                    pass.start_page();
                    RenderState::AwaitingHeader
                }
                RenderState::Finished => {
                    self.draw_footer(&mut pass);
                    break;
                }
            };
        }

        let (mut pages, placements, skipped) = pass.into_pages();
        self.number_pages(&mut pages);

        Ok(ReportDocument {
            page_width: self.geometry.page_width,
            page_height: self.geometry.page_height,
            pages,
            placements,
            skipped,
        })
    }

    /// Measure and wrap one row
    pub fn prepare_row<R: ReportRow + ?Sized>(&self, source_index: usize, row: &R) -> Result<PreparedRow, CellError> {
        let g = self.geometry;

        let mut cells = Vec::with_capacity(self.columns.len());
        for column in self.columns {
            let text = cell_text(row, column, source_index)?;
            let lines = if column.kind.wraps() {
                wrap_text(&text, column.width - 2.0 * g.cell_padding, g.font_size, self.measure)
            } else {
                vec![text]
            };
            cells.push(lines);
        }

        // A row taller than an empty page would never fit anywhere
        let max_lines = (((g.body_capacity() + EPSILON) / g.line_height).floor() as usize).max(1);
        let mut truncated = false;
        for (column, lines) in self.columns.iter().zip(cells.iter_mut()) {
            if lines.len() > max_lines {
                lines.truncate(max_lines);
                if let Some(last) = lines.last_mut() {
                    let max_width = column.width - 2.0 * g.cell_padding;
                    while !last.is_empty() && self.measure.text_width(&format!("{}...", last), g.font_size) > max_width {
                        last.pop();
                    }
                    last.push_str("...");
                }
                truncated = true;
            }
        }

        let line_count = cells.iter().map(Vec::len).max().unwrap_or(1);
        let height = (line_count as f32 * g.line_height).max(g.min_row_height);

        Ok(PreparedRow {
            source_index,
            cells,
            height,
            truncated,
        })
    }

    fn next_prepared<R: ReportRow>(
        &self,
        rows: &[R],
        next_index: &mut usize,
        pass: &mut RenderPass,
    ) -> Option<PreparedRow> {
        while let Some(row) = rows.get(*next_index) {
            let source_index = *next_index;
            *next_index += 1;
            match self.prepare_row(source_index, row) {
                Ok(prepared) => return Some(prepared),
                Err(e) => {
                    tracing::warn!(row = source_index, "Skipping report row: {}", e);
                    pass.skipped.push(SkippedRow {
                        source_index,
                        reason: e.to_string(),
                    });
                }
            }
        }
        None
    }

    /// An empty continuation page always fits a prepared row, so breaking there
    /// would loop forever. Page 1 may still break past its title block.
    fn can_break(&self, cursor: &PageCursor) -> bool {
        cursor.rows_on_page > 0 || (cursor.page == 1 && self.geometry.title_height > 0.0)
    }

    fn check_cancelled(&self) -> Result<(), LayoutError> {
        match self.cancel {
            Some(flag) if flag.load(Ordering::Relaxed) => Err(LayoutError::Cancelled),
            _ => Ok(()),
        }
    }

    fn aligned_x(&self, text: &str, cell_x: f32, cell_width: f32, align: Align) -> f32 {
        match align {
            Align::Left => cell_x + self.geometry.cell_padding,
            Align::Center => {
                let width = self.measure.text_width(text, self.geometry.font_size);
                cell_x + ((cell_width - width) / 2.0).max(self.geometry.cell_padding)
            }
        }
    }

    fn centered_text(&self, text: &str, baseline: f32, font_size: f32, weight: FontWeight, color: Rgb) -> DrawInstruction {
        let width = self.measure.text_width(text, font_size);
        DrawInstruction::Text {
            x: self.geometry.margin_left + ((self.table_width - width) / 2.0).max(0.0),
            baseline,
            text: text.to_string(),
            font_size,
            weight,
            color,
        }
    }

    fn draw_title(&self, pass: &mut RenderPass) {
        let g = self.geometry;
        if g.title_height <= 0.0 {
            return;
        }
        let top = pass.cursor.offset;

        if let Some(logo) = &self.meta.logo {
            let height = (g.title_height - 8.0).min(48.0);
            if height > 0.0 && logo.aspect_ratio.is_finite() && logo.aspect_ratio > 0.0 {
                pass.push(DrawInstruction::Image {
                    asset: logo.name.clone(),
                    rect: Rect::new(g.margin_left, top + 4.0, height * logo.aspect_ratio, height),
                });
            }
        }

        let title_size = g.font_size + 5.0;
        let mut baseline = top + title_size + 4.0;
        pass.push(self.centered_text(&self.meta.title, baseline, title_size, FontWeight::Bold, Rgb::BLACK));

        for line in &self.meta.subtitle {
            baseline += g.line_height;
            if baseline > top + g.title_height {
                break;
            }
            pass.push(self.centered_text(line, baseline, g.font_size, FontWeight::Regular, Rgb::MUTED_TEXT));
        }

        pass.cursor.advance(g.title_height);
    }

    fn draw_header_bar(&self, pass: &mut RenderPass) {
        let g = self.geometry;
        let top = pass.cursor.offset;
        let bar = Rect::new(g.margin_left, top, self.table_width, g.header_height);

        pass.push(DrawInstruction::FillRect {
            rect: bar,
            color: Rgb::HEADER_FILL,
        });

        let baseline = top + (g.header_height + g.font_size * CAP_HEIGHT) / 2.0;
        for (i, column) in self.columns.iter().enumerate() {
            let x = self.column_x[i];
            pass.push(DrawInstruction::Text {
                x: self.aligned_x(&column.label, x, column.width, column.kind.alignment()),
                baseline,
                text: column.label.clone(),
                font_size: g.font_size,
                weight: FontWeight::Bold,
                color: Rgb::BLACK,
            });
            if i > 0 {
                pass.push(vertical_rule(x, top, g.header_height));
            }
        }

        pass.push(DrawInstruction::StrokeRect {
            rect: bar,
            color: Rgb::BORDER,
            line_width: BORDER_WIDTH,
        });
        pass.cursor.advance(g.header_height);
    }

    fn draw_row(&self, pass: &mut RenderPass, row: &PreparedRow) {
        let g = self.geometry;
        let top = pass.cursor.offset;
        let band = Band::for_index(row.source_index);
        let rect = Rect::new(g.margin_left, top, self.table_width, row.height);

        pass.push(DrawInstruction::FillRect {
            rect,
            color: band.color(),
        });

        for (i, (column, lines)) in self.columns.iter().zip(&row.cells).enumerate() {
            let x = self.column_x[i];
            let block_top = top + (row.height - lines.len() as f32 * g.line_height) / 2.0;

            for (n, line) in lines.iter().enumerate() {
                if line.is_empty() {
                    continue;
                }
                let baseline = block_top + n as f32 * g.line_height + (g.line_height + g.font_size * CAP_HEIGHT) / 2.0;
                pass.push(DrawInstruction::Text {
                    x: self.aligned_x(line, x, column.width, column.kind.alignment()),
                    baseline,
                    text: line.clone(),
                    font_size: g.font_size,
                    weight: FontWeight::Regular,
                    color: Rgb::BLACK,
                });
            }
            if i > 0 {
                pass.push(vertical_rule(x, top, row.height));
            }
        }

        pass.push(DrawInstruction::StrokeRect {
            rect,
            color: Rgb::BORDER,
            line_width: BORDER_WIDTH,
        });

        pass.placements.push(RowPlacement {
            source_index: row.source_index,
            page: pass.cursor.page,
            top,
            height: row.height,
            line_count: row.line_count(),
            band,
            truncated: row.truncated,
        });
        pass.cursor.advance(row.height);
        pass.cursor.rows_on_page += 1;
    }

    /// Signature block, anchored to the bottom margin of the last page
    fn draw_footer(&self, pass: &mut RenderPass) {
        let g = self.geometry;
        let labels = &self.meta.signature_labels;
        if labels.is_empty() {
            return;
        }

        let slot = self.table_width / labels.len() as f32;
        let inset = (slot * 0.1).min(12.0);
        let line_y = g.signature_line_y();

        for (i, label) in labels.iter().enumerate() {
            let x = g.margin_left + slot * i as f32;
            pass.push(DrawInstruction::Line {
                from: (x + inset, line_y),
                to: (x + slot - inset, line_y),
                color: Rgb::BLACK,
                line_width: 0.75,
            });

            let width = self.measure.text_width(label, g.font_size);
            pass.push(DrawInstruction::Text {
                x: x + ((slot - width) / 2.0).max(0.0),
                baseline: g.signature_baseline(),
                text: label.clone(),
                font_size: g.font_size,
                weight: FontWeight::Regular,
                color: Rgb::BLACK,
            });
        }
    }

    fn number_pages(&self, pages: &mut [Page]) {
        let g = self.geometry;
        let total = pages.len();
        let size = g.page_marker_size();
        let baseline = g.page_marker_baseline();

        for page in pages.iter_mut() {
            let text = format!("Page {} of {}", page.number, total);
            page.push(self.centered_text(&text, baseline, size, FontWeight::Regular, Rgb::MUTED_TEXT));
        }
    }
}

fn vertical_rule(x: f32, top: f32, height: f32) -> DrawInstruction {
    DrawInstruction::Line {
        from: (x, top),
        to: (x, top + height),
        color: Rgb::BORDER,
        line_width: BORDER_WIDTH,
    }
}

/// Lay out `rows` in one pass
pub fn render<R, M>(
    rows: &[R],
    columns: &[ReportColumn],
    geometry: &PageGeometry,
    meta: &ReportMeta,
    measure: &M,
) -> Result<ReportDocument, LayoutError>
where
    R: ReportRow,
    M: TextMeasure + ?Sized,
{
    TableRenderer::new(columns, geometry, meta, measure)?.render(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::metrics::FixedWidthMetrics;
    use crate::models::ColumnKind;
    use serde_json::{json, Value};

    // 5pt per character at font size 10
    const MONO: FixedWidthMetrics = FixedWidthMetrics { em_fraction: 0.5 };

    fn geometry() -> PageGeometry {
        PageGeometry {
            page_width: 300.0,
            page_height: 560.0,
            margin_top: 20.0,
            margin_bottom: 60.0,
            margin_left: 20.0,
            margin_right: 20.0,
            title_height: 0.0,
            header_height: 20.0,
            min_row_height: 20.0,
            line_height: 12.0,
            cell_padding: 5.0,
            font_size: 10.0,
        }
    }

    // Usable text width 100pt = 20 characters
    fn columns() -> Vec<ReportColumn> {
        vec![
            ReportColumn::new("serial", "No.", 30.0, ColumnKind::Serial),
            ReportColumn::new("description", "Description", 110.0, ColumnKind::Text),
            ReportColumn::new("qty", "Qty", 50.0, ColumnKind::Numeric),
        ]
    }

    fn two_line_rows(n: usize) -> Vec<Value> {
        (0..n)
            .map(|i| json!({"description": "aaaaaaaaaa bbbbbbbbbbbb", "qty": i}))
            .collect()
    }

    #[test]
    fn test_row_height_uses_tallest_cell() {
        let g = geometry();
        let cols = columns();
        let meta = ReportMeta::default();
        let renderer = TableRenderer::new(&cols, &g, &meta, &MONO).unwrap();

        let short = renderer.prepare_row(0, &json!({"description": "short", "qty": 1})).unwrap();
        assert_eq!(short.line_count(), 1);
        assert_eq!(short.height, 20.0);

        let two = renderer.prepare_row(0, &two_line_rows(1)[0]).unwrap();
        assert_eq!(two.line_count(), 2);
        assert_eq!(two.height, 24.0);
    }

    #[test]
    fn test_page_break_defers_whole_row() {
        let g = geometry();
        let cols = columns();
        let doc = render(&two_line_rows(50), &cols, &g, &ReportMeta::default(), &MONO).unwrap();

        // Body starts at 40; 40 + 19 * 24 = 496 <= 500, the 20th row would end at 520
        assert_eq!(doc.rows_on_page(1), (0..19).collect::<Vec<_>>());
        assert_eq!(doc.rows_on_page(2), (19..38).collect::<Vec<_>>());
        assert_eq!(doc.rows_on_page(3), (38..50).collect::<Vec<_>>());
        assert_eq!(doc.page_count(), 3);

        let first_on_two = &doc.placements[19];
        assert_eq!(first_on_two.page, 2);
        assert_eq!(first_on_two.top, 40.0);
    }

    #[test]
    fn test_header_repeats_without_title() {
        let g = PageGeometry {
            title_height: 40.0,
            ..geometry()
        };
        let cols = columns();
        let meta = ReportMeta::titled("Stock Ledger");
        let doc = render(&two_line_rows(30), &cols, &g, &meta, &MONO).unwrap();

        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.pages[0].texts().filter(|t| *t == "Stock Ledger").count(), 1);
        assert_eq!(doc.pages[1].texts().filter(|t| *t == "Stock Ledger").count(), 0);
        for page in &doc.pages {
            assert_eq!(page.texts().filter(|t| *t == "Description").count(), 1);
        }
    }

    #[test]
    fn test_banding_follows_source_index() {
        let g = geometry();
        let cols = columns();
        let doc = render(&two_line_rows(25), &cols, &g, &ReportMeta::default(), &MONO).unwrap();

        for placement in &doc.placements {
            assert_eq!(placement.band, Band::for_index(placement.source_index));
        }
        // Row 19 opens page 2 and is still shaded
        assert_eq!(doc.placements[19].band, Band::Shaded);
    }

    #[test]
    fn test_bad_row_is_skipped() {
        let g = geometry();
        let cols = columns();
        let rows = vec![
            json!({"description": "ok", "qty": 1}),
            json!({"description": "bad", "qty": "many"}),
            json!("not a row"),
            json!({"description": "ok again", "qty": 2}),
        ];

        let doc = render(&rows, &cols, &g, &ReportMeta::default(), &MONO).unwrap();
        let drawn: Vec<usize> = doc.placements.iter().map(|p| p.source_index).collect();
        assert_eq!(drawn, vec![0, 3]);
        assert_eq!(doc.skipped.len(), 2);
        assert_eq!(doc.skipped[0].source_index, 1);
        // Banding keeps the source parity across the gap
        assert_eq!(doc.placements[1].band, Band::Shaded);
    }

    #[test]
    fn test_footer_only_on_last_page() {
        let g = geometry();
        let cols = columns();
        let meta = ReportMeta {
            signature_labels: vec!["Prepared by".into(), "Approved by".into()],
            ..ReportMeta::default()
        };

        let doc = render(&two_line_rows(30), &cols, &g, &meta, &MONO).unwrap();
        assert_eq!(doc.page_count(), 2);
        assert!(!doc.pages[0].texts().any(|t| t == "Prepared by"));
        assert!(doc.pages[1].texts().any(|t| t == "Prepared by"));
        assert!(doc.pages[1].texts().any(|t| t == "Page 2 of 2"));
        assert!(doc.pages[0].texts().any(|t| t == "Page 1 of 2"));
    }

    #[test]
    fn test_oversized_row_is_truncated_to_fit() {
        let g = geometry();
        let cols = columns();
        let long = "word ".repeat(400);
        let rows = vec![json!({"description": long, "qty": 1})];

        let doc = render(&rows, &cols, &g, &ReportMeta::default(), &MONO).unwrap();
        let placement = &doc.placements[0];
        assert!(placement.truncated);
        assert!(placement.bottom() <= g.printable_bottom());
    }

    #[test]
    fn test_empty_input_still_has_chrome() {
        let g = geometry();
        let cols = columns();
        let rows: Vec<Value> = Vec::new();
        let doc = render(&rows, &cols, &g, &ReportMeta::default(), &MONO).unwrap();

        assert_eq!(doc.page_count(), 1);
        assert!(doc.placements.is_empty());
        assert!(doc.pages[0].texts().any(|t| t == "Qty"));
    }

    #[test]
    fn test_cancelled_render_stops() {
        let g = geometry();
        let cols = columns();
        let meta = ReportMeta::default();
        let flag = AtomicBool::new(true);

        let result = TableRenderer::new(&cols, &g, &meta, &MONO)
            .unwrap()
            .with_cancellation(&flag)
            .render(&two_line_rows(3));
        assert_eq!(result.unwrap_err(), LayoutError::Cancelled);
    }

    #[test]
    fn test_invalid_geometry_is_rejected() {
        let g = PageGeometry {
            line_height: 0.0,
            ..geometry()
        };
        let cols = columns();
        let meta = ReportMeta::default();
        assert!(matches!(
            TableRenderer::new(&cols, &g, &meta, &MONO),
            Err(LayoutError::InvalidGeometry(_))
        ));
    }
}
