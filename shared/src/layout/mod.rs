//! Table layout: wrapping, measuring and paginating rows into draw instructions
//!
//! The output is format-neutral. The backend encodes it to PDF; the WASM
//! bindings hand it to the browser as JSON.

pub mod instruction;
pub mod metrics;
pub mod paginator;
pub mod row;
pub mod wrap;

pub use instruction::{DrawInstruction, FontWeight, Page, Rect, Rgb};
pub use metrics::{FixedWidthMetrics, HelveticaMetrics, TextMeasure};
pub use paginator::{
    render, Band, LayoutError, PageCursor, PreparedRow, RenderState, ReportDocument, RowPlacement, SkippedRow,
    TableRenderer,
};
pub use row::{cell_text, format_quantity, CellError, CellValue, ReportRow};
pub use wrap::wrap_text;
