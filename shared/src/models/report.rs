//! Report layout models

use serde::{Deserialize, Serialize};

/// How a column's values are laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Variable-length text, word-wrapped to the column width
    #[default]
    Text,
    /// Quantities, single line, centered
    Numeric,
    /// Dates, single line
    Date,
    /// Running row number, ignores the row's fields
    Serial,
}

impl ColumnKind {
    pub fn alignment(&self) -> Align {
        match self {
            ColumnKind::Numeric | ColumnKind::Serial => Align::Center,
            ColumnKind::Text | ColumnKind::Date => Align::Left,
        }
    }

    pub fn wraps(&self) -> bool {
        matches!(self, ColumnKind::Text)
    }
}

/// Horizontal alignment of cell text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    Center,
}

/// Declarative mapping from a row field to a report column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportColumn {
    pub field: String,
    #[serde(alias = "displayLabel")]
    pub label: String,
    /// Column width in points
    pub width: f32,
    #[serde(default)]
    pub kind: ColumnKind,
}

impl ReportColumn {
    pub fn new(field: impl Into<String>, label: impl Into<String>, width: f32, kind: ColumnKind) -> Self {
        Self {
            field: field.into(),
            label: label.into(),
            width,
            kind,
        }
    }
}

/// Page dimensions governing layout decisions, in points.
///
/// Every field is required: callers pick values explicitly or choose a named
/// preset via [`PageGeometry::preset`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    pub page_width: f32,
    pub page_height: f32,
    pub margin_top: f32,
    /// Reserved footer area at the bottom of every page
    pub margin_bottom: f32,
    pub margin_left: f32,
    pub margin_right: f32,
    /// Title chrome on page 1; zero disables it
    pub title_height: f32,
    pub header_height: f32,
    pub min_row_height: f32,
    pub line_height: f32,
    pub cell_padding: f32,
    pub font_size: f32,
}

const A4_SHORT: f32 = 595.28;
const A4_LONG: f32 = 841.89;

impl PageGeometry {
    pub fn a4_portrait() -> Self {
        Self {
            page_width: A4_SHORT,
            page_height: A4_LONG,
            margin_top: 36.0,
            margin_bottom: 90.0,
            margin_left: 36.0,
            margin_right: 36.0,
            title_height: 72.0,
            header_height: 22.0,
            min_row_height: 20.0,
            line_height: 12.0,
            cell_padding: 4.0,
            font_size: 9.0,
        }
    }

    pub fn a4_landscape() -> Self {
        Self {
            page_width: A4_LONG,
            page_height: A4_SHORT,
            ..Self::a4_portrait()
        }
    }

    /// Look up a named preset
    pub fn preset(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "a4_portrait" | "a4" => Some(Self::a4_portrait()),
            "a4_landscape" => Some(Self::a4_landscape()),
            _ => None,
        }
    }

    /// Lowest y a row may reach (top-down coordinates)
    pub fn printable_bottom(&self) -> f32 {
        self.page_height - self.margin_bottom
    }

    pub fn content_width(&self) -> f32 {
        self.page_width - self.margin_left - self.margin_right
    }

    /// Height available to rows on a page that carries only the column bar
    pub fn body_capacity(&self) -> f32 {
        self.printable_bottom() - self.margin_top - self.header_height
    }

    /// Signature rule in the bottom margin of the last page
    pub fn signature_line_y(&self) -> f32 {
        self.printable_bottom() + self.margin_bottom * 0.4
    }

    pub fn signature_baseline(&self) -> f32 {
        self.signature_line_y() + self.font_size + 2.0
    }

    pub fn page_marker_size(&self) -> f32 {
        (self.font_size - 1.0).max(1.0)
    }

    /// Baseline of the "Page N of M" marker
    pub fn page_marker_baseline(&self) -> f32 {
        self.page_height - (self.margin_bottom * 0.15).max(6.0)
    }
}

/// Reference to a static image resolved by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetRef {
    pub name: String,
    /// Width divided by height
    pub aspect_ratio: f32,
}

/// Document chrome: title block and footer signatures
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportMeta {
    pub title: String,
    #[serde(default)]
    pub subtitle: Vec<String>,
    #[serde(default)]
    pub signature_labels: Vec<String>,
    #[serde(default)]
    pub logo: Option<AssetRef>,
}

impl ReportMeta {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}
