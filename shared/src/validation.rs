//! Validation utilities for report requests
//!
//! Geometry and column sets are checked once before a render starts, so the
//! layout loop can assume positive, finite dimensions.

use crate::models::{PageGeometry, ReportColumn};

// ============================================================================
// Page Geometry
// ============================================================================

/// Validate that page geometry leaves room for at least one row per page
pub fn validate_geometry(geometry: &PageGeometry) -> Result<(), &'static str> {
    let dimensions = [
        geometry.page_width,
        geometry.page_height,
        geometry.margin_top,
        geometry.margin_bottom,
        geometry.margin_left,
        geometry.margin_right,
        geometry.title_height,
        geometry.header_height,
        geometry.min_row_height,
        geometry.line_height,
        geometry.cell_padding,
        geometry.font_size,
    ];
    if dimensions.iter().any(|d| !d.is_finite()) {
        return Err("Page dimensions must be finite numbers");
    }
    if dimensions.iter().any(|d| *d < 0.0) {
        return Err("Page dimensions cannot be negative");
    }

    if geometry.page_width <= 0.0 || geometry.page_height <= 0.0 {
        return Err("Page size must be positive");
    }
    if geometry.font_size <= 0.0 {
        return Err("Font size must be positive");
    }
    if geometry.line_height <= 0.0 {
        return Err("Line height must be positive");
    }
    if geometry.min_row_height <= 0.0 {
        return Err("Minimum row height must be positive");
    }
    if geometry.content_width() <= 0.0 {
        return Err("Horizontal margins leave no room for content");
    }
    if geometry.body_capacity() < geometry.min_row_height.max(geometry.line_height) {
        return Err("Page leaves no room for a single row below the header");
    }
    if geometry.body_capacity() - geometry.title_height < geometry.min_row_height.max(geometry.line_height) {
        return Err("Title block leaves no room for a row on the first page");
    }

    // Label descenders must clear the top of the page marker
    let label_bottom = geometry.signature_baseline() + geometry.font_size * 0.25;
    if label_bottom > geometry.page_marker_baseline() - geometry.page_marker_size() {
        return Err("Bottom margin is too small for the signature footer and page marker");
    }
    Ok(())
}

// ============================================================================
// Columns
// ============================================================================

/// Validate column widths against the printable width
pub fn validate_columns(columns: &[ReportColumn], geometry: &PageGeometry) -> Result<(), String> {
    if columns.is_empty() {
        return Err("At least one column is required".to_string());
    }

    let mut total = 0.0;
    for column in columns {
        if column.field.trim().is_empty() {
            return Err("Column field name cannot be empty".to_string());
        }
        if !column.width.is_finite() || column.width <= 2.0 * geometry.cell_padding {
            return Err(format!(
                "Column '{}' must be wider than its padding ({} pt)",
                column.field,
                2.0 * geometry.cell_padding
            ));
        }
        total += column.width;
    }

    // Small tolerance for widths computed from fractions of the content width
    if total > geometry.content_width() + 0.01 {
        return Err(format!(
            "Columns are {:.1} pt wide but the page only has {:.1} pt",
            total,
            geometry.content_width()
        ));
    }
    Ok(())
}

/// Validate a page preset name
pub fn validate_preset(name: &str) -> Result<(), &'static str> {
    match PageGeometry::preset(name) {
        Some(_) => Ok(()),
        None => Err("Unknown page preset (expected a4_portrait or a4_landscape)"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ColumnKind;

    // ========================================================================
    // Geometry Tests
    // ========================================================================

    #[test]
    fn test_presets_are_valid() {
        assert!(validate_geometry(&PageGeometry::a4_portrait()).is_ok());
        assert!(validate_geometry(&PageGeometry::a4_landscape()).is_ok());
    }

    #[test]
    fn test_non_positive_line_height() {
        let g = PageGeometry {
            line_height: 0.0,
            ..PageGeometry::a4_portrait()
        };
        assert_eq!(validate_geometry(&g), Err("Line height must be positive"));
    }

    #[test]
    fn test_negative_and_nan_dimensions() {
        let g = PageGeometry {
            margin_left: -1.0,
            ..PageGeometry::a4_portrait()
        };
        assert!(validate_geometry(&g).is_err());

        let g = PageGeometry {
            font_size: f32::NAN,
            ..PageGeometry::a4_portrait()
        };
        assert!(validate_geometry(&g).is_err());
    }

    #[test]
    fn test_margins_swallow_page() {
        let g = PageGeometry {
            margin_bottom: 800.0,
            ..PageGeometry::a4_portrait()
        };
        assert!(validate_geometry(&g).is_err());
    }

    #[test]
    fn test_title_swallows_first_page() {
        let g = PageGeometry {
            title_height: 700.0,
            ..PageGeometry::a4_portrait()
        };
        assert_eq!(
            validate_geometry(&g),
            Err("Title block leaves no room for a row on the first page")
        );
    }

    #[test]
    fn test_bottom_margin_too_small_for_footer() {
        for margin_bottom in [0.0, 12.0, 18.0, 30.0] {
            let g = PageGeometry {
                margin_bottom,
                ..PageGeometry::a4_portrait()
            };
            assert_eq!(
                validate_geometry(&g),
                Err("Bottom margin is too small for the signature footer and page marker"),
                "margin_bottom = {}",
                margin_bottom
            );
        }
    }

    #[test]
    fn test_footer_stays_inside_page() {
        let g = PageGeometry::a4_portrait();
        assert!(g.signature_line_y() >= g.printable_bottom());
        assert!(g.signature_baseline() + g.font_size * 0.25 <= g.page_marker_baseline() - g.page_marker_size());
        assert!(g.page_marker_baseline() < g.page_height);
    }

    // ========================================================================
    // Column Tests
    // ========================================================================

    #[test]
    fn test_columns_fit() {
        let g = PageGeometry::a4_portrait();
        let columns = vec![
            ReportColumn::new("material_code", "Code", 100.0, ColumnKind::Text),
            ReportColumn::new("remaining", "Remaining", 80.0, ColumnKind::Numeric),
        ];
        assert!(validate_columns(&columns, &g).is_ok());
    }

    #[test]
    fn test_empty_columns() {
        assert!(validate_columns(&[], &PageGeometry::a4_portrait()).is_err());
    }

    #[test]
    fn test_column_narrower_than_padding() {
        let g = PageGeometry::a4_portrait();
        let columns = vec![ReportColumn::new("qty", "Qty", 8.0, ColumnKind::Numeric)];
        let err = validate_columns(&columns, &g).unwrap_err();
        assert!(err.contains("qty"));
    }

    #[test]
    fn test_columns_wider_than_page() {
        let g = PageGeometry::a4_portrait();
        let columns = vec![
            ReportColumn::new("description", "Description", 400.0, ColumnKind::Text),
            ReportColumn::new("remaining", "Remaining", 200.0, ColumnKind::Numeric),
        ];
        assert!(validate_columns(&columns, &g).is_err());
    }

    #[test]
    fn test_validate_preset() {
        assert!(validate_preset("a4_landscape").is_ok());
        assert!(validate_preset("letter").is_err());
    }
}
