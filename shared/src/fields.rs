//! Field mapping between ledger rows and report/export columns
//!
//! Every internal field has exactly one external label and a fixed set of
//! accepted aliases. Columns are resolved against this table once, before
//! rendering, rather than by string matching inside the render loop.

use std::collections::HashSet;

use thiserror::Error;

use crate::models::{ColumnKind, ReportColumn};

/// A field of [`crate::models::LedgerRow`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LedgerField {
    Key,
    MaterialCode,
    Description,
    SchemeOrPo,
    StockIn,
    StockOut,
    Remaining,
    LastEventDate,
}

impl LedgerField {
    pub const ALL: [LedgerField; 8] = [
        LedgerField::Key,
        LedgerField::MaterialCode,
        LedgerField::Description,
        LedgerField::SchemeOrPo,
        LedgerField::StockIn,
        LedgerField::StockOut,
        LedgerField::Remaining,
        LedgerField::LastEventDate,
    ];

    pub fn internal_name(&self) -> &'static str {
        match self {
            LedgerField::Key => "key",
            LedgerField::MaterialCode => "material_code",
            LedgerField::Description => "description",
            LedgerField::SchemeOrPo => "scheme_or_po",
            LedgerField::StockIn => "stock_in",
            LedgerField::StockOut => "stock_out",
            LedgerField::Remaining => "remaining",
            LedgerField::LastEventDate => "last_event_date",
        }
    }

    pub fn display_label(&self) -> &'static str {
        match self {
            LedgerField::Key => "Ledger Key",
            LedgerField::MaterialCode => "Material Code",
            LedgerField::Description => "Description",
            LedgerField::SchemeOrPo => "Scheme / PO",
            LedgerField::StockIn => "Stock In",
            LedgerField::StockOut => "Stock Out",
            LedgerField::Remaining => "Remaining",
            LedgerField::LastEventDate => "Last Movement",
        }
    }

    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            LedgerField::Key => &[],
            LedgerField::MaterialCode => &["materialCode"],
            LedgerField::Description => &["materialDescription"],
            LedgerField::SchemeOrPo => &["schemeOrPO", "scheme", "po_number"],
            LedgerField::StockIn => &["stockIn", "total_in"],
            LedgerField::StockOut => &["stockOut", "total_out"],
            LedgerField::Remaining => &["remainingStock", "balance"],
            LedgerField::LastEventDate => &["lastEventDate", "date"],
        }
    }

    pub fn column_kind(&self) -> ColumnKind {
        match self {
            LedgerField::StockIn | LedgerField::StockOut | LedgerField::Remaining => ColumnKind::Numeric,
            LedgerField::LastEventDate => ColumnKind::Date,
            _ => ColumnKind::Text,
        }
    }

    /// Resolve an internal name or alias
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|field| field.internal_name() == name || field.aliases().contains(&name))
    }
}

/// Column validation failures
#[derive(Debug, Error, PartialEq)]
pub enum FieldMapError {
    #[error("no columns supplied")]
    NoColumns,

    #[error("unknown ledger field '{0}'")]
    UnknownField(String),

    #[error("field table is ambiguous: '{0}' maps to more than one field")]
    AmbiguousName(String),
}

/// Checks that the field table is exhaustive and unambiguous.
///
/// Called once at startup.
pub fn check_field_table() -> Result<(), FieldMapError> {
    let mut seen = HashSet::new();
    for field in LedgerField::ALL {
        for name in std::iter::once(field.internal_name()).chain(field.aliases().iter().copied()) {
            if !seen.insert(name) {
                return Err(FieldMapError::AmbiguousName(name.to_string()));
            }
        }
    }
    Ok(())
}

/// Reject columns that do not name a ledger field.
///
/// Serial columns carry no field and always pass.
pub fn validate_ledger_columns(columns: &[ReportColumn]) -> Result<(), FieldMapError> {
    if columns.is_empty() {
        return Err(FieldMapError::NoColumns);
    }
    for column in columns {
        if column.kind == ColumnKind::Serial {
            continue;
        }
        if LedgerField::parse(&column.field).is_none() {
            return Err(FieldMapError::UnknownField(column.field.clone()));
        }
    }
    Ok(())
}

/// Standard ledger column set, scaled to fill `content_width`
pub fn default_ledger_columns(content_width: f32) -> Vec<ReportColumn> {
    // Relative weights: serial, code, description, scheme, in, out, remaining, date
    const WEIGHTS: [f32; 8] = [0.06, 0.13, 0.29, 0.13, 0.1, 0.1, 0.1, 0.09];

    let fields = [
        None,
        Some(LedgerField::MaterialCode),
        Some(LedgerField::Description),
        Some(LedgerField::SchemeOrPo),
        Some(LedgerField::StockIn),
        Some(LedgerField::StockOut),
        Some(LedgerField::Remaining),
        Some(LedgerField::LastEventDate),
    ];

    fields
        .into_iter()
        .zip(WEIGHTS)
        .map(|(field, weight)| {
            let width = (content_width * weight).floor();
            match field {
                Some(field) => ReportColumn::new(
                    field.internal_name(),
                    field.display_label(),
                    width,
                    field.column_kind(),
                ),
                None => ReportColumn::new("serial", "No.", width, ColumnKind::Serial),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_table_is_unambiguous() {
        assert_eq!(check_field_table(), Ok(()));
    }

    #[test]
    fn test_parse_aliases() {
        assert_eq!(LedgerField::parse("stockIn"), Some(LedgerField::StockIn));
        assert_eq!(LedgerField::parse("stock_in"), Some(LedgerField::StockIn));
        assert_eq!(LedgerField::parse("schemeOrPO"), Some(LedgerField::SchemeOrPo));
        assert_eq!(LedgerField::parse("price"), None);
    }

    #[test]
    fn test_validate_columns() {
        let columns = default_ledger_columns(500.0);
        assert_eq!(validate_ledger_columns(&columns), Ok(()));
        assert_eq!(validate_ledger_columns(&[]), Err(FieldMapError::NoColumns));

        let bad = vec![ReportColumn::new("price", "Price", 50.0, ColumnKind::Numeric)];
        assert_eq!(
            validate_ledger_columns(&bad),
            Err(FieldMapError::UnknownField("price".into()))
        );
    }

    #[test]
    fn test_default_columns_fit_width() {
        let columns = default_ledger_columns(523.28);
        let total: f32 = columns.iter().map(|c| c.width).sum();
        assert!(total <= 523.28);
        assert_eq!(columns[0].kind, ColumnKind::Serial);
        assert_eq!(columns[4].kind, ColumnKind::Numeric);
    }
}
