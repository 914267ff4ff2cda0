//! Common types used across the platform

use serde::{Deserialize, Serialize};

/// Output formats for ledger reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Json,
    Csv,
    Pdf,
}

impl ReportFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            ReportFormat::Json => "application/json",
            ReportFormat::Csv => "text/csv",
            ReportFormat::Pdf => "application/pdf",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Json => "json",
            ReportFormat::Csv => "csv",
            ReportFormat::Pdf => "pdf",
        }
    }
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ReportFormat::Json),
            "csv" => Ok(ReportFormat::Csv),
            "pdf" => Ok(ReportFormat::Pdf),
            other => Err(format!("unsupported report format '{}'", other)),
        }
    }
}

/// Inclusive date range for event queries; either end may be open
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<chrono::NaiveDate>,
    pub end: Option<chrono::NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<chrono::NaiveDate>, end: Option<chrono::NaiveDate>) -> Result<Self, &'static str> {
        match (start, end) {
            (Some(s), Some(e)) if s > e => Err("Start date must not be after end date"),
            _ => Ok(Self { start, end }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    #[test]
    fn test_report_format_parse() {
        assert_eq!("PDF".parse::<ReportFormat>(), Ok(ReportFormat::Pdf));
        assert!("xlsx".parse::<ReportFormat>().is_err());
    }

    #[test]
    fn test_open_ended_range() {
        let range = DateRange::new(Some(day(3)), None).unwrap();
        assert_eq!(range.start, Some(day(3)));
        assert_eq!(range.end, None);
        assert_eq!(DateRange::new(None, None).unwrap(), DateRange::default());
        assert!(DateRange::new(Some(day(4)), Some(day(4))).is_ok());
    }

    #[test]
    fn test_reversed_range_is_rejected() {
        assert!(DateRange::new(Some(day(9)), Some(day(1))).is_err());
    }
}
