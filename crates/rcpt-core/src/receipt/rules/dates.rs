//! Date extraction for retail receipts.
//!
//! Dates are recognized by shape only and returned as printed. No calendar
//! validation happens here; `13/45/9999` is a perfectly good match.

use chrono::NaiveDate;
use serde::Serialize;

use super::patterns::DATE_ANY;
use super::{ExtractionMatch, FieldExtractor};

/// The accepted date shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DateShape {
    /// `5/12/23`, `05/12/2023`
    Numeric,
    /// `January 5, 2023`
    Textual,
    /// `2023-05-12`
    Iso,
}

/// A date found on a receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptDate {
    /// Literal text as printed.
    pub text: String,
    /// Which shape matched.
    pub shape: DateShape,
}

impl ReceiptDate {
    /// Best-effort calendar interpretation, for display only.
    ///
    /// Numeric dates are read month-first; two-digit years land in the 2000s.
    pub fn to_naive_date(&self) -> Option<NaiveDate> {
        match self.shape {
            DateShape::Numeric => {
                let mut parts = self.text.split('/');
                let month: u32 = parts.next()?.parse().ok()?;
                let day: u32 = parts.next()?.parse().ok()?;
                let year = parse_year(parts.next()?)?;
                NaiveDate::from_ymd_opt(year, month, day)
            }
            DateShape::Textual => NaiveDate::parse_from_str(&self.text, "%B %d, %Y").ok(),
            DateShape::Iso => NaiveDate::parse_from_str(&self.text, "%Y-%m-%d").ok(),
        }
    }
}

/// Date field extractor.
pub struct DateExtractor;

impl DateExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = ExtractionMatch<ReceiptDate>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        DATE_ANY.captures(text).map(|caps| to_match(&caps))
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        DATE_ANY.captures_iter(text).map(|caps| to_match(&caps)).collect()
    }
}

/// First date in the text by position, whatever its shape.
pub fn extract_date(text: &str) -> Option<ExtractionMatch<ReceiptDate>> {
    DateExtractor::new().extract(text)
}

fn to_match(caps: &regex::Captures<'_>) -> ExtractionMatch<ReceiptDate> {
    let shape = if caps.get(1).is_some() {
        DateShape::Numeric
    } else if caps.get(2).is_some() {
        DateShape::Textual
    } else {
        DateShape::Iso
    };

    let full_match = caps.get(0).expect("group 0 always participates");
    let date = ReceiptDate {
        text: full_match.as_str().to_string(),
        shape,
    };

    ExtractionMatch::new(date, full_match.as_str())
        .with_position(full_match.start(), full_match.end())
}

fn parse_year(s: &str) -> Option<i32> {
    let year: i32 = s.parse().ok()?;
    Some(if s.len() <= 2 { 2000 + year } else { year })
}
