//! Receipt total resolution.

use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;

use super::patterns::TOTAL_LABELLED;
use super::{ExtractionMatch, FieldExtractor};
use crate::models::receipt::{sum_totals, LineItem};

/// Where the receipt total came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TotalSource {
    /// Printed next to a "total" label.
    Labelled,
    /// Computed from the extracted items.
    ItemSum,
}

/// The resolved receipt total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedTotal {
    pub amount: Decimal,
    pub source: TotalSource,
}

/// Extractor for amounts printed after a "total" label on the same line.
pub struct TotalExtractor;

impl TotalExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TotalExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for TotalExtractor {
    type Output = ExtractionMatch<Decimal>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results = Vec::new();

        for caps in TOTAL_LABELLED.captures_iter(text) {
            if let Ok(amount) = Decimal::from_str(&caps[1]) {
                let full_match = caps.get(0).expect("group 0 always participates");
                results.push(
                    ExtractionMatch::new(amount, full_match.as_str())
                        .with_position(full_match.start(), full_match.end()),
                );
            }
        }

        results
    }
}

/// Resolve the receipt total.
///
/// The first labelled total in the text wins, since the printed figure is
/// authoritative; otherwise the item totals are summed.
pub fn resolve_total(text: &str, items: &[LineItem]) -> ResolvedTotal {
    match TotalExtractor::new().extract(text) {
        Some(found) => ResolvedTotal {
            amount: found.value,
            source: TotalSource::Labelled,
        },
        None => ResolvedTotal {
            amount: sum_totals(items),
            source: TotalSource::ItemSum,
        },
    }
}
