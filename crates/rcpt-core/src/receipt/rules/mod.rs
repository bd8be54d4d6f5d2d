//! Rule-based field extractors for retail receipts.

pub mod dates;
pub mod items;
pub mod merchant;
pub mod normalize;
pub mod patterns;
pub mod totals;

pub use dates::{extract_date, DateExtractor, DateShape, ReceiptDate};
pub use items::{extract_items, ItemExtraction, LineShape};
pub use merchant::{DetectionPass, MerchantMatch, MerchantRegistry, MerchantSignature};
pub use normalize::{normalize, NormalizedText};
pub use totals::{resolve_total, ResolvedTotal, TotalExtractor, TotalSource};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the first occurrence of the field.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field, in text order.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// An extracted value together with where it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Byte range in the source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, source: impl Into<String>) -> Self {
        Self {
            value,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}
