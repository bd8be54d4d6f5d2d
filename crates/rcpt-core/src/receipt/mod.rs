//! Receipt field extraction module.

mod parser;
pub mod rules;

pub use parser::{ExtractionMetadata, ExtractionResult, ReceiptParser};
pub use rules::{MerchantRegistry, MerchantSignature};

use crate::ocr::OcrResult;

/// Trait for turning recognized text into receipt data.
pub trait ReceiptExtractor {
    /// Extract receipt data from an OCR result.
    fn extract(&self, ocr_result: &OcrResult) -> ExtractionResult;

    /// Extract receipt data from plain text.
    fn extract_from_text(&self, text: &str) -> ExtractionResult;
}
