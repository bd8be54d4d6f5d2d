//! Receipt parser composing the rule-based extractors.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, info};

use crate::models::receipt::ReceiptRecord;
use crate::ocr::OcrResult;

use super::rules::{
    dates::{extract_date, DateShape},
    items::{extract_items, LineShape},
    merchant::{DetectionPass, MerchantRegistry},
    normalize::normalize,
    totals::{resolve_total, TotalSource},
};
use super::ReceiptExtractor;

/// Result of receipt extraction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionResult {
    /// Extracted receipt data.
    pub record: ReceiptRecord,
    /// Raw text as received.
    pub raw_text: String,
    /// Lines the extractors worked on.
    pub lines: Vec<String>,
    /// Extraction warnings.
    pub warnings: Vec<String>,
    /// How each field was found.
    pub metadata: ExtractionMetadata,
}

/// How each field of a record was obtained.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExtractionMetadata {
    /// Pass of the merchant detector that matched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merchant_pass: Option<DetectionPass>,
    /// Shape of the extracted date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_shape: Option<DateShape>,
    /// Origin of the total.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_source: Option<TotalSource>,
    /// Lines claimed by each item rule.
    pub rule_hits: BTreeMap<LineShape, usize>,
    /// Whether the loose item pass ran.
    pub fallback_used: bool,
    /// OCR engine that produced the text, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ocr_engine: Option<String>,
    /// Time the OCR engine spent recognizing the text, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ocr_time_ms: Option<u64>,
}

/// Receipt parser.
///
/// Holds only a borrowed, read-only merchant registry, so one parser can serve
/// any number of parses and every parse owns all of its working state.
#[derive(Debug, Clone, Copy)]
pub struct ReceiptParser<'r> {
    registry: &'r MerchantRegistry,
}

impl ReceiptParser<'static> {
    /// Create a parser using the built-in merchant registry.
    pub fn new() -> Self {
        Self {
            registry: MerchantRegistry::builtin(),
        }
    }
}

impl Default for ReceiptParser<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'r> ReceiptParser<'r> {
    /// Create a parser using the given merchant registry.
    pub fn with_registry(registry: &'r MerchantRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r MerchantRegistry {
        self.registry
    }

    /// Parse receipt text into a record.
    pub fn parse_record(&self, text: &str) -> ReceiptRecord {
        self.parse(text).record
    }

    /// Parse receipt text, keeping diagnostics alongside the record.
    ///
    /// Never fails: fields that cannot be recovered degrade to `None`, an
    /// empty item list, or a computed total.
    pub fn parse(&self, text: &str) -> ExtractionResult {
        info!("Parsing receipt from {} characters of text", text.len());

        let mut warnings = Vec::new();
        let normalized = normalize(text);

        let merchant = self.registry.detect(&normalized);
        let store = merchant.map(|m| m.name().to_string());
        if store.is_none() {
            warnings.push("Could not detect store".to_string());
        }

        let date = extract_date(normalized.text()).map(|m| m.value);
        if date.is_none() {
            warnings.push("Could not extract date".to_string());
        }

        let extraction = extract_items(normalized.lines());
        if extraction.items.is_empty() {
            warnings.push("Could not extract line items".to_string());
        } else if extraction.fallback_used {
            warnings.push("Line items recovered by loose matching".to_string());
        }

        let total = resolve_total(normalized.text(), &extraction.items);

        debug!(
            store = ?store,
            date = ?date.as_ref().map(|d| d.text.as_str()),
            items = extraction.items.len(),
            total = %total.amount,
            source = ?total.source,
            "Extracted receipt"
        );

        let metadata = ExtractionMetadata {
            merchant_pass: merchant.map(|m| m.pass),
            date_shape: date.as_ref().map(|d| d.shape),
            total_source: Some(total.source),
            rule_hits: extraction.rule_hits,
            fallback_used: extraction.fallback_used,
            ocr_engine: None,
            ocr_time_ms: None,
        };

        let record = ReceiptRecord {
            store,
            date: date.map(|d| d.text),
            items: extraction.items,
            total: total.amount,
        };

        ExtractionResult {
            record,
            raw_text: text.to_string(),
            lines: normalized.lines().to_vec(),
            warnings,
            metadata,
        }
    }
}

impl ReceiptExtractor for ReceiptParser<'_> {
    fn extract(&self, ocr_result: &OcrResult) -> ExtractionResult {
        let mut result = self.parse(&ocr_result.text);
        result.metadata.ocr_engine = Some(ocr_result.engine.clone());
        result.metadata.ocr_time_ms = Some(ocr_result.processing_time_ms);
        result
    }

    fn extract_from_text(&self, text: &str) -> ExtractionResult {
        self.parse(text)
    }
}
