//! WASM bindings for retail receipt OCR interpretation.
//!
//! OCR itself happens on the JavaScript side; these bindings take the
//! recognized text and return structured receipt data.

use wasm_bindgen::prelude::*;

use rcpt_core::receipt::rules::{extract_date, normalize};
use rcpt_core::{MerchantRegistry, ReceiptParser};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Parse receipt text with the built-in merchant signatures.
///
/// Returns `{ store, date, items, total }`; amounts are decimal strings.
#[wasm_bindgen]
pub fn parse_receipt(text: &str) -> Result<JsValue, JsValue> {
    let record = ReceiptParser::new().parse_record(text);

    serde_wasm_bindgen::to_value(&record).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Parse receipt text and return the record as a JSON string.
#[wasm_bindgen]
pub fn parse_receipt_json(text: &str) -> Result<String, JsValue> {
    let record = ReceiptParser::new().parse_record(text);

    serde_json::to_string(&record).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Canonical name of the built-in merchant found in the text, if any.
#[wasm_bindgen]
pub fn detect_merchant(text: &str) -> Option<String> {
    MerchantRegistry::builtin()
        .detect(&normalize(text))
        .map(|found| found.name().to_string())
}

/// First date in the text as `YYYY-MM-DD`, when it names a real day.
#[wasm_bindgen]
pub fn parse_date(text: &str) -> Option<String> {
    extract_date(text)
        .and_then(|m| m.value.to_naive_date())
        .map(|date| date.to_string())
}

/// Receipt extractor class with its own merchant signatures.
#[wasm_bindgen]
pub struct ReceiptExtractor {
    registry: MerchantRegistry,
}

#[wasm_bindgen]
impl ReceiptExtractor {
    /// Create an extractor seeded with the built-in merchant signatures.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            registry: MerchantRegistry::builtin().clone(),
        }
    }

    /// Create an extractor that knows no merchants.
    #[wasm_bindgen]
    pub fn empty() -> Self {
        Self {
            registry: MerchantRegistry::empty(),
        }
    }

    /// Register a merchant signature, matched after the existing ones.
    #[wasm_bindgen]
    pub fn add_merchant(&mut self, name: &str, pattern: &str) -> Result<(), JsValue> {
        self.registry
            .add(name, pattern)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Merchant names in match order.
    #[wasm_bindgen]
    pub fn merchant_names(&self) -> Vec<String> {
        self.registry.iter().map(|s| s.name().to_string()).collect()
    }

    /// Extract a receipt record from text.
    #[wasm_bindgen]
    pub fn extract(&self, text: &str) -> Result<JsValue, JsValue> {
        let record = ReceiptParser::with_registry(&self.registry).parse_record(text);

        serde_wasm_bindgen::to_value(&record).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Get extraction result with warnings and metadata.
    #[wasm_bindgen]
    pub fn extract_with_metadata(&self, text: &str) -> Result<JsValue, JsValue> {
        let result = ReceiptParser::with_registry(&self.registry).parse(text);

        serde_wasm_bindgen::to_value(&result).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl Default for ReceiptExtractor {
    fn default() -> Self {
        Self::new()
    }
}
