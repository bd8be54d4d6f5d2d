//! Core library for retail receipt OCR interpretation.
//!
//! This crate provides:
//! - Text normalization of raw OCR output
//! - Merchant detection against a signature registry
//! - Date, line item and total extraction
//! - Receipt data models and configuration
//! - An OCR collaborator wrapping the external `tesseract` binary (feature `native`)

pub mod error;
pub mod models;
pub mod ocr;
pub mod receipt;

pub use error::{OcrError, RcptError, RegistryError, Result};
pub use models::receipt::{LineItem, ReceiptRecord};
pub use ocr::{OcrEngine, OcrResult};
#[cfg(feature = "native")]
pub use ocr::TesseractEngine;
pub use receipt::{ExtractionResult, MerchantRegistry, MerchantSignature, ReceiptParser};
