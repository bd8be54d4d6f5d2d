//! OCR collaborator boundary.
//!
//! The receipt parser only ever sees the final recognized text. Engines live
//! behind [`OcrEngine`] so callers can plug in whatever produces that text.

#[cfg(feature = "native")]
mod tesseract;

#[cfg(feature = "native")]
pub use tesseract::TesseractEngine;

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::OcrError;

/// Result of OCR processing on an image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OcrResult {
    /// Full recognized text.
    pub text: String,

    /// Processing time in milliseconds.
    pub processing_time_ms: u64,

    /// Name of the engine that produced the text.
    pub engine: String,
}

impl OcrResult {
    /// Wrap text that was recognized elsewhere.
    pub fn from_text(text: impl Into<String>, engine: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            processing_time_ms: 0,
            engine: engine.into(),
        }
    }

    /// Whether recognition produced any visible text.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// A text-producing OCR service.
pub trait OcrEngine {
    /// Short engine name, recorded in extraction metadata.
    fn name(&self) -> &str;

    /// Recognize the text of one image.
    fn recognize(&self, image: &Path) -> Result<OcrResult, OcrError>;
}
