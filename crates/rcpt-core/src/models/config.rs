//! Configuration structures for the receipt pipeline.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{RcptError, Result};
use crate::receipt::MerchantRegistry;

/// Main configuration for the rcpt pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RcptConfig {
    /// OCR collaborator configuration.
    pub ocr: OcrConfig,

    /// Merchant signature configuration.
    pub merchants: MerchantConfig,
}

/// Settings passed to the external OCR engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Executable to run (looked up on `PATH` when not absolute).
    pub command: String,

    /// Recognition language.
    pub language: String,

    /// Page segmentation mode. 6 treats the image as one uniform block of text,
    /// which suits narrow receipt columns.
    pub page_seg_mode: u8,

    /// Keep runs of spaces between words instead of collapsing them.
    pub preserve_interword_spaces: bool,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            command: "tesseract".to_string(),
            language: "eng".to_string(),
            page_seg_mode: 6,
            preserve_interword_spaces: true,
        }
    }
}

/// Merchant registry configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MerchantConfig {
    /// Start from the built-in signatures.
    pub include_builtin: bool,

    /// Extra signatures, appended after the built-ins in declaration order.
    pub signatures: Vec<SignatureConfig>,
}

impl Default for MerchantConfig {
    fn default() -> Self {
        Self {
            include_builtin: true,
            signatures: Vec::new(),
        }
    }
}

/// One configured merchant signature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignatureConfig {
    /// Canonical merchant name reported in the record.
    pub name: String,

    /// Regular expression matched case-insensitively against the receipt text.
    pub pattern: String,
}

impl RcptConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| RcptError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| RcptError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Build the merchant registry described by this configuration.
    pub fn build_registry(&self) -> Result<MerchantRegistry> {
        let mut registry = if self.merchants.include_builtin {
            MerchantRegistry::builtin().clone()
        } else {
            MerchantRegistry::empty()
        };

        for signature in &self.merchants.signatures {
            registry.add(&signature.name, &signature.pattern)?;
        }

        Ok(registry)
    }
}
