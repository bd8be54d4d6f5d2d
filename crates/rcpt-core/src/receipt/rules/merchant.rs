//! Merchant detection against a registry of known signatures.

use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};
use serde::Serialize;

use super::normalize::NormalizedText;
use crate::error::RegistryError;

/// Number of leading lines searched by the header pass.
pub const HEADER_LINES: usize = 5;

/// Built-in signatures, in match priority order.
const BUILTIN_SIGNATURES: &[(&str, &str)] = &[
    ("Basat1 Grocers", r"Basat1 Grocers"),
    ("Braun's Ice Cream", r"BRAUNS|Braun's"),
    ("Target", r"Target"),
    ("Bosneft Brocers", r"Bosneft: Brocers"),
];

lazy_static! {
    static ref BUILTIN_REGISTRY: MerchantRegistry = MerchantRegistry::from_pairs(BUILTIN_SIGNATURES)
        .expect("built-in merchant signatures compile");
}

/// A canonical merchant name and the pattern recognizing its OCR rendering.
#[derive(Debug, Clone)]
pub struct MerchantSignature {
    name: String,
    pattern: Regex,
}

impl MerchantSignature {
    /// Compile a signature. The pattern always matches case-insensitively.
    pub fn new(name: impl Into<String>, pattern: &str) -> Result<Self, RegistryError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(RegistryError::EmptyName);
        }

        let pattern = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|source| RegistryError::InvalidPattern {
                merchant: name.clone(),
                source,
            })?;

        Ok(Self { name, pattern })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn matches(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

/// Which pass of the detector found the merchant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionPass {
    /// Matched somewhere in the full normalized text.
    FullText,
    /// Matched only once the header lines were joined on one line.
    Header,
}

/// A detected merchant.
#[derive(Debug, Clone, Copy)]
pub struct MerchantMatch<'a> {
    pub signature: &'a MerchantSignature,
    pub pass: DetectionPass,
}

impl MerchantMatch<'_> {
    pub fn name(&self) -> &str {
        self.signature.name()
    }
}

/// Ordered, read-only collection of merchant signatures.
///
/// Earlier entries win when several signatures match the same text.
#[derive(Debug, Clone, Default)]
pub struct MerchantRegistry {
    signatures: Vec<MerchantSignature>,
}

impl MerchantRegistry {
    /// The process-wide built-in registry.
    pub fn builtin() -> &'static MerchantRegistry {
        &BUILTIN_REGISTRY
    }

    /// A registry with no signatures.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a registry from `(name, pattern)` pairs, keeping their order.
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Result<Self, RegistryError> {
        let signatures = pairs
            .iter()
            .map(|(name, pattern)| MerchantSignature::new(*name, pattern))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { signatures })
    }

    /// Append a signature after the existing ones.
    pub fn add(&mut self, name: &str, pattern: &str) -> Result<(), RegistryError> {
        self.signatures.push(MerchantSignature::new(name, pattern)?);
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &MerchantSignature> {
        self.signatures.iter()
    }

    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }

    /// First signature, in declaration order, matching anywhere in `text`.
    pub fn find(&self, text: &str) -> Option<&MerchantSignature> {
        self.signatures.iter().find(|s| s.matches(text))
    }

    /// Detect the merchant of a normalized receipt.
    ///
    /// The full text is searched first. Only when that finds nothing are the
    /// header lines joined by spaces and searched again, which recovers names
    /// that OCR split across lines.
    pub fn detect(&self, normalized: &NormalizedText) -> Option<MerchantMatch<'_>> {
        if let Some(signature) = self.find(normalized.text()) {
            return Some(MerchantMatch {
                signature,
                pass: DetectionPass::FullText,
            });
        }

        let header = normalized.header(HEADER_LINES);
        self.find(&header).map(|signature| MerchantMatch {
            signature,
            pass: DetectionPass::Header,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::receipt::rules::normalize::normalize;

    fn detect_name(text: &str) -> Option<String> {
        MerchantRegistry::builtin()
            .detect(&normalize(text))
            .map(|m| m.name().to_string())
    }

    #[test]
    fn test_builtin_markers() {
        let cases = [
            ("Basat1 Grocers", "Basat1 Grocers"),
            ("BRAUNS", "Braun's Ice Cream"),
            ("Braun's", "Braun's Ice Cream"),
            ("Target", "Target"),
            ("Bosneft: Brocers", "Bosneft Brocers"),
        ];
        for (marker, expected) in cases {
            let text = format!("Welcome\n{}\n2 Apple $1.50", marker);
            assert_eq!(detect_name(&text).as_deref(), Some(expected), "{marker}");
        }
    }

    #[test]
    fn test_case_insensitive_unanchored() {
        assert_eq!(detect_name("thanks for shopping at TARGET!").as_deref(), Some("Target"));
    }

    #[test]
    fn test_unknown_merchant() {
        assert_eq!(detect_name("Corner Shop\n2 Apple $1.50"), None);
        assert_eq!(detect_name(""), None);
    }

    #[test]
    fn test_declaration_order_wins() {
        // Both Target and Basat1 Grocers appear; Basat1 is declared first.
        assert_eq!(
            detect_name("Target\nBasat1 Grocers").as_deref(),
            Some("Basat1 Grocers")
        );
    }

    #[test]
    fn test_header_pass_joins_split_name() {
        let normalized = normalize("Basat1\nGrocers\n05/12/2023\n2 Apple $1.50");
        let detected = MerchantRegistry::builtin().detect(&normalized).unwrap();
        assert_eq!(detected.name(), "Basat1 Grocers");
        assert_eq!(detected.pass, DetectionPass::Header);
    }

    #[test]
    fn test_header_pass_only_covers_first_lines() {
        let normalized = normalize("a\nb\nc\nd\ne\nBasat1\nGrocers");
        assert!(MerchantRegistry::builtin().detect(&normalized).is_none());
    }

    #[test]
    fn test_full_text_pass_reported() {
        let normalized = normalize("TARGET\n2 Apple $1.50");
        let detected = MerchantRegistry::builtin().detect(&normalized).unwrap();
        assert_eq!(detected.pass, DetectionPass::FullText);
    }

    #[test]
    fn test_invalid_signature() {
        assert!(matches!(
            MerchantSignature::new("Broken", "(oops"),
            Err(RegistryError::InvalidPattern { .. })
        ));
        assert!(matches!(
            MerchantSignature::new("  ", "x"),
            Err(RegistryError::EmptyName)
        ));
    }

    #[test]
    fn test_custom_registry() {
        let mut registry = MerchantRegistry::empty();
        registry.add("Costco", "costco|wholesale").unwrap();
        let normalized = normalize("COSTCO WHOLESALE #123");
        assert_eq!(registry.detect(&normalized).unwrap().name(), "Costco");
        assert!(registry.detect(&normalize("Target")).is_none());
    }
}
