//! Normalization of raw OCR text into clean receipt lines.

use super::patterns::BLANK_LINE_RUN;

/// OCR text reduced to its ordered, non-empty, trimmed lines.
///
/// Line order is the only positional signal a receipt keeps once it has been
/// through OCR, so it is preserved exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedText {
    text: String,
    lines: Vec<String>,
}

impl NormalizedText {
    /// The normalized lines joined by `\n`.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The normalized lines.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The first `count` lines joined by single spaces.
    pub fn header(&self, count: usize) -> String {
        self.lines
            .iter()
            .take(count)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Normalize raw OCR output.
///
/// Carriage returns become line breaks, blank line runs collapse, and every
/// line is trimmed; lines left empty are dropped. Never fails.
pub fn normalize(raw: &str) -> NormalizedText {
    let unified = raw.replace('\r', "\n");
    let collapsed = BLANK_LINE_RUN.replace_all(&unified, "\n");

    let lines: Vec<String> = collapsed
        .trim()
        .split('\n')
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect();

    NormalizedText {
        text: lines.join("\n"),
        lines,
    }
}
