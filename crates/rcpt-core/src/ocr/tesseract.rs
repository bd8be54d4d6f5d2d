//! OCR through the external `tesseract` command.

use std::ffi::OsString;
use std::path::Path;
use std::process::Command;
use std::time::Instant;

use tracing::debug;

use super::{OcrEngine, OcrResult};
use crate::error::OcrError;
use crate::models::config::OcrConfig;

/// Runs the `tesseract` binary and reads the recognized text from stdout.
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    config: OcrConfig,
}

impl TesseractEngine {
    pub fn new(config: OcrConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &OcrConfig {
        &self.config
    }

    /// Command line arguments for one image.
    pub fn args(&self, image: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            image.as_os_str().to_owned(),
            "stdout".into(),
            "-l".into(),
            self.config.language.clone().into(),
            "--psm".into(),
            self.config.page_seg_mode.to_string().into(),
        ];

        if self.config.preserve_interword_spaces {
            args.push("-c".into());
            args.push("preserve_interword_spaces=1".into());
        }

        args
    }
}

impl Default for TesseractEngine {
    fn default() -> Self {
        Self::new(OcrConfig::default())
    }
}

impl OcrEngine for TesseractEngine {
    fn name(&self) -> &str {
        "tesseract"
    }

    fn recognize(&self, image: &Path) -> Result<OcrResult, OcrError> {
        if !image.is_file() {
            return Err(OcrError::InvalidImage(format!(
                "{} is not a readable file",
                image.display()
            )));
        }

        let start = Instant::now();
        debug!("Running {} on {}", self.config.command, image.display());

        let output = Command::new(&self.config.command)
            .args(self.args(image))
            .output()
            .map_err(|source| OcrError::Spawn {
                command: self.config.command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(OcrError::Failed {
                command: self.config.command.clone(),
                status: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let text = String::from_utf8(output.stdout)?;
        let processing_time_ms = start.elapsed().as_millis() as u64;
        debug!(
            "OCR produced {} characters in {}ms",
            text.len(),
            processing_time_ms
        );

        Ok(OcrResult {
            text,
            processing_time_ms,
            engine: self.name().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_default_args() {
        let engine = TesseractEngine::default();
        let args = engine.args(Path::new("receipt.png"));
        let args: Vec<&str> = args.iter().map(|a| a.to_str().unwrap()).collect();
        assert_eq!(
            args,
            vec![
                "receipt.png",
                "stdout",
                "-l",
                "eng",
                "--psm",
                "6",
                "-c",
                "preserve_interword_spaces=1"
            ]
        );
    }

    #[test]
    fn test_args_without_space_preservation() {
        let engine = TesseractEngine::new(OcrConfig {
            language: "fra".to_string(),
            page_seg_mode: 4,
            preserve_interword_spaces: false,
            ..OcrConfig::default()
        });
        let args = engine.args(Path::new("r.png"));
        assert_eq!(args.len(), 6);
        assert_eq!(args[3], "fra");
        assert_eq!(args[5], "4");
    }

    #[test]
    fn test_missing_image() {
        let engine = TesseractEngine::default();
        let result = engine.recognize(&PathBuf::from("/nonexistent/receipt.png"));
        assert!(matches!(result, Err(OcrError::InvalidImage(_))));
    }

    #[test]
    fn test_missing_command() {
        let engine = TesseractEngine::new(OcrConfig {
            command: "rcpt-test-no-such-ocr-binary".to_string(),
            ..OcrConfig::default()
        });
        // Any existing file will do; the command fails before reading it.
        let image = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("Cargo.toml");
        let result = engine.recognize(&image);
        assert!(matches!(result, Err(OcrError::Spawn { .. })));
    }
}
