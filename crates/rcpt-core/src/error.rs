//! Error types for the rcpt-core library.
//!
//! Parsing itself never fails; these cover the edges around it (building a
//! merchant registry from configuration, and running the OCR collaborator).

use thiserror::Error;

/// Main error type for the rcpt library.
#[derive(Error, Debug)]
pub enum RcptError {
    /// Merchant registry construction error.
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    /// OCR collaborator error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while building a merchant signature registry.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// A signature was declared without a canonical merchant name.
    #[error("merchant signature has an empty name")]
    EmptyName,

    /// A signature pattern failed to compile.
    #[error("invalid pattern for merchant {merchant:?}: {source}")]
    InvalidPattern {
        merchant: String,
        #[source]
        source: regex::Error,
    },
}

/// Errors related to the external OCR service.
#[derive(Error, Debug)]
pub enum OcrError {
    /// The OCR process could not be started.
    #[error("failed to start {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The OCR process exited unsuccessfully.
    #[error("{command} exited with status {status}: {stderr}")]
    Failed {
        command: String,
        status: i32,
        stderr: String,
    },

    /// The OCR process produced output that is not UTF-8.
    #[error("OCR output is not valid UTF-8")]
    InvalidOutput(#[from] std::string::FromUtf8Error),

    /// Input image is missing or unreadable.
    #[error("invalid image: {0}")]
    InvalidImage(String),
}

/// Result type for the rcpt library.
pub type Result<T> = std::result::Result<T, RcptError>;
