use rust_decimal::Decimal;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum TaxfixError {
    #[error("PDF extraction failed: {0}")]
    Extraction(String),

    #[error("pdftotext not found. Install poppler: brew install poppler (macOS) or apt install poppler-utils (Linux)")]
    PdftotextNotFound,

    #[error("pdftotext failed with exit code {code}: {stderr}")]
    PdftotextFailed { code: i32, stderr: String },

    #[error("no dollar amounts found in text")]
    NoAmountsFound,

    #[error("expected at least {expected} dollar amounts for positional matching, found {found}")]
    UnexpectedTokenCount { expected: usize, found: usize },

    #[error("invalid tax rate {0}: rate must be greater than -1")]
    InvalidRate(Decimal),

    #[error("amount out of range while computing {0}")]
    AmountOverflow(String),

    #[error("unknown strategy '{0}' (expected auto, labels or positional)")]
    InvalidStrategy(String),

    #[error("malformed amount '{text}' at offset {offset}: {reason}")]
    MalformedAmount {
        text: String,
        offset: usize,
        reason: String,
    },

    #[error("failed to load profile from {path}: {reason}")]
    ProfileLoad { path: PathBuf, reason: String },

    #[error("invalid profile: {0}")]
    ProfileInvalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
