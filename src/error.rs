use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building, parsing or exporting an EMV payload.
#[derive(Error, Debug)]
pub enum EmvError {
    #[error("Value for tag {tag} is {length} characters long (max 99)")]
    ValueTooLong { tag: String, length: usize },
    #[error("Invalid tag {0:?}: expected two decimal digits")]
    InvalidTag(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Malformed payload: {0}")]
    Malformed(String),
    #[error("Checksum mismatch: expected {expected}, found {found}")]
    ChecksumMismatch { expected: String, found: String },
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to export {path}: {source}")]
    Export {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised by a QR renderer for an otherwise valid payload.
///
/// Kept apart from [`EmvError`] so a rendering problem is never mistaken for
/// a broken payload.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("Payload does not fit in a QR symbol at the requested error correction level")]
    DataTooLong,
    #[error("Invalid color {0:?}: expected #RRGGBB")]
    InvalidColor(String),
    #[error("Renderer failure: {0}")]
    Backend(String),
}

pub type Result<T> = std::result::Result<T, EmvError>;
