//! Error types for the mutuo-core library.
//!
//! Extraction itself never fails; these cover configuration and record I/O.

use thiserror::Error;

/// Main error type for the mutuo library.
#[derive(Error, Debug)]
pub enum MutuoError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON in a config or record file.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type for the mutuo library.
pub type Result<T> = std::result::Result<T, MutuoError>;
