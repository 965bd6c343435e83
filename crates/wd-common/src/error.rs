//! Error types for Workforce Deviance.
//!
//! The engine itself has no fatal error path: missing pairings, empty
//! denominators, and absent baselines suppress findings instead of
//! failing. Errors here belong to the boundaries around the engine:
//! configuration loading, log ingest, and report writing.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for Workforce Deviance operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Run configuration errors (thresholds, working hours).
    Config,
    /// Event-log ingest errors.
    Ingest,
    /// File I/O and serialization errors.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Ingest => write!(f, "ingest"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Unified error type for Workforce Deviance.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    // Ingest errors (20-29)
    #[error("malformed record at line {line}: {message}")]
    MalformedRecord { line: usize, message: String },

    #[error("event log is empty: {0}")]
    EmptyLog(String),

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the stable error code for this error type.
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::InvalidValue { .. } => 11,
            Error::MalformedRecord { .. } => 20,
            Error::EmptyLog(_) => 21,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Config(_) | Error::InvalidValue { .. } => ErrorCategory::Config,
            Error::MalformedRecord { .. } | Error::EmptyLog(_) => ErrorCategory::Ingest,
            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }
}
