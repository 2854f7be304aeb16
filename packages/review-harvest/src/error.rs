//! Typed errors for the harvesting library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) so callers can match
//! on what went wrong.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while harvesting, extracting, or exporting.
#[derive(Debug, Error)]
pub enum HarvestError {
    /// Checkpoint could not be written or read
    #[error("checkpoint error: {0}")]
    Checkpoint(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Input file does not exist
    #[error("file not found: {}", path.display())]
    MissingInput { path: PathBuf },

    /// Filesystem operation failed
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// CSV read or write error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A table cell did not hold the expected value
    #[error("invalid value in column {column}: {value:?}")]
    InvalidCell { column: String, value: String },
}

impl HarvestError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        HarvestError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors raised by a submission source for a single page request.
///
/// The fetcher treats every variant as transient and retries.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Remote API or transport failure
    #[error("API error: {0}")]
    Api(#[from] openreview_client::OpenReviewError),

    /// Injected by test doubles
    #[error("simulated failure: {0}")]
    Simulated(String),
}

/// Result type alias for harvesting operations.
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for source operations.
pub type SourceResult<T> = std::result::Result<T, SourceError>;
