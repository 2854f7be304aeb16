use thiserror::Error;

/// Errors returned by the OpenReview client.
#[derive(Debug, Error)]
pub enum OpenReviewError {
    /// Transport failure, timeout, or a body that could not be decoded.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The client could not be constructed.
    #[error("client configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, OpenReviewError>;
