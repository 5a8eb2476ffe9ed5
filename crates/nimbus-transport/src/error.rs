//! Transport error types

use thiserror::Error;

/// Result type for transport operations
pub type Result<T> = std::result::Result<T, TransportError>;

/// Errors that can occur while sending a request.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request failed at the HTTP layer (malformed request, protocol
    /// error, body read failure).
    #[error("HTTP error: {0}")]
    Http(String),

    /// The connection could not be established.
    #[error("connection error: {0}")]
    Connection(String),

    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A body could not be decoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Anything that does not fit the categories above.
    #[error("{0}")]
    Other(String),
}

impl TransportError {
    /// Whether retrying the same request can reasonably succeed.
    ///
    /// Timeouts and connection failures are transient; everything else will
    /// fail the same way again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout | Self::Connection(_))
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::Connection(err.to_string())
        } else {
            Self::Http(err.to_string())
        }
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
