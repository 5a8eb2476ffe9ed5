//! Error types for the Nimbus SDK core

use nimbus_transport::TransportError;
use thiserror::Error;

/// Result type alias for SDK operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while configuring a client or sending a request.
#[derive(Debug, Error)]
pub enum Error {
    /// A URL was empty, unparseable, or used an unsupported scheme.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A header name failed HTTP validation.
    #[error("Invalid header name: {0}")]
    InvalidHeaderName(String),

    /// A header value failed HTTP validation.
    #[error("Invalid header value: {0}")]
    InvalidHeaderValue(String),

    /// The transport failed to complete an exchange.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl Error {
    /// Whether retrying the operation can reasonably succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(err) => err.is_retryable(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_transient_transport_errors_retry() {
        assert!(Error::from(TransportError::Timeout).is_retryable());
        assert!(!Error::from(TransportError::Http("400".into())).is_retryable());
        assert!(!Error::InvalidUrl("  ".into()).is_retryable());
    }
}
