//! Error types for remote store access.

use thiserror::Error;

/// Errors that can occur while fetching a document from a remote store.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Network-level failure (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error fetching {url}: {reason}")]
    Network {
        /// The URL that failed.
        url: String,
        /// Description of the underlying transport error.
        reason: String,
    },

    /// The request did not complete in time.
    #[error("timeout fetching {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// The server answered with a non-success status.
    #[error("HTTP {status} fetching {url}")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The document URL could not be built.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The invalid URL string.
        url: String,
    },
}

impl StoreError {
    /// Creates a network error, classifying reqwest timeouts as [`StoreError::Timeout`].
    pub fn network(url: impl Into<String>, source: &reqwest::Error) -> Self {
        let url = url.into();
        if source.is_timeout() {
            return Self::Timeout { url };
        }
        Self::Network {
            url,
            reason: source.to_string(),
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// HTTP status code, when the server answered.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}
