//! Error types for index resolution.
//!
//! Errors follow the What/Why/Fix pattern used across the project. A missing
//! mod is not an error: lookups return `Ok(None)` for confirmed absence.

use thiserror::Error;

use crate::remote::StoreError;

/// Errors that can occur while resolving identifiers against the index.
#[derive(Debug, Clone, Error)]
pub enum IndexError {
    /// The input does not parse as an identifier. Never touches the network.
    #[error("malformed identifier '{input}': {reason}\n  Suggestion: {suggestion}")]
    MalformedIdentifier {
        /// The rejected input
        input: String,
        /// Why parsing failed
        reason: String,
        /// How to fix the input
        suggestion: String,
    },

    /// Transport, HTTP status, timeout, or decode failure. Callers may retry.
    #[error("failed to fetch {target}: {reason}\n  Suggestion: {suggestion}")]
    FetchFailed {
        /// The document that was being fetched (e.g. `index.json`)
        target: String,
        /// Why the fetch failed
        reason: String,
        /// HTTP status when the server answered with a non-success code
        status: Option<u16>,
        /// How to fix the issue
        suggestion: String,
    },

    /// The index lists an identifier the backing manifest does not contain.
    #[error(
        "index and manifest disagree for '{identifier}': {reason}\n  Suggestion: Report the inconsistency to the index maintainers"
    )]
    Consistency {
        /// The identifier the index claims exists
        identifier: String,
        /// What the manifest lacked
        reason: String,
    },
}

impl IndexError {
    /// Creates a `MalformedIdentifier` error.
    #[must_use]
    pub fn malformed(input: &str, reason: &str) -> Self {
        Self::MalformedIdentifier {
            input: input.to_string(),
            reason: reason.to_string(),
            suggestion: "Use the form 'loader:name' or 'loader:name:hash'".to_string(),
        }
    }

    /// Creates a `FetchFailed` error for a document that did not decode.
    #[must_use]
    pub fn decode_failed(target: &str, reason: &str) -> Self {
        Self::FetchFailed {
            target: target.to_string(),
            reason: format!("unexpected document format: {reason}"),
            status: None,
            suggestion: "Check that the base URL points at a compatible index schema".to_string(),
        }
    }

    /// Creates a `FetchFailed` error from a remote store failure.
    #[must_use]
    pub fn from_store(target: &str, error: &StoreError) -> Self {
        let suggestion = match error {
            StoreError::HttpStatus { status: 404, .. } => {
                "The document is missing on the remote; check the base URL".to_string()
            }
            StoreError::HttpStatus { status: 429, .. } => {
                "Rate limited by the remote host. Try again in a few seconds".to_string()
            }
            StoreError::Timeout { .. } => {
                "The remote host is slow to respond; retry or raise the request timeout".to_string()
            }
            _ => "Check your network connection and the configured base URL, then retry"
                .to_string(),
        };
        Self::FetchFailed {
            target: target.to_string(),
            reason: error.to_string(),
            status: error.status(),
            suggestion,
        }
    }

    /// Creates a `Consistency` error.
    #[must_use]
    pub fn consistency(identifier: &str, reason: &str) -> Self {
        Self::Consistency {
            identifier: identifier.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Returns true when retrying the same call may succeed.
    ///
    /// Only fetch failures are transient; malformed input and index/manifest
    /// disagreement will fail the same way again.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::FetchFailed { .. })
    }
}
