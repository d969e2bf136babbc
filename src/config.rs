//! Client configuration and base URL normalization.

use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default index repository, following the published mod index layout.
pub const DEFAULT_BASE_URL: &str =
    "https://raw.githubusercontent.com/ReviversMC/the-mod-index/v5/mods/";

const CONNECT_TIMEOUT_SECS: u64 = 10;
const READ_TIMEOUT_SECS: u64 = 30;
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Errors raised while building a client from configuration.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// The base URL does not parse or uses an unsupported scheme
    #[error(
        "invalid base URL '{url}': {reason}\n  Suggestion: Use an http(s) URL pointing at the index root directory"
    )]
    InvalidBaseUrl {
        /// The rejected URL
        url: String,
        /// Why it was rejected
        reason: String,
    },

    /// A timeout is zero
    #[error("invalid timeout for `{field}`: must be greater than zero")]
    InvalidTimeout {
        /// The offending configuration field
        field: &'static str,
    },

    /// The HTTP client could not be constructed
    #[error("HTTP client construction failed: {reason}")]
    ClientBuild {
        /// Why construction failed
        reason: String,
    },
}

/// Settings shared by the index cache, the manifest resolver, and the HTTP store.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Root of the index repository; normalized to end in exactly one `/`.
    pub base_url: String,
    /// TCP connect timeout for the HTTP client.
    pub connect_timeout: Duration,
    /// Whole-response timeout for the HTTP client.
    pub read_timeout: Duration,
    /// Upper bound on every remote store call, whatever the store implementation.
    pub request_timeout: Duration,
    /// Overrides the default `modindex/<version>` User-Agent.
    pub user_agent: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(CONNECT_TIMEOUT_SECS),
            read_timeout: Duration::from_secs(READ_TIMEOUT_SECS),
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            user_agent: None,
        }
    }
}

impl ClientConfig {
    /// Creates a default configuration targeting `base_url`.
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Sets the per-call request timeout.
    #[must_use]
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Validates the configuration and returns a copy with a normalized base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the base URL is invalid or a timeout is zero.
    pub fn validated(&self) -> Result<Self, ConfigError> {
        for (field, value) in [
            ("connect_timeout", self.connect_timeout),
            ("read_timeout", self.read_timeout),
            ("request_timeout", self.request_timeout),
        ] {
            if value.is_zero() {
                return Err(ConfigError::InvalidTimeout { field });
            }
        }
        Ok(Self {
            base_url: normalize_base_url(&self.base_url)?,
            ..self.clone()
        })
    }
}

/// Normalizes a base URL so it always ends in exactly one trailing `/`.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidBaseUrl`] if the URL does not parse or is not
/// `http`/`https`.
pub fn normalize_base_url(base_url: &str) -> Result<String, ConfigError> {
    let trimmed = base_url.trim().trim_end_matches('/');
    let parsed = Url::parse(trimmed).map_err(|e| ConfigError::InvalidBaseUrl {
        url: base_url.to_string(),
        reason: e.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }
    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(ConfigError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: "query strings and fragments are not supported".to_string(),
        });
    }
    Ok(format!("{trimmed}/"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_url_adds_single_trailing_slash() {
        assert_eq!(
            normalize_base_url("http://localhost:8080/mods").unwrap(),
            "http://localhost:8080/mods/"
        );
        assert_eq!(
            normalize_base_url("http://localhost:8080/mods///").unwrap(),
            "http://localhost:8080/mods/"
        );
    }

    #[test]
    fn test_normalize_base_url_default_is_stable() {
        assert_eq!(normalize_base_url(DEFAULT_BASE_URL).unwrap(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_normalize_base_url_rejects_non_http() {
        let err = normalize_base_url("ftp://example.com/mods").unwrap_err();
        assert!(err.to_string().contains("unsupported scheme"));
    }

    #[test]
    fn test_normalize_base_url_rejects_garbage() {
        assert!(normalize_base_url("not a url").is_err());
        assert!(normalize_base_url("https://example.com/mods?x=1").is_err());
    }

    #[test]
    fn test_validated_rejects_zero_timeout() {
        let config = ClientConfig::default().request_timeout(Duration::ZERO);
        let err = config.validated().unwrap_err();
        assert!(err.to_string().contains("request_timeout"));
    }

    #[test]
    fn test_validated_normalizes_base_url() {
        let config = ClientConfig::with_base_url("https://example.com/index")
            .validated()
            .unwrap();
        assert_eq!(config.base_url, "https://example.com/index/");
        assert_eq!(config.read_timeout, Duration::from_secs(30));
    }
}
