//! HTTP implementation of [`RemoteStore`] over `reqwest`.

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use crate::config::{ClientConfig, ConfigError, normalize_base_url};

use super::http_client::build_http_client;
use super::{INDEX_PATH, RemoteStore, StoreError};

/// Fetches index documents from a statically hosted repository.
///
/// The client is created once and reused, taking advantage of connection
/// pooling across index and manifest requests.
#[derive(Clone)]
pub struct HttpRemoteStore {
    client: Client,
    base_url: String,
}

impl HttpRemoteStore {
    /// Creates a store for the configured base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the base URL is invalid or the HTTP client
    /// cannot be built.
    #[tracing::instrument(skip_all, fields(base_url = %config.base_url))]
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        let client = build_http_client(config)?;
        Self::with_client(client, &config.base_url)
    }

    /// Creates a store that reuses an existing `reqwest` client.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if the base URL is invalid.
    pub fn with_client(client: Client, base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            client,
            base_url: normalize_base_url(base_url)?,
        })
    }

    /// The normalized base URL, always ending in `/`.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn document_url(&self, relative: &str) -> String {
        format!("{}{relative}", self.base_url)
    }

    async fn fetch(&self, url: String) -> Result<Vec<u8>, StoreError> {
        debug!(url = %url, "Fetching index document");

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(error) => {
                warn!(url = %url, error = %error, "Index document request failed");
                return Err(StoreError::network(url, &error));
            }
        };

        let status = response.status();
        if !status.is_success() {
            debug!(url = %url, status = status.as_u16(), "Index document request rejected");
            return Err(StoreError::http_status(url, status.as_u16()));
        }

        match response.bytes().await {
            Ok(body) => {
                debug!(url = %url, bytes = body.len(), "Fetched index document");
                Ok(body.to_vec())
            }
            Err(error) => {
                warn!(url = %url, error = %error, "Failed reading index document body");
                Err(StoreError::network(url, &error))
            }
        }
    }
}

impl std::fmt::Debug for HttpRemoteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpRemoteStore")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl RemoteStore for HttpRemoteStore {
    fn location(&self) -> &str {
        &self.base_url
    }

    #[tracing::instrument(skip(self), fields(store = "http"))]
    async fn fetch_index(&self) -> Result<Vec<u8>, StoreError> {
        self.fetch(self.document_url(INDEX_PATH)).await
    }

    #[tracing::instrument(skip(self), fields(store = "http"))]
    async fn fetch_manifest(&self, loader: &str, name: &str) -> Result<Vec<u8>, StoreError> {
        if loader.is_empty() || name.is_empty() {
            return Err(StoreError::invalid_url(
                self.document_url(&format!("{loader}/{name}.json")),
            ));
        }
        let relative = format!(
            "{}/{}.json",
            urlencoding::encode(loader),
            urlencoding::encode(name)
        );
        self.fetch(self.document_url(&relative)).await
    }
}
