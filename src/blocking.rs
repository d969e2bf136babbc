//! Synchronous adapter over [`ModIndexClient`].
//!
//! The blocking client owns a current-thread tokio runtime and drives the
//! async client on it, so both share one implementation. It must not be used
//! from inside an async context; build the async client there instead.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::runtime::{Builder, Runtime};

use crate::client::{ModIndexClient, ShortHashMatches};
use crate::config::{ClientConfig, ConfigError};
use crate::error::IndexError;
use crate::remote::RemoteStore;
use crate::schema::{FileVersion, IndexDocument, ManifestDocument, ManifestWithOverrides};

/// Blocking counterpart of [`ModIndexClient`] with identical semantics.
#[derive(Debug)]
pub struct BlockingClient {
    inner: ModIndexClient,
    runtime: Runtime,
}

impl BlockingClient {
    /// Creates a blocking client that fetches over HTTP.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configuration is invalid, the HTTP client
    /// cannot be built, or the runtime cannot start.
    pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            inner: ModIndexClient::new(config)?,
            runtime: build_runtime()?,
        })
    }

    /// Creates a blocking client over any [`RemoteStore`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ClientBuild`] if the runtime cannot start.
    pub fn with_store(
        store: Arc<dyn RemoteStore>,
        config: &ClientConfig,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            inner: ModIndexClient::with_store(store, config),
            runtime: build_runtime()?,
        })
    }

    /// The async client this adapter drives.
    #[must_use]
    pub fn as_async(&self) -> &ModIndexClient {
        &self.inner
    }

    /// See [`ModIndexClient::cached_index`].
    #[must_use]
    pub fn cached_index(&self) -> Option<Arc<IndexDocument>> {
        self.inner.cached_index()
    }

    /// See [`ModIndexClient::index`].
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::FetchFailed`] when the index cannot be fetched.
    pub fn index(&self) -> Result<Arc<IndexDocument>, IndexError> {
        self.runtime.block_on(self.inner.index())
    }

    /// See [`ModIndexClient::refresh_index`].
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::FetchFailed`] when the index cannot be fetched.
    pub fn refresh_index(&self) -> Result<Arc<IndexDocument>, IndexError> {
        self.runtime.block_on(self.inner.refresh_index())
    }

    /// See [`ModIndexClient::refresh_if_expired`].
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::FetchFailed`] when a required fetch fails.
    pub fn refresh_if_expired(&self, now: DateTime<Utc>) -> Result<Arc<IndexDocument>, IndexError> {
        self.runtime.block_on(self.inner.refresh_if_expired(now))
    }

    /// See [`ModIndexClient::clear_cache`].
    pub fn clear_cache(&self) {
        self.inner.clear_cache();
    }

    /// See [`ModIndexClient::resolve_generic`].
    ///
    /// # Errors
    ///
    /// See [`crate::ManifestResolver::resolve_generic`].
    pub fn resolve_generic(&self, input: &str) -> Result<Option<ManifestDocument>, IndexError> {
        self.runtime.block_on(self.inner.resolve_generic(input))
    }

    /// See [`ModIndexClient::resolve_generic_with_overrides`].
    ///
    /// # Errors
    ///
    /// See [`crate::ManifestResolver::resolve_generic`].
    pub fn resolve_generic_with_overrides(
        &self,
        input: &str,
    ) -> Result<Option<ManifestWithOverrides>, IndexError> {
        self.runtime
            .block_on(self.inner.resolve_generic_with_overrides(input))
    }

    /// See [`ModIndexClient::resolve_effective`].
    ///
    /// # Errors
    ///
    /// See [`crate::ManifestResolver::resolve_generic`].
    pub fn resolve_effective(&self, input: &str) -> Result<Option<ManifestDocument>, IndexError> {
        self.runtime.block_on(self.inner.resolve_effective(input))
    }

    /// See [`ModIndexClient::resolve_by_full_identifier`].
    ///
    /// # Errors
    ///
    /// See [`crate::HashIndex::resolve_by_full_identifier`].
    pub fn resolve_by_full_identifier(&self, input: &str) -> Result<Option<FileVersion>, IndexError> {
        self.runtime
            .block_on(self.inner.resolve_by_full_identifier(input))
    }

    /// See [`ModIndexClient::resolve_by_short_hash`].
    ///
    /// # Errors
    ///
    /// See [`crate::HashIndex::resolve_by_short_hash`].
    pub fn resolve_by_short_hash(&self, hash: &str) -> Result<ShortHashMatches, IndexError> {
        self.runtime.block_on(self.inner.resolve_by_short_hash(hash))
    }

    /// See [`ModIndexClient::resolve_by_content`].
    ///
    /// # Errors
    ///
    /// See [`crate::HashIndex::resolve_by_short_hash`].
    pub fn resolve_by_content(&self, content: &[u8]) -> Result<ShortHashMatches, IndexError> {
        self.runtime.block_on(self.inner.resolve_by_content(content))
    }
}

fn build_runtime() -> Result<Runtime, ConfigError> {
    Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| ConfigError::ClientBuild {
            reason: format!("failed to start runtime: {error}"),
        })
}
