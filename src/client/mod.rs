//! Resolution client: index cache, manifest resolution, and hash lookups.
//!
//! [`ModIndexClient`] wires the three components over one [`RemoteStore`]:
//!
//! - [`IndexCache`] owns the cached `index.json` and deduplicates fetches
//! - [`ManifestResolver`] checks index membership before fetching a manifest
//! - [`HashIndex`] answers exact and short-hash lookups
//!
//! Every store call is bounded by [`ClientConfig::request_timeout`].

mod cache;
mod hash;
mod manifest;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::config::{ClientConfig, ConfigError};
use crate::error::IndexError;
use crate::identifier::short_hash_for_content;
use crate::remote::{HttpRemoteStore, RemoteStore, StoreError};
use crate::schema::{FileVersion, IndexDocument, ManifestDocument, ManifestWithOverrides};

pub use cache::IndexCache;
pub use hash::{HashIndex, HashLookupFailure, ShortHashMatches};
pub use manifest::ManifestResolver;

/// Runs one store call under the request timeout, mapping failures to
/// [`IndexError::FetchFailed`] for `target`.
pub(crate) async fn fetch_with_timeout<F>(
    request_timeout: Duration,
    target: &str,
    fetch: F,
) -> Result<Vec<u8>, IndexError>
where
    F: Future<Output = Result<Vec<u8>, StoreError>>,
{
    match tokio::time::timeout(request_timeout, fetch).await {
        Ok(Ok(bytes)) => Ok(bytes),
        Ok(Err(error)) => Err(IndexError::from_store(target, &error)),
        Err(_) => {
            warn!(
                target_document = target,
                timeout_ms = request_timeout.as_millis(),
                "Remote store call timed out"
            );
            Err(IndexError::from_store(target, &StoreError::timeout(target)))
        }
    }
}

/// High-level client over one index repository.
///
/// Cloning is cheap; clones share the same cache.
#[derive(Clone)]
pub struct ModIndexClient {
    cache: Arc<IndexCache>,
    resolver: ManifestResolver,
    hashes: HashIndex,
}

impl ModIndexClient {
    /// Creates a client that fetches over HTTP from `config.base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configuration is invalid or the HTTP
    /// client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
        let config = config.validated()?;
        let store = HttpRemoteStore::new(&config)?;
        Ok(Self::with_store(Arc::new(store), &config))
    }

    /// Creates a client over any [`RemoteStore`] implementation.
    #[must_use]
    pub fn with_store(store: Arc<dyn RemoteStore>, config: &ClientConfig) -> Self {
        let cache = Arc::new(IndexCache::new(
            Arc::clone(&store),
            config.request_timeout,
        ));
        let resolver = ManifestResolver::new(Arc::clone(&cache), store, config.request_timeout);
        let hashes = HashIndex::new(resolver.clone());
        Self {
            cache,
            resolver,
            hashes,
        }
    }

    /// The shared index cache.
    #[must_use]
    pub fn cache(&self) -> &IndexCache {
        &self.cache
    }

    /// The manifest resolver.
    #[must_use]
    pub fn resolver(&self) -> &ManifestResolver {
        &self.resolver
    }

    /// The hash lookup component.
    #[must_use]
    pub fn hash_index(&self) -> &HashIndex {
        &self.hashes
    }

    /// See [`IndexCache::get_cached`].
    #[must_use]
    pub fn cached_index(&self) -> Option<Arc<IndexDocument>> {
        self.cache.get_cached()
    }

    /// See [`IndexCache::get_or_fetch`].
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::FetchFailed`] when the index cannot be fetched.
    pub async fn index(&self) -> Result<Arc<IndexDocument>, IndexError> {
        self.cache.get_or_fetch().await
    }

    /// See [`IndexCache::force_refresh`].
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::FetchFailed`] when the index cannot be fetched.
    pub async fn refresh_index(&self) -> Result<Arc<IndexDocument>, IndexError> {
        self.cache.force_refresh().await
    }

    /// See [`IndexCache::refresh_if_expired`].
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::FetchFailed`] when a required fetch fails.
    pub async fn refresh_if_expired(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Arc<IndexDocument>, IndexError> {
        self.cache.refresh_if_expired(now).await
    }

    /// See [`IndexCache::clear`].
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// See [`ManifestResolver::resolve_generic`].
    ///
    /// # Errors
    ///
    /// See [`ManifestResolver::resolve_generic`].
    pub async fn resolve_generic(&self, input: &str) -> Result<Option<ManifestDocument>, IndexError> {
        self.resolver.resolve_generic(input).await
    }

    /// See [`ManifestResolver::resolve_generic_with_overrides`].
    ///
    /// # Errors
    ///
    /// See [`ManifestResolver::resolve_generic`].
    pub async fn resolve_generic_with_overrides(
        &self,
        input: &str,
    ) -> Result<Option<ManifestWithOverrides>, IndexError> {
        self.resolver.resolve_generic_with_overrides(input).await
    }

    /// See [`ManifestResolver::resolve_effective`].
    ///
    /// # Errors
    ///
    /// See [`ManifestResolver::resolve_generic`].
    pub async fn resolve_effective(
        &self,
        input: &str,
    ) -> Result<Option<ManifestDocument>, IndexError> {
        self.resolver.resolve_effective(input).await
    }

    /// See [`HashIndex::resolve_by_full_identifier`].
    ///
    /// # Errors
    ///
    /// See [`HashIndex::resolve_by_full_identifier`].
    pub async fn resolve_by_full_identifier(
        &self,
        input: &str,
    ) -> Result<Option<FileVersion>, IndexError> {
        self.hashes.resolve_by_full_identifier(input).await
    }

    /// See [`HashIndex::resolve_by_short_hash`].
    ///
    /// # Errors
    ///
    /// See [`HashIndex::resolve_by_short_hash`].
    pub async fn resolve_by_short_hash(&self, hash: &str) -> Result<ShortHashMatches, IndexError> {
        self.hashes.resolve_by_short_hash(hash).await
    }

    /// Hashes `content` (a downloaded mod file) and looks up its short hash.
    ///
    /// # Errors
    ///
    /// See [`HashIndex::resolve_by_short_hash`].
    pub async fn resolve_by_content(&self, content: &[u8]) -> Result<ShortHashMatches, IndexError> {
        let hash = short_hash_for_content(content);
        self.hashes.resolve_by_short_hash(&hash).await
    }
}

impl std::fmt::Debug for ModIndexClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModIndexClient")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}
