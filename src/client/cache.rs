//! In-memory cache for the index document.
//!
//! The cache holds at most one [`IndexDocument`], shared out as an `Arc` and
//! swapped whole on every successful fetch. It is never partially written.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::error::IndexError;
use crate::remote::{INDEX_PATH, RemoteStore};
use crate::schema::IndexDocument;

use super::fetch_with_timeout;

/// Owns the single cached copy of the index and fetches it on demand.
///
/// # Single-flight
///
/// Fetches are serialized through an async mutex. Callers that queue behind an
/// in-flight fetch take its outcome (the cached document, or a clone of the
/// same failure) instead of issuing their own request. The attempt counter
/// tells a queued caller whether an attempt completed while it waited.
///
/// A caller dropped while it owns the fetch releases the mutex without
/// touching the cache, and the next queued caller performs the fetch.
pub struct IndexCache {
    store: Arc<dyn RemoteStore>,
    request_timeout: Duration,
    cached: RwLock<Option<Arc<IndexDocument>>>,
    /// Guards check-then-fetch-then-store; holds the failure of the last attempt.
    fetch_lock: Mutex<Option<IndexError>>,
    /// Number of completed fetch attempts.
    attempts: AtomicU64,
}

impl IndexCache {
    /// Creates an empty cache over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn RemoteStore>, request_timeout: Duration) -> Self {
        Self {
            store,
            request_timeout,
            cached: RwLock::new(None),
            fetch_lock: Mutex::new(None),
            attempts: AtomicU64::new(0),
        }
    }

    /// Returns the cached index without any network activity.
    #[must_use]
    pub fn get_cached(&self) -> Option<Arc<IndexDocument>> {
        self.cached
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the cached index, fetching and caching it first if absent.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::FetchFailed`] when the fetch or decode fails; the
    /// cache is left unchanged.
    #[instrument(skip(self), fields(store = %self.store.location()))]
    pub async fn get_or_fetch(&self) -> Result<Arc<IndexDocument>, IndexError> {
        if let Some(index) = self.get_cached() {
            return Ok(index);
        }

        let observed_attempts = self.attempts.load(Ordering::Acquire);
        let mut last_failure = self.fetch_lock.lock().await;

        if let Some(index) = self.get_cached() {
            debug!("Index fetched by a concurrent caller");
            return Ok(index);
        }
        if self.attempts.load(Ordering::Acquire) != observed_attempts
            && let Some(error) = last_failure.as_ref()
        {
            debug!(error = %error, "Concurrent index fetch failed; sharing its failure");
            return Err(error.clone());
        }

        let outcome = self.fetch_and_store().await;
        *last_failure = outcome.as_ref().err().cloned();
        self.attempts.fetch_add(1, Ordering::AcqRel);
        outcome
    }

    /// Re-fetches the index and replaces the cached value on success.
    ///
    /// On failure the previously cached index stays in place; callers that need
    /// fresh data must check the result.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::FetchFailed`] when the fetch or decode fails.
    #[instrument(skip(self), fields(store = %self.store.location()))]
    pub async fn force_refresh(&self) -> Result<Arc<IndexDocument>, IndexError> {
        let mut last_failure = self.fetch_lock.lock().await;
        let outcome = self.fetch_and_store().await;
        if let Err(error) = &outcome
            && self.get_cached().is_some()
        {
            warn!(error = %error, "Index refresh failed; keeping previously cached index");
        }
        *last_failure = outcome.as_ref().err().cloned();
        self.attempts.fetch_add(1, Ordering::AcqRel);
        outcome
    }

    /// Refreshes the cached index if its expiry has passed, otherwise behaves
    /// like [`get_or_fetch`](Self::get_or_fetch).
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::FetchFailed`] when a required fetch fails.
    pub async fn refresh_if_expired(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Arc<IndexDocument>, IndexError> {
        match self.get_cached() {
            Some(index) if index.is_expired(now) => {
                debug!(expiry = ?index.expiry, "Cached index expired");
                self.force_refresh().await
            }
            Some(index) => Ok(index),
            None => self.get_or_fetch().await,
        }
    }

    /// Drops the cached index. The next lookup fetches it again.
    pub fn clear(&self) {
        *self.cached.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    async fn fetch_and_store(&self) -> Result<Arc<IndexDocument>, IndexError> {
        let bytes =
            fetch_with_timeout(self.request_timeout, INDEX_PATH, self.store.fetch_index()).await?;
        let index = IndexDocument::from_slice(&bytes).map_err(|error| {
            warn!(error = %error, "Failed to decode index document");
            IndexError::decode_failed(INDEX_PATH, &error.to_string())
        })?;

        let index = Arc::new(index);
        *self.cached.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&index));
        info!(
            identifiers = index.len(),
            schema_version = %index.schema_version,
            "Index cached"
        );
        Ok(index)
    }
}

impl std::fmt::Debug for IndexCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexCache")
            .field("store", &self.store.location())
            .field("cached", &self.get_cached().map(|index| index.len()))
            .finish_non_exhaustive()
    }
}
