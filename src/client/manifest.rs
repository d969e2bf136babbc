//! Generic identifier to manifest resolution.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, instrument, warn};

use crate::error::IndexError;
use crate::identifier::{GenericIdentifier, normalize};
use crate::remote::{RemoteStore, manifest_path};
use crate::schema::{ManifestDocument, ManifestWithOverrides};

use super::cache::IndexCache;
use super::fetch_with_timeout;

/// Resolves `loader:name` identifiers to manifest documents.
///
/// Membership in the index is checked before any manifest request, so a
/// manifest fetch that fails after a confirmed match is reported as
/// [`IndexError::FetchFailed`] and never confused with an absent mod.
#[derive(Clone)]
pub struct ManifestResolver {
    cache: Arc<IndexCache>,
    store: Arc<dyn RemoteStore>,
    request_timeout: Duration,
}

impl ManifestResolver {
    /// Creates a resolver sharing `cache` with other components.
    #[must_use]
    pub fn new(
        cache: Arc<IndexCache>,
        store: Arc<dyn RemoteStore>,
        request_timeout: Duration,
    ) -> Self {
        Self {
            cache,
            store,
            request_timeout,
        }
    }

    pub(crate) fn cache(&self) -> &IndexCache {
        &self.cache
    }

    /// Resolves a generic or full identifier to its manifest.
    ///
    /// Returns `Ok(None)` when the index lists no file for the mod.
    ///
    /// # Errors
    ///
    /// - [`IndexError::MalformedIdentifier`] if the input is not `loader:name[:hash]`
    /// - [`IndexError::FetchFailed`] if the index or manifest cannot be fetched or decoded
    #[instrument(skip(self))]
    pub async fn resolve_generic(
        &self,
        input: &str,
    ) -> Result<Option<ManifestDocument>, IndexError> {
        let Some((generic, target, bytes)) = self.fetch_listed_manifest(input).await? else {
            return Ok(None);
        };
        let manifest = ManifestDocument::from_slice(&bytes).map_err(|error| {
            warn!(target_document = %target, error = %error, "Failed to decode manifest");
            IndexError::decode_failed(&target, &error.to_string())
        })?;
        check_generic(&generic, &manifest);
        Ok(Some(manifest))
    }

    /// Like [`resolve_generic`](Self::resolve_generic), but keeps the
    /// manifest's embedded overrides document.
    ///
    /// # Errors
    ///
    /// Same as [`resolve_generic`](Self::resolve_generic).
    #[instrument(skip(self))]
    pub async fn resolve_generic_with_overrides(
        &self,
        input: &str,
    ) -> Result<Option<ManifestWithOverrides>, IndexError> {
        let Some((generic, target, bytes)) = self.fetch_listed_manifest(input).await? else {
            return Ok(None);
        };
        let document = ManifestWithOverrides::from_slice(&bytes).map_err(|error| {
            warn!(target_document = %target, error = %error, "Failed to decode manifest");
            IndexError::decode_failed(&target, &error.to_string())
        })?;
        check_generic(&generic, &document.manifest);
        Ok(Some(document))
    }

    /// Resolves a manifest and applies its embedded overrides.
    ///
    /// # Errors
    ///
    /// Same as [`resolve_generic`](Self::resolve_generic).
    pub async fn resolve_effective(
        &self,
        input: &str,
    ) -> Result<Option<ManifestDocument>, IndexError> {
        Ok(self
            .resolve_generic_with_overrides(input)
            .await?
            .map(ManifestWithOverrides::into_effective))
    }

    async fn fetch_listed_manifest(
        &self,
        input: &str,
    ) -> Result<Option<(GenericIdentifier, String, Vec<u8>)>, IndexError> {
        let generic = GenericIdentifier::from_any(input)?;
        let index = self.cache.get_or_fetch().await?;

        if !index.contains_generic(&generic) {
            debug!(generic = %generic, "Mod not listed in index");
            return Ok(None);
        }

        let target = manifest_path(generic.loader(), generic.name());
        let bytes = fetch_with_timeout(
            self.request_timeout,
            &target,
            self.store.fetch_manifest(generic.loader(), generic.name()),
        )
        .await?;
        debug!(generic = %generic, bytes = bytes.len(), "Fetched manifest");
        Ok(Some((generic, target, bytes)))
    }
}

fn check_generic(requested: &GenericIdentifier, manifest: &ManifestDocument) {
    if normalize(&manifest.generic_identifier) != requested.to_string() {
        warn!(
            requested = %requested,
            declared = %manifest.generic_identifier,
            "Manifest declares a different generic identifier"
        );
    }
}

impl std::fmt::Debug for ManifestResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManifestResolver")
            .field("store", &self.store.location())
            .field("request_timeout", &self.request_timeout)
            .finish_non_exhaustive()
    }
}
