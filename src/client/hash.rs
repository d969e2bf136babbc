//! Exact and short-hash file lookups.

use std::collections::BTreeMap;

use futures_util::future::join_all;
use tracing::{debug, instrument, warn};

use crate::error::IndexError;
use crate::identifier::{FullIdentifier, GenericIdentifier, parse_full, short_hash};
use crate::schema::FileVersion;

use super::manifest::ManifestResolver;

/// A manifest lookup that failed during a short-hash scan.
#[derive(Debug, Clone)]
pub struct HashLookupFailure {
    /// Full identifier whose manifest could not be checked.
    pub identifier: String,
    /// Why the lookup failed.
    pub error: IndexError,
}

/// Outcome of [`HashIndex::resolve_by_short_hash`].
///
/// Two different files can share a 15-character prefix, so every match is
/// returned. Manifests that could not be checked are listed in `failures`
/// rather than silently skipped.
#[derive(Debug, Clone, Default)]
pub struct ShortHashMatches {
    /// The normalized short hash that was looked up.
    pub short_hash: String,
    /// Every matching file, grouped by manifest in generic identifier order.
    pub files: Vec<FileVersion>,
    /// Per-identifier failures encountered during the scan.
    pub failures: Vec<HashLookupFailure>,
}

impl ShortHashMatches {
    /// Returns true when nothing matched and nothing failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.failures.is_empty()
    }

    /// Returns true when every candidate manifest was checked.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    fn record_failure(&mut self, identifiers: &[FullIdentifier], error: &IndexError) {
        for identifier in identifiers {
            self.failures.push(HashLookupFailure {
                identifier: identifier.to_string(),
                error: error.clone(),
            });
        }
    }
}

/// Resolves file versions by full identifier or short hash.
#[derive(Debug, Clone)]
pub struct HashIndex {
    resolver: ManifestResolver,
}

impl HashIndex {
    /// Creates a hash index backed by `resolver` and its cache.
    #[must_use]
    pub fn new(resolver: ManifestResolver) -> Self {
        Self { resolver }
    }

    /// Finds the file version named by a full `loader:name:hash` identifier.
    ///
    /// Returns `Ok(None)` when the index does not list the identifier.
    ///
    /// # Errors
    ///
    /// - [`IndexError::MalformedIdentifier`] if the input is not a full identifier
    /// - [`IndexError::FetchFailed`] if the index or manifest cannot be fetched
    /// - [`IndexError::Consistency`] if the index lists the identifier but its
    ///   manifest has no file with that hash
    #[instrument(skip(self))]
    pub async fn resolve_by_full_identifier(
        &self,
        input: &str,
    ) -> Result<Option<FileVersion>, IndexError> {
        let identifier = parse_full(input)?;
        let index = self.resolver.cache().get_or_fetch().await?;

        if !index.contains(&identifier) {
            debug!(identifier = %identifier, "Identifier not listed in index");
            return Ok(None);
        }

        let canonical = identifier.to_string();
        let Some(manifest) = self
            .resolver
            .resolve_generic(&identifier.generic().to_string())
            .await?
        else {
            return Err(IndexError::consistency(
                &canonical,
                "the mod disappeared from the index while resolving its manifest",
            ));
        };

        match manifest.find_file(identifier.hash()) {
            Some(file) => Ok(Some(file.clone())),
            None => {
                warn!(identifier = %identifier, "Index lists a file its manifest does not contain");
                Err(IndexError::consistency(
                    &canonical,
                    &format!(
                        "manifest lists no file with short hash {}",
                        identifier.short_hash()
                    ),
                ))
            }
        }
    }

    /// Finds every file version whose hash starts with the given short hash.
    ///
    /// Each backing manifest is fetched once, concurrently. Only an index
    /// fetch failure fails the whole call; manifest failures are recorded in
    /// [`ShortHashMatches::failures`].
    ///
    /// # Errors
    ///
    /// - [`IndexError::MalformedIdentifier`] if the short hash is empty
    /// - [`IndexError::FetchFailed`] if the index cannot be fetched
    #[instrument(skip(self))]
    pub async fn resolve_by_short_hash(&self, hash: &str) -> Result<ShortHashMatches, IndexError> {
        let wanted = short_hash(hash);
        if wanted.is_empty() || wanted.contains(':') {
            return Err(IndexError::malformed(hash, "short hash must be a single non-empty segment"));
        }

        let index = self.resolver.cache().get_or_fetch().await?;
        let mut by_generic: BTreeMap<GenericIdentifier, Vec<FullIdentifier>> = BTreeMap::new();
        for identifier in index.identifiers_with_short_hash(&wanted) {
            by_generic
                .entry(identifier.generic())
                .or_default()
                .push(identifier);
        }
        debug!(short_hash = %wanted, manifests = by_generic.len(), "Resolving short hash candidates");

        let lookups = by_generic.into_iter().map(|(generic, identifiers)| async move {
            let outcome = self.resolver.resolve_generic(&generic.to_string()).await;
            (generic, identifiers, outcome)
        });

        let mut matches = ShortHashMatches {
            short_hash: wanted.clone(),
            ..ShortHashMatches::default()
        };
        for (generic, identifiers, outcome) in join_all(lookups).await {
            match outcome {
                Ok(Some(manifest)) => {
                    let before = matches.files.len();
                    matches
                        .files
                        .extend(manifest.files_with_short_hash(&wanted).cloned());
                    if matches.files.len() == before {
                        warn!(generic = %generic, short_hash = %wanted, "Manifest lacks an indexed file");
                        matches.record_failure(
                            &identifiers,
                            &IndexError::consistency(
                                &generic.to_string(),
                                &format!("manifest lists no file with short hash {wanted}"),
                            ),
                        );
                    }
                }
                Ok(None) => matches.record_failure(
                    &identifiers,
                    &IndexError::consistency(
                        &generic.to_string(),
                        "the mod disappeared from the index while resolving its manifest",
                    ),
                ),
                Err(error) => {
                    warn!(generic = %generic, error = %error, "Manifest lookup failed during short hash scan");
                    matches.record_failure(&identifiers, &error);
                }
            }
        }

        Ok(matches)
    }
}
