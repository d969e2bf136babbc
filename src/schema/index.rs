//! The top-level `index.json` document.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::identifier::{FullIdentifier, GenericIdentifier, parse_full, short_hash};

/// The set of every full identifier published by an index repository.
///
/// Identifiers are stored normalized (lowercase) and each one is guaranteed to
/// have exactly three non-empty segments; entries that do not parse are
/// dropped while decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawIndexDocument")]
pub struct IndexDocument {
    /// Version of the index schema.
    pub schema_version: String,
    /// Every known `loader:name:hash` identifier.
    pub identifiers: BTreeSet<String>,
    /// Point in time after which the document should be re-fetched.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,
}

/// Wire shape accepted for `index.json`.
///
/// Current revisions list `identifiers` directly; older ones nest them in
/// `files[].identifier` next to the full hash.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawIndexDocument {
    #[serde(alias = "indexVersion")]
    schema_version: String,
    #[serde(default)]
    identifiers: Vec<String>,
    #[serde(default)]
    files: Vec<RawIndexFile>,
    #[serde(default)]
    expiry: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct RawIndexFile {
    identifier: String,
}

impl From<RawIndexDocument> for IndexDocument {
    fn from(raw: RawIndexDocument) -> Self {
        let entries = raw
            .identifiers
            .into_iter()
            .chain(raw.files.into_iter().map(|file| file.identifier));
        Self::new(raw.schema_version, entries).with_expiry(raw.expiry)
    }
}

impl IndexDocument {
    /// Builds an index from raw identifier strings, normalizing each one.
    ///
    /// Malformed entries are logged and skipped.
    #[must_use]
    pub fn new<I, S>(schema_version: impl Into<String>, identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut accepted = BTreeSet::new();
        for entry in identifiers {
            match parse_full(entry.as_ref()) {
                Ok(identifier) => {
                    accepted.insert(identifier.to_string());
                }
                Err(error) => {
                    warn!(entry = entry.as_ref(), error = %error, "Dropping malformed index entry");
                }
            }
        }
        Self {
            schema_version: schema_version.into(),
            identifiers: accepted,
            expiry: None,
        }
    }

    /// Sets the expiry timestamp.
    #[must_use]
    pub fn with_expiry(mut self, expiry: Option<DateTime<Utc>>) -> Self {
        self.expiry = expiry;
        self
    }

    /// Decodes an index document from JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns the codec error when the payload is not a valid index document.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// Number of identifiers in the index.
    #[must_use]
    pub fn len(&self) -> usize {
        self.identifiers.len()
    }

    /// Returns true when the index lists no identifiers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
    }

    /// Returns true if the exact full identifier is listed.
    #[must_use]
    pub fn contains(&self, identifier: &FullIdentifier) -> bool {
        self.identifiers.contains(&identifier.to_string())
    }

    /// Returns true if any listed identifier belongs to the given mod.
    #[must_use]
    pub fn contains_generic(&self, generic: &GenericIdentifier) -> bool {
        let prefix = format!("{generic}:");
        self.identifiers
            .range::<str, _>((std::ops::Bound::Included(prefix.as_str()), std::ops::Bound::Unbounded))
            .take_while(|identifier| identifier.starts_with(&prefix))
            .any(|identifier| {
                identifier
                    .rsplit_once(':')
                    .is_some_and(|(listed, _)| listed.len() + 1 == prefix.len())
            })
    }

    /// Distinct `loader:name` identifiers, obtained by stripping the hash segment.
    #[must_use]
    pub fn generic_identifiers(&self) -> BTreeSet<String> {
        self.identifiers
            .iter()
            .filter_map(|identifier| identifier.rsplit_once(':').map(|(generic, _)| generic))
            .map(str::to_string)
            .collect()
    }

    /// Every listed identifier whose hash shares the given short hash, in index order.
    #[must_use]
    pub fn identifiers_with_short_hash(&self, hash: &str) -> Vec<FullIdentifier> {
        let wanted = short_hash(hash);
        self.identifiers
            .iter()
            .filter_map(|identifier| parse_full(identifier).ok())
            .filter(|identifier| identifier.short_hash() == wanted)
            .collect()
    }

    /// Returns true if the document carries an expiry that is not after `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiry.is_some_and(|expiry| expiry <= now)
    }
}
