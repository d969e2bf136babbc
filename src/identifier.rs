//! Identifier parsing and normalization.
//!
//! A full identifier names one file version as `loader:name:hash`; a generic
//! identifier names a mod independent of version as `loader:name`. Every
//! comparison in the crate goes through [`normalize`] so that letter case never
//! causes a false negative.

use std::fmt;
use std::str::FromStr;

use sha2::{Digest, Sha512};

use crate::error::IndexError;

/// Canonical length of a short hash.
pub const SHORT_HASH_LEN: usize = 15;

const SEPARATOR: char = ':';

/// Lower-cases the input and trims surrounding whitespace and trailing separators.
#[must_use]
pub fn normalize(value: &str) -> String {
    value
        .trim()
        .to_lowercase()
        .trim_end_matches(SEPARATOR)
        .to_string()
}

/// Normalizes a hash and truncates it to [`SHORT_HASH_LEN`] characters.
///
/// Hashes shorter than the canonical length are returned whole.
#[must_use]
pub fn short_hash(hash: &str) -> String {
    normalize(hash).chars().take(SHORT_HASH_LEN).collect()
}

/// Computes the short SHA-512 hash of file content, as published in manifests.
#[must_use]
pub fn short_hash_for_content(content: &[u8]) -> String {
    let digest = Sha512::digest(content);
    let mut hex = String::with_capacity(SHORT_HASH_LEN + 1);
    for byte in digest.iter() {
        if hex.len() >= SHORT_HASH_LEN {
            break;
        }
        hex.push_str(&format!("{byte:02x}"));
    }
    hex.truncate(SHORT_HASH_LEN);
    hex
}

/// A parsed `loader:name:hash` identifier, always lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FullIdentifier {
    loader: String,
    name: String,
    hash: String,
}

impl FullIdentifier {
    /// Returns the mod loader segment.
    #[must_use]
    pub fn loader(&self) -> &str {
        &self.loader
    }

    /// Returns the mod name segment.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the full hash segment as written in the identifier.
    #[must_use]
    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// Returns the hash truncated to [`SHORT_HASH_LEN`] characters.
    #[must_use]
    pub fn short_hash(&self) -> String {
        short_hash(&self.hash)
    }

    /// Returns the `loader:name` part of this identifier.
    #[must_use]
    pub fn generic(&self) -> GenericIdentifier {
        GenericIdentifier {
            loader: self.loader.clone(),
            name: self.name.clone(),
        }
    }
}

impl fmt::Display for FullIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.loader, self.name, self.hash)
    }
}

impl FromStr for FullIdentifier {
    type Err = IndexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_full(s)
    }
}

/// A parsed `loader:name` identifier, always lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GenericIdentifier {
    loader: String,
    name: String,
}

impl GenericIdentifier {
    /// Parses either a generic or a full identifier, discarding any hash segment.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::MalformedIdentifier`] unless the input has 2 or 3
    /// non-empty segments.
    pub fn from_any(input: &str) -> Result<Self, IndexError> {
        let normalized = normalize(input);
        match split_segments(input, &normalized)?.as_slice() {
            [loader, name] | [loader, name, _] => Ok(Self {
                loader: (*loader).to_string(),
                name: (*name).to_string(),
            }),
            segments => Err(IndexError::malformed(
                input,
                &format!("expected 2 or 3 segments, found {}", segments.len()),
            )),
        }
    }

    /// Returns the mod loader segment.
    #[must_use]
    pub fn loader(&self) -> &str {
        &self.loader
    }

    /// Returns the mod name segment.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for GenericIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.loader, self.name)
    }
}

impl FromStr for GenericIdentifier {
    type Err = IndexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_generic(s)
    }
}

/// Parses a `loader:name:hash` identifier.
///
/// # Errors
///
/// Returns [`IndexError::MalformedIdentifier`] unless the normalized input
/// splits into exactly three non-empty segments.
pub fn parse_full(input: &str) -> Result<FullIdentifier, IndexError> {
    let normalized = normalize(input);
    match split_segments(input, &normalized)?.as_slice() {
        [loader, name, hash] => Ok(FullIdentifier {
            loader: (*loader).to_string(),
            name: (*name).to_string(),
            hash: (*hash).to_string(),
        }),
        segments => Err(IndexError::malformed(
            input,
            &format!("expected 3 segments, found {}", segments.len()),
        )),
    }
}

/// Parses a `loader:name` identifier.
///
/// # Errors
///
/// Returns [`IndexError::MalformedIdentifier`] unless the normalized input
/// splits into exactly two non-empty segments.
pub fn parse_generic(input: &str) -> Result<GenericIdentifier, IndexError> {
    let normalized = normalize(input);
    match split_segments(input, &normalized)?.as_slice() {
        [loader, name] => Ok(GenericIdentifier {
            loader: (*loader).to_string(),
            name: (*name).to_string(),
        }),
        segments => Err(IndexError::malformed(
            input,
            &format!("expected 2 segments, found {}", segments.len()),
        )),
    }
}

fn split_segments<'a>(input: &str, normalized: &'a str) -> Result<Vec<&'a str>, IndexError> {
    if normalized.is_empty() {
        return Err(IndexError::malformed(input, "identifier is empty"));
    }
    let segments: Vec<&str> = normalized.split(SEPARATOR).collect();
    if segments.iter().any(|segment| segment.is_empty()) {
        return Err(IndexError::malformed(input, "identifier has an empty segment"));
    }
    Ok(segments)
}
