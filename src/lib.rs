//! Mod Index Client Library
//!
//! This library resolves identifiers against a statically hosted, versioned
//! JSON mod index: one top-level `index.json` listing every known file
//! identifier, plus one manifest document per mod describing its file
//! versions, hashes, and metadata.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`identifier`] - Parsing and normalization of `loader:name[:hash]` identifiers
//! - [`schema`] - Typed index, manifest, and overrides documents
//! - [`remote`] - Remote store abstraction and the HTTP implementation
//! - [`client`] - Index cache, manifest resolution, and hash lookups
//! - [`overrides`] - Merging overrides documents onto manifests
//! - [`blocking`] - Synchronous adapter over the async client
//!
//! # Example
//!
//! ```no_run
//! use modindex_core::{ClientConfig, ModIndexClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ModIndexClient::new(ClientConfig::default())?;
//! if let Some(manifest) = client.resolve_generic("fabric:sodium").await? {
//!     println!("{} has {} files", manifest.fancy_name, manifest.files.len());
//! }
//! # Ok(())
//! # }
//! ```

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod blocking;
pub mod client;
pub mod config;
pub mod error;
pub mod identifier;
pub mod overrides;
pub mod remote;
pub mod schema;
#[cfg(test)]
pub(crate) mod test_support;
pub(crate) mod user_agent;

// Re-export commonly used types
pub use blocking::BlockingClient;
pub use client::{
    HashIndex, HashLookupFailure, IndexCache, ManifestResolver, ModIndexClient, ShortHashMatches,
};
pub use config::{ClientConfig, ConfigError, DEFAULT_BASE_URL, normalize_base_url};
pub use error::IndexError;
pub use identifier::{
    FullIdentifier, GenericIdentifier, SHORT_HASH_LEN, normalize, parse_full, parse_generic,
    short_hash, short_hash_for_content,
};
pub use overrides::apply_overrides;
pub use remote::{HttpRemoteStore, RemoteStore, StoreError};
pub use schema::{
    FileOverride, FileVersion, FilesOverride, IndexDocument, LinksOverrides, ManifestDocument,
    ManifestLinks, ManifestOverrides, ManifestWithOverrides, OtherLink, OverrideSelection,
    Relations, RelationsOverrides,
};
