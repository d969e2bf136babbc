//! Remote store access for index repositories.
//!
//! The store only moves bytes: decoding into typed documents happens in the
//! client so every store implementation shares one codec path.
//!
//! # Layout
//!
//! Relative to a base location ending in `/`:
//! - `index.json` - the index document
//! - `{loader}/{name}.json` - one manifest per generic identifier
//!
//! # Example
//!
//! ```no_run
//! use modindex_core::{ClientConfig, HttpRemoteStore, RemoteStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = HttpRemoteStore::new(&ClientConfig::default())?;
//! let bytes = store.fetch_index().await?;
//! println!("index.json is {} bytes", bytes.len());
//! # Ok(())
//! # }
//! ```

mod error;
mod http_client;
mod http_store;

pub use error::StoreError;
pub use http_store::HttpRemoteStore;

use async_trait::async_trait;

/// Relative path of the index document.
pub const INDEX_PATH: &str = "index.json";

/// Relative path of the manifest for `loader:name`.
#[must_use]
pub fn manifest_path(loader: &str, name: &str) -> String {
    format!("{loader}/{name}.json")
}

/// Read-only access to an index repository.
///
/// Implementations return raw document bytes. Callers bound every call with
/// their own timeout, so implementations need not enforce one.
///
/// # Object Safety
///
/// This trait uses `async_trait` so the client can hold an
/// `Arc<dyn RemoteStore>`; Rust 2024 native async traits are not object-safe.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Returns a short description of where documents come from, for logging.
    fn location(&self) -> &str;

    /// Fetches the raw `index.json` document.
    async fn fetch_index(&self) -> Result<Vec<u8>, StoreError>;

    /// Fetches the raw manifest document for `loader:name`.
    ///
    /// Both segments are already normalized (lowercase).
    async fn fetch_manifest(&self, loader: &str, name: &str) -> Result<Vec<u8>, StoreError>;
}
