//! In-memory [`RemoteStore`] that counts calls.
#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::remote::{RemoteStore, StoreError, manifest_path};

pub struct MockStore {
    index: Mutex<Result<Vec<u8>, StoreError>>,
    manifests: Mutex<HashMap<String, Result<Vec<u8>, StoreError>>>,
    index_delay: Duration,
    hang: bool,
    index_calls: AtomicUsize,
    manifest_calls: AtomicUsize,
}

impl MockStore {
    pub fn new() -> Self {
        Self {
            index: Mutex::new(Err(StoreError::http_status("mock://index.json", 404))),
            manifests: Mutex::new(HashMap::new()),
            index_delay: Duration::ZERO,
            hang: false,
            index_calls: AtomicUsize::new(0),
            manifest_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_index(self, bytes: Vec<u8>) -> Self {
        self.set_index(Ok(bytes));
        self
    }

    pub fn with_manifest(self, loader: &str, name: &str, bytes: Vec<u8>) -> Self {
        self.manifests
            .lock()
            .unwrap()
            .insert(manifest_path(loader, name), Ok(bytes));
        self
    }

    pub fn with_manifest_error(self, loader: &str, name: &str, error: StoreError) -> Self {
        self.manifests
            .lock()
            .unwrap()
            .insert(manifest_path(loader, name), Err(error));
        self
    }

    pub fn with_index_delay(mut self, delay: Duration) -> Self {
        self.index_delay = delay;
        self
    }

    /// Every call waits forever; exercises caller-side timeouts.
    pub fn hanging(mut self) -> Self {
        self.hang = true;
        self
    }

    pub fn set_index(&self, result: Result<Vec<u8>, StoreError>) {
        *self.index.lock().unwrap() = result;
    }

    pub fn index_calls(&self) -> usize {
        self.index_calls.load(Ordering::SeqCst)
    }

    pub fn manifest_calls(&self) -> usize {
        self.manifest_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteStore for MockStore {
    fn location(&self) -> &str {
        "mock://"
    }

    async fn fetch_index(&self) -> Result<Vec<u8>, StoreError> {
        self.index_calls.fetch_add(1, Ordering::SeqCst);
        if self.hang {
            std::future::pending::<()>().await;
        }
        if !self.index_delay.is_zero() {
            tokio::time::sleep(self.index_delay).await;
        }
        self.index.lock().unwrap().clone()
    }

    async fn fetch_manifest(&self, loader: &str, name: &str) -> Result<Vec<u8>, StoreError> {
        self.manifest_calls.fetch_add(1, Ordering::SeqCst);
        if self.hang {
            std::future::pending::<()>().await;
        }
        let key = manifest_path(loader, name);
        self.manifests
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .unwrap_or_else(|| Err(StoreError::http_status(format!("mock://{key}"), 404)))
    }
}
