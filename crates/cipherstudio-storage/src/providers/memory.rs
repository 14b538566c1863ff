//! In-process blob store.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;
use tracing::debug;

use cipherstudio_core::error::AppError;
use cipherstudio_core::result::AppResult;
use cipherstudio_core::traits::BlobStore;

/// A stored blob and the content type it was written with.
#[derive(Debug, Clone)]
struct StoredBlob {
    data: Bytes,
    content_type: String,
}

#[derive(Debug, Default)]
struct Faults {
    put: AtomicBool,
    get: AtomicBool,
    delete: AtomicBool,
}

/// Blob store backed by a map, with switchable failures.
///
/// Clones share the same map, so a handle kept by a test observes what a
/// service wrote through another handle.
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
    blobs: Arc<RwLock<HashMap<String, StoredBlob>>>,
    faults: Arc<Faults>,
    delete_calls: Arc<AtomicUsize>,
}

impl MemoryBlobStore {
    /// Create an empty store with every operation succeeding.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `put` fail (or succeed again).
    pub fn fail_puts(&self, fail: bool) {
        self.faults.put.store(fail, Ordering::SeqCst);
    }

    /// Make every `get` fail (or succeed again).
    pub fn fail_gets(&self, fail: bool) {
        self.faults.get.store(fail, Ordering::SeqCst);
    }

    /// Make every `delete` fail (or succeed again).
    pub fn fail_deletes(&self, fail: bool) {
        self.faults.delete.store(fail, Ordering::SeqCst);
    }

    /// Whether a blob exists under `key`.
    pub async fn contains(&self, key: &str) -> bool {
        self.blobs.read().await.contains_key(key)
    }

    /// Number of stored blobs.
    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }

    /// Whether the store holds no blobs.
    pub async fn is_empty(&self) -> bool {
        self.blobs.read().await.is_empty()
    }

    /// All stored keys, sorted.
    pub async fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.blobs.read().await.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// The content type a blob was stored with.
    pub async fn content_type(&self, key: &str) -> Option<String> {
        self.blobs
            .read()
            .await
            .get(key)
            .map(|b| b.content_type.clone())
    }

    /// How many times `delete` was called, including failed calls.
    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> AppResult<()> {
        if self.faults.put.load(Ordering::SeqCst) {
            return Err(AppError::storage(format!("Injected put failure: {key}")));
        }
        debug!(key, bytes = data.len(), "Stored blob in memory");
        self.blobs.write().await.insert(
            key.to_string(),
            StoredBlob {
                data,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn get(&self, key: &str) -> AppResult<Bytes> {
        if self.faults.get.load(Ordering::SeqCst) {
            return Err(AppError::storage(format!("Injected get failure: {key}")));
        }
        self.blobs
            .read()
            .await
            .get(key)
            .map(|b| b.data.clone())
            .ok_or_else(|| AppError::storage(format!("Blob not found: {key}")))
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if self.faults.delete.load(Ordering::SeqCst) {
            return Err(AppError::storage(format!("Injected delete failure: {key}")));
        }
        self.blobs.write().await.remove(key);
        Ok(())
    }
}
