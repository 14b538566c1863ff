//! Blob store trait for externally addressed file bodies.

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// Trait for content-addressable blob backends.
///
/// Keys are opaque strings generated and owned by the caller. Every
/// failure is reported as [`ErrorKind::Storage`](crate::error::ErrorKind::Storage);
/// the caller decides whether a failure is fatal. Implementations exist
/// for the local filesystem, memory, and S3 in `cipherstudio-storage`.
#[async_trait]
pub trait BlobStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "local", "s3").
    fn provider_type(&self) -> &str;

    /// Check whether the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Store `data` under `key`, replacing any existing blob with that key.
    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> AppResult<()>;

    /// Fetch the blob stored under `key`.
    async fn get(&self, key: &str) -> AppResult<Bytes>;

    /// Remove the blob stored under `key`. Removing an absent key succeeds.
    async fn delete(&self, key: &str) -> AppResult<()>;
}
