//! Local filesystem blob store.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tracing::debug;

use cipherstudio_core::error::{AppError, ErrorKind};
use cipherstudio_core::result::AppResult;
use cipherstudio_core::traits::BlobStore;

/// Blob store that keeps each blob as a file under a root directory.
///
/// A key maps to the relative path of the same name, so
/// `projects/<id>/<token>_App.js` becomes a nested file under the root.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    /// Root directory for all stored blobs.
    root: PathBuf,
}

impl LocalBlobStore {
    /// Create a new local blob store rooted at the given path.
    pub async fn new(root_path: impl AsRef<Path>) -> AppResult<Self> {
        let root = root_path.as_ref().to_path_buf();
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create blob root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root })
    }

    /// Resolve a key to a path inside the root, rejecting keys that escape it.
    fn resolve(&self, key: &str) -> AppResult<PathBuf> {
        let relative = Path::new(key.trim_start_matches('/'));
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if key.trim_start_matches('/').is_empty() || escapes {
            return Err(AppError::storage(format!("Invalid blob key: {key}")));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(fs::metadata(&self.root)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false))
    }

    async fn put(&self, key: &str, data: Bytes, _content_type: &str) -> AppResult<()> {
        let path = self.resolve(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create blob directory: {}", parent.display()),
                    e,
                )
            })?;
        }

        // Write beside the target and rename so readers never see a torn body.
        let staging = path.with_extension(format!("tmp-{}", uuid::Uuid::new_v4().simple()));
        fs::write(&staging, &data).await.map_err(|e| {
            AppError::with_source(ErrorKind::Storage, format!("Failed to write blob: {key}"), e)
        })?;
        if let Err(e) = fs::rename(&staging, &path).await {
            let _ = fs::remove_file(&staging).await;
            return Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to commit blob: {key}"),
                e,
            ));
        }

        debug!(key, bytes = data.len(), "Wrote blob");
        Ok(())
    }

    async fn get(&self, key: &str) -> AppResult<Bytes> {
        let path = self.resolve(key)?;
        let data = fs::read(&path).await.map_err(|e| {
            let message = if e.kind() == std::io::ErrorKind::NotFound {
                format!("Blob not found: {key}")
            } else {
                format!("Failed to read blob: {key}")
            };
            AppError::with_source(ErrorKind::Storage, message, e)
        })?;
        debug!(key, bytes = data.len(), "Read blob");
        Ok(Bytes::from(data))
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let path = self.resolve(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!(key, "Deleted blob");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to delete blob: {key}"),
                e,
            )),
        }
    }
}
