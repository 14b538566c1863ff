//! Blob store construction from configuration.

use std::sync::Arc;

use tracing::info;

use cipherstudio_core::config::StorageConfig;
use cipherstudio_core::error::AppError;
use cipherstudio_core::result::AppResult;
use cipherstudio_core::traits::BlobStore;

use crate::providers::{LocalBlobStore, MemoryBlobStore};

/// Build the blob store selected by `config.provider`.
pub async fn build_blob_store(config: &StorageConfig) -> AppResult<Arc<dyn BlobStore>> {
    let store: Arc<dyn BlobStore> = match config.provider.to_ascii_lowercase().as_str() {
        "local" => Arc::new(LocalBlobStore::new(&config.local.root_path).await?),
        "memory" => Arc::new(MemoryBlobStore::new()),
        #[cfg(feature = "s3")]
        "s3" => Arc::new(crate::providers::S3BlobStore::new(&config.s3).await?),
        #[cfg(not(feature = "s3"))]
        "s3" => {
            return Err(AppError::configuration(
                "The s3 blob store requires building with the `s3` feature",
            ));
        }
        other => {
            return Err(AppError::configuration(format!(
                "Unknown storage provider '{other}' (expected local, memory or s3)"
            )));
        }
    };

    info!(provider = store.provider_type(), "Blob store ready");
    Ok(store)
}
