//! S3-compatible blob store (requires the `s3` feature).

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tracing::{debug, info};

use cipherstudio_core::config::S3StorageConfig;
use cipherstudio_core::error::{AppError, ErrorKind};
use cipherstudio_core::result::AppResult;
use cipherstudio_core::traits::BlobStore;

/// Blob store that keeps each blob as an object in one bucket.
#[derive(Debug, Clone)]
pub struct S3BlobStore {
    client: Client,
    bucket: String,
}

impl S3BlobStore {
    /// Build a client from the ambient AWS credential chain and `config`.
    pub async fn new(config: &S3StorageConfig) -> AppResult<Self> {
        if config.bucket.is_empty() {
            return Err(AppError::configuration("storage.s3.bucket must be set"));
        }
        info!(
            bucket = %config.bucket,
            region = %config.region,
            endpoint = %config.endpoint,
            "Initializing S3 blob store"
        );

        let shared = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .load()
            .await;
        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        if !config.endpoint.is_empty() {
            builder = builder.endpoint_url(&config.endpoint).force_path_style(true);
        }

        Ok(Self::with_client(
            Client::from_conf(builder.build()),
            config.bucket.clone(),
        ))
    }

    /// Wrap an existing client.
    pub fn with_client(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    fn provider_type(&self) -> &str {
        "s3"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(self
            .client
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .is_ok())
    }

    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> AppResult<()> {
        let len = data.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Storage, format!("S3 put_object failed: {key}"), e)
            })?;
        debug!(key, bytes = len, "Wrote blob to S3");
        Ok(())
    }

    async fn get(&self, key: &str) -> AppResult<Bytes> {
        let response = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Storage, format!("S3 get_object failed: {key}"), e)
            })?;

        let data = response
            .body
            .collect()
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to read S3 object body: {key}"),
                    e,
                )
            })?
            .into_bytes();
        debug!(key, bytes = data.len(), "Read blob from S3");
        Ok(data)
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        // S3 reports success for absent keys.
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("S3 delete_object failed: {key}"),
                    e,
                )
            })?;
        debug!(key, "Deleted blob from S3");
        Ok(())
    }
}
