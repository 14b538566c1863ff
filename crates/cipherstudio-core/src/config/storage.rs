//! Blob store configuration.

use serde::{Deserialize, Serialize};

/// Top-level blob storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Which backend to use: `"local"`, `"memory"`, or `"s3"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Local filesystem blob store configuration.
    #[serde(default)]
    pub local: LocalStorageConfig,
    /// S3-compatible blob store configuration.
    #[serde(default)]
    pub s3: S3StorageConfig,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            local: LocalStorageConfig::default(),
            s3: S3StorageConfig::default(),
        }
    }
}

/// Local filesystem blob store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalStorageConfig {
    /// Root directory under which blob keys are stored as files.
    #[serde(default = "default_local_root")]
    pub root_path: String,
}

impl Default for LocalStorageConfig {
    fn default() -> Self {
        Self {
            root_path: default_local_root(),
        }
    }
}

/// S3-compatible object storage configuration.
///
/// Credentials come from the standard AWS environment/profile chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3StorageConfig {
    /// Bucket holding every blob.
    #[serde(default)]
    pub bucket: String,
    /// AWS region.
    #[serde(default = "default_region")]
    pub region: String,
    /// Custom endpoint URL (MinIO and friends). Empty means AWS.
    #[serde(default)]
    pub endpoint: String,
}

impl Default for S3StorageConfig {
    fn default() -> Self {
        Self {
            bucket: String::new(),
            region: default_region(),
            endpoint: String::new(),
        }
    }
}

fn default_provider() -> String {
    "local".to_string()
}

fn default_local_root() -> String {
    "./data/blobs".to_string()
}

fn default_region() -> String {
    "us-east-1".to_string()
}
