//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from
//! an optional TOML file overlaid with `CIPHERSTUDIO__*` environment
//! variables. Each sub-module represents one configuration section.

pub mod database;
pub mod logging;
pub mod storage;
pub mod tiering;

use serde::{Deserialize, Serialize};

pub use self::database::DatabaseConfig;
pub use self::logging::LoggingConfig;
pub use self::storage::{LocalStorageConfig, S3StorageConfig, StorageConfig};
pub use self::tiering::TieringConfig;

use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Metadata database settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Blob store settings.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Content tiering policy settings.
    #[serde(default)]
    pub tiering: TieringConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file (optional) and the environment.
    ///
    /// Environment variables use the `CIPHERSTUDIO` prefix and `__` as the
    /// section separator, e.g. `CIPHERSTUDIO__STORAGE__PROVIDER=s3`.
    pub fn load(config_path: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("CIPHERSTUDIO")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}
