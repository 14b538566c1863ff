//! Connectivity check for the metadata database and blob store.

use serde::Serialize;
use tabled::Tabled;

use cipherstudio_core::config::AppConfig;
use cipherstudio_core::error::AppError;
use cipherstudio_database::DatabasePool;

use crate::output::{self, OutputFormat};

/// Check display row
#[derive(Debug, Serialize, Tabled)]
struct CheckRow {
    /// Component
    component: String,
    /// Backend
    backend: String,
    /// Status
    status: String,
}

fn status(result: &Result<bool, AppError>) -> String {
    match result {
        Ok(true) => "ok".into(),
        Ok(false) => "unhealthy".into(),
        Err(e) => format!("error: {e}"),
    }
}

/// Execute the check command
pub async fn execute(config: &AppConfig, format: OutputFormat) -> Result<(), AppError> {
    let database = match DatabasePool::connect(&config.database).await {
        Ok(db) => {
            let result = db.health_check().await;
            db.close().await;
            result
        }
        Err(e) => Err(e),
    };

    let (backend, blobs) = match cipherstudio_storage::build_blob_store(&config.storage).await {
        Ok(store) => (store.provider_type().to_string(), store.health_check().await),
        Err(e) => (config.storage.provider.clone(), Err(e)),
    };

    let healthy = matches!(database, Ok(true)) && matches!(blobs, Ok(true));
    let rows = vec![
        CheckRow {
            component: "database".into(),
            backend: "postgres".into(),
            status: status(&database),
        },
        CheckRow {
            component: "blob store".into(),
            backend,
            status: status(&blobs),
        },
    ];
    output::print_list(&rows, format);

    if healthy {
        Ok(())
    } else {
        Err(AppError::internal("One or more backends are unavailable"))
    }
}
