//! Content tiering policy configuration.

use serde::{Deserialize, Serialize};

/// Controls when a file body is stored inline versus offloaded to the blob store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TieringConfig {
    /// Bodies at least this many bytes long are offloaded at creation.
    /// The default of 1 offloads every non-empty body.
    #[serde(default = "default_threshold")]
    pub offload_threshold_bytes: u64,
    /// Re-run the offload decision when an inline file's content is replaced.
    #[serde(default)]
    pub reevaluate_on_update: bool,
    /// Leading segment of every generated blob key.
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
    /// Maximum concurrent blob fetches while building a snapshot.
    #[serde(default = "default_hydration_concurrency")]
    pub hydration_concurrency: usize,
}

impl Default for TieringConfig {
    fn default() -> Self {
        Self {
            offload_threshold_bytes: default_threshold(),
            reevaluate_on_update: false,
            key_prefix: default_key_prefix(),
            hydration_concurrency: default_hydration_concurrency(),
        }
    }
}

fn default_threshold() -> u64 {
    1
}

fn default_key_prefix() -> String {
    "projects".to_string()
}

fn default_hydration_concurrency() -> usize {
    8
}
