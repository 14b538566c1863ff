//! Content tiering: inline bodies versus offloaded blobs.
//!
//! The offload decision is made when a file is created. Writes to an
//! offloaded file overwrite the same blob key, and an offloaded file is
//! never pulled back inline. Blob write failures are returned to the
//! caller; read and release failures are logged and swallowed.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, warn};

use cipherstudio_core::config::TieringConfig;
use cipherstudio_core::result::AppResult;
use cipherstudio_core::traits::BlobStore;
use cipherstudio_core::types::ProjectId;
use cipherstudio_entity::node::Node;
use cipherstudio_storage::content_type_for;

/// Longest slice of a file name carried in its blob key, in bytes.
pub const KEY_NAME_MAX_BYTES: usize = 128;

/// Decides where file bodies live and moves them there.
#[derive(Debug, Clone)]
pub struct TieringPolicy {
    /// Backend for offloaded bodies.
    store: Arc<dyn BlobStore>,
    /// Thresholds and key layout.
    config: TieringConfig,
}

impl TieringPolicy {
    /// Creates a policy over `store`.
    pub fn new(store: Arc<dyn BlobStore>, config: TieringConfig) -> Self {
        Self { store, config }
    }

    /// The underlying blob store.
    pub fn store(&self) -> &Arc<dyn BlobStore> {
        &self.store
    }

    /// Whether a body of `len` bytes belongs in the blob store.
    pub fn should_offload(&self, len: usize) -> bool {
        len > 0 && len as u64 >= self.config.offload_threshold_bytes
    }

    /// A fresh, project-scoped key for a file named `name`.
    ///
    /// UUIDv7 tokens sort by creation time, and separators in the name are
    /// flattened so the name cannot add key segments. Only the first
    /// [`KEY_NAME_MAX_BYTES`] bytes of the name are kept, so the last segment
    /// stays within common filesystem name limits.
    pub fn blob_key(&self, project_id: ProjectId, name: &str) -> String {
        let mut sanitized = String::new();
        for c in name.chars() {
            let c = if c == '/' || c == '\\' { '_' } else { c };
            if sanitized.len() + c.len_utf8() > KEY_NAME_MAX_BYTES {
                break;
            }
            sanitized.push(c);
        }
        format!(
            "{}/{}/{}_{}",
            self.config.key_prefix.trim_end_matches('/'),
            project_id,
            uuid::Uuid::now_v7().simple(),
            sanitized
        )
    }

    /// Offload a freshly built file node if its body qualifies.
    ///
    /// On success the node carries the new key and an empty inline field.
    /// A failed put leaves the node untouched and returns the error.
    pub async fn place(&self, node: &mut Node) -> AppResult<()> {
        if !node.is_file() || node.is_offloaded() || !self.should_offload(node.body().len()) {
            return Ok(());
        }

        let key = self.blob_key(node.project_id, &node.name);
        let body = Bytes::from(node.body().to_owned());
        self.store
            .put(&key, body, content_type_for(&node.name))
            .await?;
        debug!(node_id = %node.id, blob_key = %key, "Offloaded file body");
        node.offload(key);
        Ok(())
    }

    /// Fill an offloaded node's inline field from the blob store.
    ///
    /// A failed fetch is logged and the node keeps its empty body, so
    /// metadata stays browsable while the blob store is degraded.
    pub async fn hydrate(&self, node: &mut Node) {
        let Some(key) = node.blob_key.as_deref() else {
            return;
        };
        if !node.body().is_empty() {
            return;
        }

        match self.store.get(key).await {
            Ok(data) => {
                node.content = Some(String::from_utf8_lossy(&data).into_owned());
            }
            Err(e) => {
                warn!(
                    node_id = %node.id,
                    blob_key = %key,
                    error = %e,
                    "Failed to fetch file body; returning metadata only"
                );
            }
        }
    }

    /// Replace a file's body, writing through to the blob when offloaded.
    ///
    /// The record is only changed after a successful put, so a failure never
    /// leaves a size that disagrees with the stored blob.
    pub async fn write(&self, node: &mut Node, body: String) -> AppResult<()> {
        if let Some(key) = node.blob_key.clone() {
            self.store
                .put(&key, Bytes::from(body.clone()), content_type_for(&node.name))
                .await?;
            debug!(node_id = %node.id, blob_key = %key, "Overwrote file body");
            node.replace_body(body);
            return Ok(());
        }

        node.replace_body(body);
        if self.config.reevaluate_on_update {
            self.place(node).await?;
        }
        Ok(())
    }

    /// Best-effort removal of a node's blob. Returns whether it was removed.
    pub async fn release(&self, node: &Node) -> bool {
        let Some(key) = node.blob_key.as_deref() else {
            return false;
        };
        match self.store.delete(key).await {
            Ok(()) => {
                debug!(node_id = %node.id, blob_key = %key, "Released file body");
                true
            }
            Err(e) => {
                warn!(
                    node_id = %node.id,
                    blob_key = %key,
                    error = %e,
                    "Failed to release file body; blob may be orphaned"
                );
                false
            }
        }
    }
}
