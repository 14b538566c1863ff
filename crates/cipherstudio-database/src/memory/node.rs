//! In-memory node repository.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use cipherstudio_core::error::AppError;
use cipherstudio_core::result::AppResult;
use cipherstudio_core::traits::Repository;
use cipherstudio_core::types::{NodeId, ProjectId};
use cipherstudio_entity::node::{Node, sort_tree};

use crate::repositories::NodeRepository;

/// Node rows held in a shared map.
#[derive(Debug, Clone, Default)]
pub struct MemoryNodeRepository {
    nodes: Arc<RwLock<HashMap<NodeId, Node>>>,
}

impl MemoryNodeRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored nodes across all projects.
    pub async fn len(&self) -> usize {
        self.nodes.read().await.len()
    }

    /// Whether no nodes are stored.
    pub async fn is_empty(&self) -> bool {
        self.nodes.read().await.is_empty()
    }

    /// A copy of every stored node, in no particular order.
    pub async fn all(&self) -> Vec<Node> {
        self.nodes.read().await.values().cloned().collect()
    }
}

#[async_trait]
impl Repository<Node, NodeId> for MemoryNodeRepository {
    async fn find_by_id(&self, id: &NodeId) -> AppResult<Option<Node>> {
        Ok(self.nodes.read().await.get(id).cloned())
    }

    async fn insert(&self, node: &Node) -> AppResult<Node> {
        let mut nodes = self.nodes.write().await;
        if let Some(parent_id) = node.parent_id {
            if !nodes.contains_key(&parent_id) {
                return Err(AppError::invalid_parent("Parent node does not exist"));
            }
        }
        if nodes.contains_key(&node.id) {
            return Err(AppError::database(format!("Node {} already exists", node.id)));
        }
        nodes.insert(node.id, node.clone());
        Ok(node.clone())
    }

    async fn update(&self, node: &Node) -> AppResult<Node> {
        let mut nodes = self.nodes.write().await;
        if let Some(parent_id) = node.parent_id {
            if !nodes.contains_key(&parent_id) {
                return Err(AppError::invalid_parent("Parent node does not exist"));
            }
        }
        let slot = nodes
            .get_mut(&node.id)
            .ok_or_else(|| AppError::not_found(format!("Node {} not found", node.id)))?;
        *slot = node.clone();
        Ok(node.clone())
    }

    async fn delete(&self, id: &NodeId) -> AppResult<bool> {
        let mut nodes = self.nodes.write().await;
        if nodes.values().any(|n| n.parent_id == Some(*id)) {
            return Err(AppError::database(format!(
                "Node {id} still has children and cannot be deleted"
            )));
        }
        Ok(nodes.remove(id).is_some())
    }
}

#[async_trait]
impl NodeRepository for MemoryNodeRepository {
    async fn find_by_project(&self, project_id: &ProjectId) -> AppResult<Vec<Node>> {
        let mut found: Vec<Node> = self
            .nodes
            .read()
            .await
            .values()
            .filter(|n| n.project_id == *project_id)
            .cloned()
            .collect();
        sort_tree(&mut found);
        Ok(found)
    }

    async fn find_children(
        &self,
        project_id: &ProjectId,
        parent_id: Option<&NodeId>,
    ) -> AppResult<Vec<Node>> {
        let mut found: Vec<Node> = self
            .nodes
            .read()
            .await
            .values()
            .filter(|n| n.project_id == *project_id && n.parent_id.as_ref() == parent_id)
            .cloned()
            .collect();
        sort_tree(&mut found);
        Ok(found)
    }

    async fn delete_by_project(&self, project_id: &ProjectId) -> AppResult<u64> {
        let mut nodes = self.nodes.write().await;
        let before = nodes.len();
        nodes.retain(|_, n| n.project_id != *project_id);
        Ok((before - nodes.len()) as u64)
    }
}
