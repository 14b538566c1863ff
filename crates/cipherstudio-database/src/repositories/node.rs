//! PostgreSQL node repository.

use async_trait::async_trait;
use sqlx::PgPool;

use cipherstudio_core::error::{AppError, ErrorKind};
use cipherstudio_core::result::AppResult;
use cipherstudio_core::traits::Repository;
use cipherstudio_core::types::{NodeId, ProjectId};
use cipherstudio_entity::node::Node;

use super::NodeRepository;

/// Folders first, then byte-wise name, then id. Mirrors `tree_order`.
const TREE_ORDER: &str = "ORDER BY (kind = 'folder') DESC, name COLLATE \"C\" ASC, id ASC";

/// Repository for node rows in the `nodes` table.
#[derive(Debug, Clone)]
pub struct PgNodeRepository {
    pool: PgPool,
}

impl PgNodeRepository {
    /// Create a new node repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Map a write failure, turning the parent foreign key into `InvalidParent`.
fn write_error(e: sqlx::Error, context: &'static str) -> AppError {
    match e {
        sqlx::Error::Database(ref db_err) if db_err.constraint() == Some("nodes_parent_id_fkey") => {
            AppError::invalid_parent("Parent node does not exist")
        }
        sqlx::Error::Database(ref db_err)
            if db_err.constraint() == Some("nodes_project_id_fkey") =>
        {
            AppError::not_found("Project not found")
        }
        _ => AppError::with_source(ErrorKind::Database, context, e),
    }
}

#[async_trait]
impl Repository<Node, NodeId> for PgNodeRepository {
    async fn find_by_id(&self, id: &NodeId) -> AppResult<Option<Node>> {
        sqlx::query_as::<_, Node>("SELECT * FROM nodes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find node", e))
    }

    async fn insert(&self, node: &Node) -> AppResult<Node> {
        sqlx::query_as::<_, Node>(
            "INSERT INTO nodes (id, project_id, parent_id, name, kind, extension, size_bytes, \
             content, blob_key, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) RETURNING *",
        )
        .bind(node.id)
        .bind(node.project_id)
        .bind(node.parent_id)
        .bind(&node.name)
        .bind(node.kind)
        .bind(&node.extension)
        .bind(node.size_bytes)
        .bind(&node.content)
        .bind(&node.blob_key)
        .bind(node.created_at)
        .bind(node.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error(e, "Failed to create node"))
    }

    async fn update(&self, node: &Node) -> AppResult<Node> {
        sqlx::query_as::<_, Node>(
            "UPDATE nodes SET parent_id = $2, name = $3, extension = $4, size_bytes = $5, \
             content = $6, blob_key = $7, updated_at = $8 \
             WHERE id = $1 RETURNING *",
        )
        .bind(node.id)
        .bind(node.parent_id)
        .bind(&node.name)
        .bind(&node.extension)
        .bind(node.size_bytes)
        .bind(&node.content)
        .bind(&node.blob_key)
        .bind(node.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| write_error(e, "Failed to update node"))?
        .ok_or_else(|| AppError::not_found(format!("Node {} not found", node.id)))
    }

    async fn delete(&self, id: &NodeId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM nodes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete node", e))?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl NodeRepository for PgNodeRepository {
    async fn find_by_project(&self, project_id: &ProjectId) -> AppResult<Vec<Node>> {
        sqlx::query_as::<_, Node>(&format!(
            "SELECT * FROM nodes WHERE project_id = $1 {TREE_ORDER}"
        ))
        .bind(project_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list project nodes", e))
    }

    async fn find_children(
        &self,
        project_id: &ProjectId,
        parent_id: Option<&NodeId>,
    ) -> AppResult<Vec<Node>> {
        sqlx::query_as::<_, Node>(&format!(
            "SELECT * FROM nodes WHERE project_id = $1 AND parent_id IS NOT DISTINCT FROM $2 \
             {TREE_ORDER}"
        ))
        .bind(project_id)
        .bind(parent_id.copied())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list children", e))
    }

    async fn delete_by_project(&self, project_id: &ProjectId) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM nodes WHERE project_id = $1")
            .bind(project_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete project nodes", e)
            })?;
        Ok(result.rows_affected())
    }
}
