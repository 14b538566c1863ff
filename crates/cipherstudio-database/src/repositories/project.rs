//! PostgreSQL project repository.

use async_trait::async_trait;
use sqlx::PgPool;

use cipherstudio_core::error::{AppError, ErrorKind};
use cipherstudio_core::result::AppResult;
use cipherstudio_core::traits::Repository;
use cipherstudio_core::types::{ProjectId, UserId};
use cipherstudio_entity::project::Project;

use super::ProjectRepository;

/// Repository for rows in the `projects` table.
#[derive(Debug, Clone)]
pub struct PgProjectRepository {
    pool: PgPool,
}

impl PgProjectRepository {
    /// Create a new project repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Repository<Project, ProjectId> for PgProjectRepository {
    async fn find_by_id(&self, id: &ProjectId) -> AppResult<Option<Project>> {
        sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find project", e))
    }

    async fn insert(&self, project: &Project) -> AppResult<Project> {
        sqlx::query_as::<_, Project>(
            "INSERT INTO projects (id, owner_id, name, description, template, is_public, \
             last_opened_at, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING *",
        )
        .bind(project.id)
        .bind(project.owner_id)
        .bind(&project.name)
        .bind(&project.description)
        .bind(project.template)
        .bind(project.is_public)
        .bind(project.last_opened_at)
        .bind(project.created_at)
        .bind(project.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create project", e))
    }

    async fn update(&self, project: &Project) -> AppResult<Project> {
        sqlx::query_as::<_, Project>(
            "UPDATE projects SET name = $2, description = $3, is_public = $4, updated_at = $5 \
             WHERE id = $1 RETURNING *",
        )
        .bind(project.id)
        .bind(&project.name)
        .bind(&project.description)
        .bind(project.is_public)
        .bind(project.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update project", e))?
        .ok_or_else(|| AppError::not_found(format!("Project {} not found", project.id)))
    }

    async fn delete(&self, id: &ProjectId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete project", e)
            })?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl ProjectRepository for PgProjectRepository {
    async fn find_by_owner(&self, owner_id: &UserId) -> AppResult<Vec<Project>> {
        sqlx::query_as::<_, Project>(
            "SELECT * FROM projects WHERE owner_id = $1 ORDER BY updated_at DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list projects", e))
    }

    async fn touch_last_opened(&self, id: &ProjectId) -> AppResult<Option<Project>> {
        sqlx::query_as::<_, Project>(
            "UPDATE projects SET last_opened_at = NOW(), updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update last opened time", e)
        })
    }
}
