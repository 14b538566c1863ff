//! In-memory project repository.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use cipherstudio_core::error::AppError;
use cipherstudio_core::result::AppResult;
use cipherstudio_core::traits::Repository;
use cipherstudio_core::types::{ProjectId, UserId};
use cipherstudio_entity::project::Project;

use crate::repositories::ProjectRepository;

/// Project rows held in a shared map.
#[derive(Debug, Clone, Default)]
pub struct MemoryProjectRepository {
    projects: Arc<RwLock<HashMap<ProjectId, Project>>>,
}

impl MemoryProjectRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored projects.
    pub async fn len(&self) -> usize {
        self.projects.read().await.len()
    }

    /// Whether no projects are stored.
    pub async fn is_empty(&self) -> bool {
        self.projects.read().await.is_empty()
    }
}

#[async_trait]
impl Repository<Project, ProjectId> for MemoryProjectRepository {
    async fn find_by_id(&self, id: &ProjectId) -> AppResult<Option<Project>> {
        Ok(self.projects.read().await.get(id).cloned())
    }

    async fn insert(&self, project: &Project) -> AppResult<Project> {
        let mut projects = self.projects.write().await;
        if projects.contains_key(&project.id) {
            return Err(AppError::database(format!(
                "Project {} already exists",
                project.id
            )));
        }
        projects.insert(project.id, project.clone());
        Ok(project.clone())
    }

    async fn update(&self, project: &Project) -> AppResult<Project> {
        let mut projects = self.projects.write().await;
        let slot = projects
            .get_mut(&project.id)
            .ok_or_else(|| AppError::not_found(format!("Project {} not found", project.id)))?;
        slot.name = project.name.clone();
        slot.description = project.description.clone();
        slot.is_public = project.is_public;
        slot.updated_at = project.updated_at;
        Ok(slot.clone())
    }

    async fn delete(&self, id: &ProjectId) -> AppResult<bool> {
        Ok(self.projects.write().await.remove(id).is_some())
    }
}

#[async_trait]
impl ProjectRepository for MemoryProjectRepository {
    async fn find_by_owner(&self, owner_id: &UserId) -> AppResult<Vec<Project>> {
        let mut owned: Vec<Project> = self
            .projects
            .read()
            .await
            .values()
            .filter(|p| p.owner_id == *owner_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(a.id.cmp(&b.id)));
        Ok(owned)
    }

    async fn touch_last_opened(&self, id: &ProjectId) -> AppResult<Option<Project>> {
        let mut projects = self.projects.write().await;
        Ok(projects.get_mut(id).map(|project| {
            let now = Utc::now();
            project.last_opened_at = now;
            project.updated_at = now;
            project.clone()
        }))
    }
}
