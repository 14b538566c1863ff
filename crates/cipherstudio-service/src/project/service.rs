//! Project CRUD with owner-only access.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use cipherstudio_core::error::AppError;
use cipherstudio_core::result::AppResult;
use cipherstudio_core::traits::Repository;
use cipherstudio_core::types::ProjectId;
use cipherstudio_database::{NodeRepository, ProjectRepository};
use cipherstudio_entity::node::{Node, NodeKind};
use cipherstudio_entity::project::{CreateProject, Project, ProjectTemplate, UpdateProject};

use crate::access::{invalid, owned_project};
use crate::context::RequestContext;
use crate::project::seed::{SEED_FILES, SOURCE_FOLDER};
use crate::tree::{CreateNodeRequest, TreeService};

/// Request to create a project.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateProjectRequest {
    /// Project name; also the name of the root folder.
    #[validate(length(min = 1, max = 100, message = "Project name must be 1-100 characters"))]
    pub name: String,
    /// Optional description.
    #[validate(length(max = 500, message = "Description cannot exceed 500 characters"))]
    pub description: Option<String>,
    /// Starter template; defaults to React.
    pub template: Option<ProjectTemplate>,
}

/// Partial update of a project.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateProjectRequest {
    /// New name.
    #[validate(length(min = 1, max = 100, message = "Project name must be 1-100 characters"))]
    pub name: Option<String>,
    /// New description.
    #[validate(length(max = 500, message = "Description cannot exceed 500 characters"))]
    pub description: Option<String>,
    /// New visibility.
    pub is_public: Option<bool>,
}

/// A project together with its flat node list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectWithNodes {
    /// The project record.
    pub project: Project,
    /// Every node of the project, in tree order.
    pub nodes: Vec<Node>,
}

/// Outcome of a project deletion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectDeletion {
    /// Node records removed.
    pub nodes_removed: u64,
    /// Blobs released.
    pub blobs_released: usize,
    /// Blobs whose release failed and may be orphaned.
    pub blobs_failed: usize,
}

/// Manages projects and their lifecycle.
#[derive(Debug, Clone)]
pub struct ProjectService {
    /// Project records.
    projects: Arc<dyn ProjectRepository>,
    /// Node records.
    nodes: Arc<dyn NodeRepository>,
    /// Tree operations, used for seeding; shares its locks and tiering.
    tree: Arc<TreeService>,
}

impl ProjectService {
    /// Creates a new project service.
    pub fn new(
        projects: Arc<dyn ProjectRepository>,
        nodes: Arc<dyn NodeRepository>,
        tree: Arc<TreeService>,
    ) -> Self {
        Self {
            projects,
            nodes,
            tree,
        }
    }

    /// Creates a project owned by the caller and seeds its tree.
    ///
    /// The seed is a root folder named after the project holding `src/`
    /// with the starter files. Seeding is not rolled back: on failure the
    /// project and any seed nodes already written remain.
    pub async fn create_project(
        &self,
        ctx: &RequestContext,
        mut req: CreateProjectRequest,
    ) -> AppResult<Project> {
        req.name = req.name.trim().to_string();
        req.validate().map_err(invalid)?;

        let project = Project::from_create(CreateProject {
            owner_id: ctx.user_id,
            name: req.name,
            description: req.description.unwrap_or_default(),
            template: req.template.unwrap_or_default(),
        });
        let project = self.projects.insert(&project).await?;

        info!(
            user_id = %ctx.user_id,
            project_id = %project.id,
            template = %project.template,
            "Project created"
        );

        self.seed(ctx, &project).await?;
        Ok(project)
    }

    /// Lists the caller's projects, most recently updated first.
    pub async fn list_projects(&self, ctx: &RequestContext) -> AppResult<Vec<Project>> {
        self.projects.find_by_owner(&ctx.user_id).await
    }

    /// Gets a project with all its nodes and records that it was opened.
    pub async fn get_project(
        &self,
        ctx: &RequestContext,
        project_id: ProjectId,
    ) -> AppResult<ProjectWithNodes> {
        owned_project(self.projects.as_ref(), &project_id, ctx).await?;

        let project = self
            .projects
            .touch_last_opened(&project_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Project {project_id} not found")))?;
        let nodes = self.nodes.find_by_project(&project_id).await?;

        Ok(ProjectWithNodes { project, nodes })
    }

    /// Updates a project's name, description or visibility.
    ///
    /// The root folder keeps its name.
    pub async fn update_project(
        &self,
        ctx: &RequestContext,
        project_id: ProjectId,
        mut req: UpdateProjectRequest,
    ) -> AppResult<Project> {
        req.name = req.name.map(|n| n.trim().to_string());
        req.validate().map_err(invalid)?;

        let mut project = owned_project(self.projects.as_ref(), &project_id, ctx).await?;
        project.apply(UpdateProject {
            name: req.name,
            description: req.description,
            is_public: req.is_public,
        });
        let project = self.projects.update(&project).await?;

        info!(user_id = %ctx.user_id, project_id = %project.id, "Project updated");
        Ok(project)
    }

    /// Deletes a project, its nodes and their blobs.
    ///
    /// Every blob release is attempted even when some fail; failures are
    /// logged and counted. Node records are then removed, then the project.
    pub async fn delete_project(
        &self,
        ctx: &RequestContext,
        project_id: ProjectId,
    ) -> AppResult<ProjectDeletion> {
        let locks = self.tree.locks();
        let (guard, _) = self.tree.locked_project(ctx, project_id).await?;

        let mut outcome = ProjectDeletion::default();
        for node in self.nodes.find_by_project(&project_id).await? {
            if !node.is_offloaded() {
                continue;
            }
            if self.tree.tiering().release(&node).await {
                outcome.blobs_released += 1;
            } else {
                outcome.blobs_failed += 1;
            }
        }

        outcome.nodes_removed = self.nodes.delete_by_project(&project_id).await?;
        if !self.projects.delete(&project_id).await? {
            return Err(AppError::not_found(format!("Project {project_id} not found")));
        }

        drop(guard);
        locks.forget(&project_id);

        info!(
            user_id = %ctx.user_id,
            project_id = %project_id,
            nodes_removed = outcome.nodes_removed,
            blobs_released = outcome.blobs_released,
            blobs_failed = outcome.blobs_failed,
            "Project deleted"
        );
        Ok(outcome)
    }

    /// Creates the root folder, `src/`, and the starter files.
    async fn seed(&self, ctx: &RequestContext, project: &Project) -> AppResult<()> {
        let root = self
            .tree
            .create_node(
                ctx,
                CreateNodeRequest {
                    project_id: project.id,
                    parent_id: None,
                    name: project.name.clone(),
                    kind: NodeKind::Folder,
                    content: None,
                },
            )
            .await?;

        let src = self
            .tree
            .create_node(
                ctx,
                CreateNodeRequest {
                    project_id: project.id,
                    parent_id: Some(root.id),
                    name: SOURCE_FOLDER.to_string(),
                    kind: NodeKind::Folder,
                    content: None,
                },
            )
            .await?;

        for (name, body) in SEED_FILES {
            self.tree
                .create_node(
                    ctx,
                    CreateNodeRequest {
                        project_id: project.id,
                        parent_id: Some(src.id),
                        name: name.to_string(),
                        kind: NodeKind::File,
                        content: Some(body.to_string()),
                    },
                )
                .await?;
        }
        Ok(())
    }
}
