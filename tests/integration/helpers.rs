//! Shared test helpers for integration tests.

use std::sync::Arc;

use cipherstudio_core::config::TieringConfig;
use cipherstudio_core::types::{NodeId, ProjectId, UserId};
use cipherstudio_database::{MemoryNodeRepository, MemoryProjectRepository};
use cipherstudio_entity::node::{Node, NodeKind};
use cipherstudio_entity::project::Project;
use cipherstudio_service::{
    CreateNodeRequest, CreateProjectRequest, ProjectLocks, ProjectService, RequestContext,
    TieringPolicy, TreeService,
};
use cipherstudio_storage::MemoryBlobStore;

/// Services wired over in-memory repositories and blob store.
pub struct TestApp {
    /// The project owner every helper acts as.
    pub owner: RequestContext,
    /// Node records, for direct inspection.
    pub nodes: MemoryNodeRepository,
    /// Blob store, for inspection and fault injection.
    pub blobs: MemoryBlobStore,
    /// Tree operations.
    pub tree: Arc<TreeService>,
    /// Project operations.
    pub projects: ProjectService,
}

impl TestApp {
    /// Create a test application with default tiering.
    pub fn new() -> Self {
        Self::with_tiering(TieringConfig::default())
    }

    /// Create a test application with a custom tiering configuration.
    pub fn with_tiering(tiering: TieringConfig) -> Self {
        let nodes = MemoryNodeRepository::new();
        let project_repo = MemoryProjectRepository::new();
        let blobs = MemoryBlobStore::new();

        let concurrency = tiering.hydration_concurrency;
        let policy = TieringPolicy::new(Arc::new(blobs.clone()), tiering);
        let tree = Arc::new(TreeService::new(
            Arc::new(nodes.clone()),
            Arc::new(project_repo.clone()),
            policy,
            ProjectLocks::new(),
            concurrency,
        ));
        let projects =
            ProjectService::new(Arc::new(project_repo), Arc::new(nodes.clone()), tree.clone());

        Self {
            owner: RequestContext::new(UserId::new()),
            nodes,
            blobs,
            tree,
            projects,
        }
    }

    /// A context for some other user.
    pub fn stranger(&self) -> RequestContext {
        RequestContext::new(UserId::new())
    }

    /// Create a seeded project owned by `owner`.
    pub async fn create_project(&self, name: &str) -> Project {
        self.projects
            .create_project(
                &self.owner,
                CreateProjectRequest {
                    name: name.to_string(),
                    description: Some("integration".to_string()),
                    template: None,
                },
            )
            .await
            .expect("create project")
    }

    /// The project's root folder.
    pub async fn root(&self, project_id: ProjectId) -> Node {
        self.tree
            .list_children(&self.owner, project_id, None)
            .await
            .expect("list roots")
            .into_iter()
            .next()
            .expect("project has a root folder")
    }

    /// Create a folder under `parent`.
    pub async fn folder(&self, project_id: ProjectId, parent: NodeId, name: &str) -> Node {
        self.create(project_id, Some(parent), name, NodeKind::Folder, None)
            .await
    }

    /// Create a file under `parent`.
    pub async fn file(&self, project_id: ProjectId, parent: NodeId, name: &str, body: &str) -> Node {
        self.create(project_id, Some(parent), name, NodeKind::File, Some(body))
            .await
    }

    async fn create(
        &self,
        project_id: ProjectId,
        parent_id: Option<NodeId>,
        name: &str,
        kind: NodeKind,
        body: Option<&str>,
    ) -> Node {
        self.tree
            .create_node(
                &self.owner,
                CreateNodeRequest {
                    project_id,
                    parent_id,
                    name: name.to_string(),
                    kind,
                    content: body.map(str::to_string),
                },
            )
            .await
            .expect("create node")
    }

    /// Every stored node of a project, straight from the repository.
    pub async fn stored_nodes(&self, project_id: ProjectId) -> Vec<Node> {
        self.nodes
            .all()
            .await
            .into_iter()
            .filter(|n| n.project_id == project_id)
            .collect()
    }
}
