//! Repository traits and their PostgreSQL implementations.

pub mod node;
pub mod project;

use async_trait::async_trait;

use cipherstudio_core::result::AppResult;
use cipherstudio_core::traits::Repository;
use cipherstudio_core::types::{NodeId, ProjectId, UserId};
use cipherstudio_entity::node::Node;
use cipherstudio_entity::project::Project;

pub use node::PgNodeRepository;
pub use project::PgProjectRepository;

/// Flat node records keyed by id, queried by project and parent.
#[async_trait]
pub trait NodeRepository: Repository<Node, NodeId> {
    /// Every node of a project, in tree order (folders first, then by name).
    async fn find_by_project(&self, project_id: &ProjectId) -> AppResult<Vec<Node>>;

    /// Nodes whose parent is exactly `parent_id` (roots when `None`), in tree order.
    async fn find_children(
        &self,
        project_id: &ProjectId,
        parent_id: Option<&NodeId>,
    ) -> AppResult<Vec<Node>>;

    /// Remove every node of a project. Returns the number removed.
    async fn delete_by_project(&self, project_id: &ProjectId) -> AppResult<u64>;
}

/// Project records.
#[async_trait]
pub trait ProjectRepository: Repository<Project, ProjectId> {
    /// Projects owned by a user, most recently updated first.
    async fn find_by_owner(&self, owner_id: &UserId) -> AppResult<Vec<Project>>;

    /// Record that the project was opened now. Returns the updated project.
    async fn touch_last_opened(&self, id: &ProjectId) -> AppResult<Option<Project>>;
}
