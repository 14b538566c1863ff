//! Service wiring over in-memory repositories for unit tests.

use std::sync::Arc;

use cipherstudio_core::config::TieringConfig;
use cipherstudio_core::types::UserId;
use cipherstudio_database::{MemoryNodeRepository, MemoryProjectRepository};
use cipherstudio_storage::MemoryBlobStore;

use crate::context::RequestContext;
use crate::lock::ProjectLocks;
use crate::project::ProjectService;
use crate::tiering::TieringPolicy;
use crate::tree::TreeService;

pub(crate) struct Harness {
    pub nodes: MemoryNodeRepository,
    pub blobs: MemoryBlobStore,
    pub tree: Arc<TreeService>,
    pub projects: ProjectService,
}

impl Harness {
    pub(crate) fn new() -> Self {
        let nodes = MemoryNodeRepository::new();
        let projects = MemoryProjectRepository::new();
        let blobs = MemoryBlobStore::new();

        let tiering = TieringPolicy::new(Arc::new(blobs.clone()), TieringConfig::default());
        let tree = Arc::new(TreeService::new(
            Arc::new(nodes.clone()),
            Arc::new(projects.clone()),
            tiering,
            ProjectLocks::new(),
            4,
        ));
        let service = ProjectService::new(Arc::new(projects), Arc::new(nodes.clone()), tree.clone());

        Self {
            nodes,
            blobs,
            tree,
            projects: service,
        }
    }
}

pub(crate) fn user() -> RequestContext {
    RequestContext::new(UserId::new())
}
