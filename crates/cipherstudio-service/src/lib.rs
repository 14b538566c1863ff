//! # cipherstudio-service
//!
//! Service layer for CipherStudio projects. [`TreeService`] stores a
//! project's files and folders as flat parent-pointer records,
//! [`TieringPolicy`] decides whether a file body lives inline or in the
//! blob store, and [`ProjectService`] creates, seeds, opens and deletes
//! projects.
//!
//! Services follow constructor injection: repositories and the blob store
//! are passed in as `Arc` trait objects. Every operation takes a
//! [`RequestContext`] and only the project's owner may read or change it.

mod access;
pub mod context;
pub mod lock;
pub mod project;
pub mod tiering;
pub mod tree;

#[cfg(test)]
pub(crate) mod test_support;

pub use context::RequestContext;
pub use lock::ProjectLocks;
pub use project::{
    CreateProjectRequest, ProjectDeletion, ProjectService, ProjectWithNodes, UpdateProjectRequest,
};
pub use tiering::TieringPolicy;
pub use tree::{CreateNodeRequest, PathResolver, TreeService, UpdateNodeRequest, resolve_path};
