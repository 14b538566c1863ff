//! Project lifecycle: creation with a seed tree, ownership, cascading delete.

pub mod seed;
pub mod service;

pub use service::{
    CreateProjectRequest, ProjectDeletion, ProjectService, ProjectWithNodes, UpdateProjectRequest,
};
