//! Project entities.

pub mod model;
pub mod template;

pub use model::{CreateProject, Project, UpdateProject};
pub use template::ProjectTemplate;
