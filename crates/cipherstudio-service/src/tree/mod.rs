//! Tree storage and path resolution.

pub mod path;
pub mod service;

pub use path::{PathResolver, build_file_map, resolve_path};
pub use service::{CreateNodeRequest, TreeService, UpdateNodeRequest};
