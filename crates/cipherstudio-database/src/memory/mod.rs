//! In-memory repository implementations.
//!
//! Used by tests and single-process tooling. They keep the same ordering
//! and the same referential constraints as the PostgreSQL schema: a node's
//! parent must exist when it is inserted, and a node with children cannot
//! be deleted.

pub mod node;
pub mod project;

pub use node::MemoryNodeRepository;
pub use project::MemoryProjectRepository;
