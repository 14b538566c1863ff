//! # cipherstudio-database
//!
//! Metadata storage for projects and their node trees. Repository traits
//! live in [`repositories`]; PostgreSQL implementations sit beside them and
//! in-memory implementations live in [`memory`].

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
pub use memory::{MemoryNodeRepository, MemoryProjectRepository};
pub use repositories::{NodeRepository, PgNodeRepository, PgProjectRepository, ProjectRepository};
