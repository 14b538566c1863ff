//! Core type definitions used across the CipherStudio workspace.

pub mod id;

pub use id::{NodeId, ProjectId, UserId};
