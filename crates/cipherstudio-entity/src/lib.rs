//! # cipherstudio-entity
//!
//! Domain entity models for CipherStudio. A project owns a flat set of
//! [`node::Node`] records linked by parent pointers; the hierarchy is
//! reconstructed on demand rather than held as a live pointer tree.
//! Database entities derive `sqlx::FromRow`.

pub mod node;
pub mod project;
