//! Core traits defined in `cipherstudio-core` and implemented by other crates.

pub mod blob_store;
pub mod repository;

pub use blob_store::BlobStore;
pub use repository::Repository;
