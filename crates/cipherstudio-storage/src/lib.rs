//! # cipherstudio-storage
//!
//! Blob store providers for offloaded file bodies. Supports the local
//! filesystem, an in-process map, and S3-compatible object stores.

pub mod manager;
pub mod mime;
pub mod providers;

pub use manager::build_blob_store;
pub use mime::content_type_for;
pub use providers::{LocalBlobStore, MemoryBlobStore};
