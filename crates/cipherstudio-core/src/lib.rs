//! # cipherstudio-core
//!
//! Core crate for CipherStudio. Contains the unified error system,
//! configuration schemas, typed identifiers, and the traits implemented
//! by the storage and database crates.
//!
//! This crate has **no** internal dependencies on other CipherStudio crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
