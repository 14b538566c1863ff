//! Convenience result type alias for CipherStudio.

use crate::error::AppError;

/// A specialized `Result` type for CipherStudio operations.
pub type AppResult<T> = Result<T, AppError>;
