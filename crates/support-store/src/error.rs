//! Store error types.

use support_core::ValidationError;
use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Referenced entity ID is absent.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// A uniqueness constraint was violated.
    #[error("{entity} already exists: {id}")]
    AlreadyExists { entity: &'static str, id: String },

    /// A required field was missing or malformed.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
