// Passbox top-level error types.
//
// Aggregates errors from the backend and store modules into a single
// error enum for the application boundary.

use thiserror::Error;

/// Top-level error type for all Passbox operations.
#[derive(Debug, Error)]
pub enum PassboxError {
    #[error("Backend error: {0}")]
    Backend(#[from] crate::backend::BackendError),

    #[error("Store error: {0}")]
    Store(#[from] crate::store::StoreError),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, PassboxError>;
