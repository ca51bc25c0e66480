// Passbox store error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Backend error: {0}")]
    Backend(#[from] crate::backend::BackendError),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
