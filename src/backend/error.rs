// Passbox backend error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Keyring error: {0}")]
    Keyring(String),

    #[error("Secure store write failed: {0}")]
    WriteFailed(String),
}
