// Passbox store module.
//
// The credential vault: an explicitly owned in-memory list, hydrated
// once at startup and mirrored to the secure backend as one serialized
// document after every mutation.

mod error;
mod models;
mod vault;

pub use error::StoreError;
pub use models::{CredentialList, CredentialRecord, NewCredential};
pub use vault::{Vault, STORE_KEY};
