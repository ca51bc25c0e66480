// Passbox secure store provider.
//
// The credential list is persisted as a single value in the platform's
// native secret store, addressed by a fixed service name and key.
// Payloads embed plaintext passwords, so reads hand them back inside
// `Zeroizing` wrappers and values are never logged.

use zeroize::Zeroizing;

use super::BackendError;

// ─── Constants ───────────────────────────────────────────────────────────────

/// Service name identifying Passbox entries in the platform keyring.
const KEYRING_SERVICE: &str = "passbox";

/// Environment variable overriding the keyring service name.
/// Lets tests and side-by-side installs use an isolated namespace.
const SERVICE_ENV_VAR: &str = "PASSBOX_KEYRING_SERVICE";

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the secure key-value store, enabling
/// platform-specific backends and mock implementations for testing.
pub trait SecureBackend {
    /// Read the value stored under `key`. An absent key is `Ok(None)`,
    /// never an error.
    fn get(&self, key: &str) -> Result<Option<Zeroizing<String>>, BackendError>;

    /// Overwrite the value stored under `key` in one atomic step.
    fn set(&self, key: &str, value: &str) -> Result<(), BackendError>;

    /// Delete the value stored under `key`. Deleting an absent key
    /// succeeds.
    fn delete(&self, key: &str) -> Result<(), BackendError>;
}

// ─── Platform Implementation ─────────────────────────────────────────────────

/// Production implementation using the `keyring` crate.
/// Dispatches to:
///   - Linux: D-Bus Secret Service (GNOME Keyring / KDE Wallet)
///   - macOS: Security.framework Keychain
///   - Windows: Windows Credential Manager
pub struct KeyringBackend {
    service: String,
}

impl KeyringBackend {
    /// Create a backend under the default service name, honoring the
    /// `PASSBOX_KEYRING_SERVICE` override.
    pub fn from_env() -> Self {
        let service =
            std::env::var(SERVICE_ENV_VAR).unwrap_or_else(|_| KEYRING_SERVICE.to_string());
        Self { service }
    }

    /// Creates a backend with a custom service name (useful for testing isolation).
    #[allow(dead_code)]
    pub fn with_service(service: &str) -> Self {
        Self {
            service: service.to_string(),
        }
    }

    fn entry(&self, key: &str) -> Result<keyring::Entry, BackendError> {
        keyring::Entry::new(&self.service, key)
            .map_err(|e| BackendError::Keyring(format!("failed to create keyring entry: {}", e)))
    }
}

impl Default for KeyringBackend {
    fn default() -> Self {
        Self::from_env()
    }
}

impl SecureBackend for KeyringBackend {
    fn get(&self, key: &str) -> Result<Option<Zeroizing<String>>, BackendError> {
        let entry = self.entry(key)?;
        match entry.get_password() {
            Ok(value) => {
                tracing::debug!(key = %key, "read value from platform keyring");
                Ok(Some(Zeroizing::new(value)))
            }
            Err(keyring::Error::NoEntry) => {
                tracing::debug!(key = %key, "no value stored under key");
                Ok(None)
            }
            Err(e) => Err(BackendError::Keyring(format!(
                "failed to read secure store entry: {}",
                e
            ))),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), BackendError> {
        let entry = self.entry(key)?;
        entry.set_password(value).map_err(|e| {
            BackendError::WriteFailed(format!("failed to write secure store entry: {}", e))
        })?;
        tracing::debug!(key = %key, "wrote value to platform keyring");
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), BackendError> {
        let entry = self.entry(key)?;
        match entry.delete_credential() {
            Ok(()) => {
                tracing::debug!(key = %key, "deleted value from platform keyring");
                Ok(())
            }
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(BackendError::Keyring(format!(
                "failed to delete secure store entry: {}",
                e
            ))),
        }
    }
}

// ─── In-Memory Mock for Testing ──────────────────────────────────────────────


// ─── Tests ───────────────────────────────────────────────────────────────────
