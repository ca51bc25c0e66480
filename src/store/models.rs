// Passbox credential data models.
//
// SECURITY: the `password` field is intentionally private. It is never
// included in Debug output or log messages; access goes through the
// explicit `password()` getter.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One stored credential entry.
///
/// Serializes to an object with exactly the string-valued fields
/// `id`, `name`, `username`, `password`; the id is the canonical UUID
/// string form. The password is stored in plaintext inside the record,
/// with encryption at rest provided by the secure backend.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub id: Uuid,
    pub name: String,
    pub username: String,
    /// The stored password: never printed, logged, or Debug-displayed
    password: String,
}

impl CredentialRecord {
    pub fn new(id: Uuid, name: String, username: String, password: String) -> Self {
        Self {
            id,
            name,
            username,
            password,
        }
    }

    /// Access the stored password. Callers decide whether it may be
    /// shown; nothing else in the crate prints it.
    pub fn password(&self) -> &str {
        &self.password
    }
}

/// Custom Debug implementation that never reveals the password.
impl fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Human-readable summary without the password.
impl fmt::Display for CredentialRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} ({})", self.id, self.name, self.username)
    }
}

/// Input struct for creating a new credential.
pub struct NewCredential {
    pub name: String,
    pub username: String,
    pub password: String,
}

/// Ordered list of credential records; insertion order is display
/// order. Ids are pairwise distinct.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialList {
    records: Vec<CredentialRecord>,
}

impl CredentialList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list from parsed records, dropping any record whose id
    /// was already seen (first occurrence wins). A stored payload can
    /// only violate the distinct-id invariant if it was produced by
    /// something other than this crate.
    pub fn from_records(records: Vec<CredentialRecord>) -> Self {
        let mut list = Self::new();
        for record in records {
            if list.contains_id(&record.id) {
                tracing::warn!(
                    credential_id = %record.id,
                    "dropping stored record with duplicate id"
                );
                continue;
            }
            list.records.push(record);
        }
        list
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[CredentialRecord] {
        &self.records
    }

    pub fn contains_id(&self, id: &Uuid) -> bool {
        self.records.iter().any(|r| r.id == *id)
    }

    pub fn get(&self, id: &Uuid) -> Option<&CredentialRecord> {
        self.records.iter().find(|r| r.id == *id)
    }

    /// Append a record. The caller guarantees the id is fresh.
    pub(crate) fn push(&mut self, record: CredentialRecord) {
        debug_assert!(!self.contains_id(&record.id));
        self.records.push(record);
    }

    /// Remove the record with the given id, returning it together with
    /// the position it occupied (so a failed persist can restore it).
    pub(crate) fn remove_by_id(&mut self, id: &Uuid) -> Option<(usize, CredentialRecord)> {
        let index = self.records.iter().position(|r| r.id == *id)?;
        Some((index, self.records.remove(index)))
    }

    /// Reinsert a record at its original position.
    pub(crate) fn insert_at(&mut self, index: usize, record: CredentialRecord) {
        self.records.insert(index, record);
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
