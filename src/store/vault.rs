// Passbox credential vault.
//
// Owns the authoritative in-memory credential list and mirrors it to
// the secure backend after every mutation. The whole list is one JSON
// document under a single fixed key; there are no partial updates.
// Every mutate-then-persist sequence runs under one async lock, so
// rapid successive mutations serialize instead of racing.

use tokio::sync::Mutex;
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::backend::SecureBackend;

use super::models::{CredentialList, CredentialRecord, NewCredential};
use super::StoreError;

/// Storage key holding the serialized credential list.
pub const STORE_KEY: &str = "credentials";

/// The credential store. Hydrated once at startup; the in-memory list
/// is the single source of truth for the rest of the session, with the
/// backend as its durable mirror.
pub struct Vault<B: SecureBackend> {
    backend: B,
    records: Mutex<CredentialList>,
    recovered_from_corruption: bool,
}

impl<B: SecureBackend> Vault<B> {
    /// Hydrate the vault from the backend.
    ///
    /// An absent key yields an empty list. A payload that fails to
    /// parse is a recoverable condition: the vault starts empty and
    /// `recovered_from_corruption()` is set so the presentation layer
    /// can tell the user. The unreadable payload stays in the backend
    /// untouched until the next successful mutation overwrites it.
    /// A backend read failure is a hard error.
    pub fn open(backend: B) -> Result<Self, StoreError> {
        let (records, recovered) = match backend.get(STORE_KEY)? {
            None => (CredentialList::new(), false),
            Some(payload) => match serde_json::from_str::<Vec<CredentialRecord>>(&payload) {
                Ok(parsed) => (CredentialList::from_records(parsed), false),
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        "stored credential data is unreadable, starting with an empty list"
                    );
                    (CredentialList::new(), true)
                }
            },
        };

        tracing::debug!(count = records.len(), "credential vault hydrated");

        Ok(Self {
            backend,
            records: Mutex::new(records),
            recovered_from_corruption: recovered,
        })
    }

    /// True when hydration found a stored payload it could not parse.
    pub fn recovered_from_corruption(&self) -> bool {
        self.recovered_from_corruption
    }

    /// Snapshot of the current list, in insertion order.
    pub async fn records(&self) -> Vec<CredentialRecord> {
        self.records.lock().await.records().to_vec()
    }

    /// Look up a single record by id.
    pub async fn get(&self, id: &Uuid) -> Option<CredentialRecord> {
        self.records.lock().await.get(id).cloned()
    }

    /// Append a new credential and persist the full list.
    ///
    /// A fresh v4 id is assigned (regenerated on the off chance it
    /// collides with an existing one). If the persist fails, the
    /// append is rolled back before the error is returned, so the
    /// in-memory list never diverges from durable state.
    pub async fn add(&self, new: NewCredential) -> Result<CredentialRecord, StoreError> {
        let mut records = self.records.lock().await;

        let mut id = Uuid::new_v4();
        while records.contains_id(&id) {
            id = Uuid::new_v4();
        }

        let record = CredentialRecord::new(id, new.name, new.username, new.password);
        records.push(record.clone());

        if let Err(e) = self.write_back(&records) {
            let _ = records.remove_by_id(&id);
            return Err(e);
        }

        tracing::info!(credential_id = %id, "credential stored");
        Ok(record)
    }

    /// Remove the credential with the given id and persist the full
    /// list. Returns `Ok(false)` without touching the backend when no
    /// record matches. If the persist fails, the record is restored at
    /// its original position before the error is returned.
    pub async fn remove(&self, id: &Uuid) -> Result<bool, StoreError> {
        let mut records = self.records.lock().await;

        let Some((index, record)) = records.remove_by_id(id) else {
            tracing::debug!(credential_id = %id, "no credential to remove");
            return Ok(false);
        };

        if let Err(e) = self.write_back(&records) {
            records.insert_at(index, record);
            return Err(e);
        }

        tracing::info!(credential_id = %id, "credential deleted");
        Ok(true)
    }

    /// Re-serialize the current list and write it to the backend.
    /// The mutating operations do this internally on every change;
    /// calling it directly is the retry affordance after a reported
    /// write failure.
    pub async fn persist(&self) -> Result<(), StoreError> {
        let records = self.records.lock().await;
        self.write_back(&records)
    }

    /// Serialize the full list and overwrite the storage key.
    fn write_back(&self, records: &CredentialList) -> Result<(), StoreError> {
        let payload = Zeroizing::new(serde_json::to_string(records)?);
        self.backend.set(STORE_KEY, &payload)?;
        Ok(())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MockBackend;

    fn fields(name: &str, username: &str, password: &str) -> NewCredential {
        NewCredential {
            name: name.to_string(),
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_open_empty_backend_yields_empty_list() {
        let vault = Vault::open(MockBackend::new()).unwrap();
        assert!(vault.records().await.is_empty());
        assert!(!vault.recovered_from_corruption());
    }

    #[tokio::test]
    async fn test_add_returns_record_with_fresh_v4_id() {
        let vault = Vault::open(MockBackend::new()).unwrap();

        let record = vault.add(fields("Bank", "me@x.com", "p1")).await.unwrap();
        assert_eq!(record.id.get_version(), Some(uuid::Version::Random));
        assert_eq!(record.name, "Bank");
        assert_eq!(record.username, "me@x.com");
        assert_eq!(record.password(), "p1");
    }

    #[tokio::test]
    async fn test_add_appends_at_tail_preserving_prefix() {
        let vault = Vault::open(MockBackend::new()).unwrap();

        vault.add(fields("A", "a", "1")).await.unwrap();
        vault.add(fields("B", "b", "2")).await.unwrap();
        let before = vault.records().await;

        let added = vault.add(fields("C", "c", "3")).await.unwrap();
        let after = vault.records().await;

        assert_eq!(after.len(), before.len() + 1);
        assert_eq!(&after[..before.len()], &before[..], "prefix unchanged");
        assert_eq!(after.last().unwrap(), &added);
        assert!(
            !before.iter().any(|r| r.id == added.id),
            "the new id must not be present in the prior list"
        );
    }

    #[tokio::test]
    async fn test_each_mutation_is_one_backend_write() {
        let backend = MockBackend::new();
        let vault = Vault::open(backend.clone()).unwrap();

        let record = vault.add(fields("A", "a", "1")).await.unwrap();
        assert_eq!(backend.write_count(), 1);

        vault.remove(&record.id).await.unwrap();
        assert_eq!(backend.write_count(), 2);
    }

    #[tokio::test]
    async fn test_remove_existing_record() {
        let vault = Vault::open(MockBackend::new()).unwrap();

        let a = vault.add(fields("A", "a", "1")).await.unwrap();
        let b = vault.add(fields("B", "b", "2")).await.unwrap();

        assert!(vault.remove(&a.id).await.unwrap());

        let remaining = vault.records().await;
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, b.id);
        assert!(!remaining.iter().any(|r| r.id == a.id));
    }

    #[tokio::test]
    async fn test_remove_absent_id_is_noop_without_write() {
        let backend = MockBackend::new();
        let vault = Vault::open(backend.clone()).unwrap();

        vault.add(fields("A", "a", "1")).await.unwrap();
        let before = vault.records().await;
        let writes_before = backend.write_count();

        let removed = vault.remove(&Uuid::new_v4()).await.unwrap();

        assert!(!removed);
        assert_eq!(vault.records().await, before, "list unchanged");
        assert_eq!(backend.write_count(), writes_before, "no backend write");
    }

    #[tokio::test]
    async fn test_round_trip_through_backend() {
        let backend = MockBackend::new();
        let vault = Vault::open(backend.clone()).unwrap();

        vault.add(fields("Bank", "me@x.com", "p1")).await.unwrap();
        vault.add(fields("Mail", "me@y.com", "p2")).await.unwrap();
        vault.add(fields("", "", "")).await.unwrap();
        let written = vault.records().await;

        // A fresh vault over the same backend sees the same records,
        // in the same order, with the same ids.
        let reopened = Vault::open(backend).unwrap();
        assert_eq!(reopened.records().await, written);
    }

    #[tokio::test]
    async fn test_unparseable_payload_recovers_to_empty_list() {
        let backend = MockBackend::with_payload(STORE_KEY, "definitely not json");
        let vault = Vault::open(backend).unwrap();

        assert!(vault.records().await.is_empty());
        assert!(vault.recovered_from_corruption());
    }

    #[tokio::test]
    async fn test_corrupt_payload_survives_until_next_write() {
        let backend = MockBackend::with_payload(STORE_KEY, "{broken");
        let vault = Vault::open(backend.clone()).unwrap();

        // Hydration alone must not destroy the stored value
        assert_eq!(backend.raw_value(STORE_KEY).unwrap(), "{broken");

        // The first successful mutation replaces it with valid data
        vault.add(fields("A", "a", "1")).await.unwrap();
        let raw = backend.raw_value(STORE_KEY).unwrap();
        let parsed: Vec<CredentialRecord> = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_persist_rolls_back_add() {
        let backend = MockBackend::new();
        let vault = Vault::open(backend.clone()).unwrap();
        vault.add(fields("A", "a", "1")).await.unwrap();
        let before = vault.records().await;

        backend.set_fail_writes(true);
        let result = vault.add(fields("B", "b", "2")).await;

        assert!(result.is_err(), "add must report the write failure");
        assert_eq!(
            vault.records().await,
            before,
            "the failed append must be rolled back"
        );
    }

    #[tokio::test]
    async fn test_failed_persist_rolls_back_remove() {
        let backend = MockBackend::new();
        let vault = Vault::open(backend.clone()).unwrap();
        vault.add(fields("A", "a", "1")).await.unwrap();
        let b = vault.add(fields("B", "b", "2")).await.unwrap();
        vault.add(fields("C", "c", "3")).await.unwrap();
        let before = vault.records().await;

        backend.set_fail_writes(true);
        let result = vault.remove(&b.id).await;

        assert!(result.is_err(), "remove must report the write failure");
        assert_eq!(
            vault.records().await,
            before,
            "the removed record must be restored at its original position"
        );
    }

    #[tokio::test]
    async fn test_persist_retries_after_a_failed_write() {
        let backend = MockBackend::new();
        let vault = Vault::open(backend.clone()).unwrap();
        vault.add(fields("A", "a", "1")).await.unwrap();

        backend.set_fail_writes(true);
        assert!(vault.add(fields("B", "b", "2")).await.is_err());

        // Once the backend recovers, an explicit persist writes the
        // current (rolled back) list.
        backend.set_fail_writes(false);
        vault.persist().await.unwrap();

        let raw = backend.raw_value(STORE_KEY).unwrap();
        let parsed: Vec<CredentialRecord> = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].name, "A");
    }

    #[tokio::test]
    async fn test_stored_duplicate_ids_are_dropped_on_hydrate() {
        let id = Uuid::new_v4();
        let payload = serde_json::json!([
            {"id": id.to_string(), "name": "First", "username": "a", "password": "p1"},
            {"id": id.to_string(), "name": "Second", "username": "b", "password": "p2"},
        ])
        .to_string();
        let backend = MockBackend::with_payload(STORE_KEY, &payload);

        let vault = Vault::open(backend).unwrap();
        let records = vault.records().await;

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "First");
        assert!(!vault.recovered_from_corruption());
    }

    #[tokio::test]
    async fn test_add_show_remove_scenario() {
        let backend = MockBackend::new();
        let vault = Vault::open(backend.clone()).unwrap();
        assert!(vault.records().await.is_empty());

        let record = vault.add(fields("Bank", "me@x.com", "p1")).await.unwrap();
        assert!(!record.id.to_string().is_empty());

        let loaded = Vault::open(backend.clone()).unwrap().records().await;
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name, "Bank");
        assert_eq!(loaded[0].username, "me@x.com");
        assert_eq!(loaded[0].password(), "p1");

        assert!(vault.remove(&record.id).await.unwrap());
        assert!(Vault::open(backend).unwrap().records().await.is_empty());
    }
}
