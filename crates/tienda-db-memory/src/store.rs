use std::sync::Arc;

use async_trait::async_trait;
use papaya::HashMap as PapayaHashMap;

use tienda_storage::{DocumentStore, Payload, StorageError, StoredDocument};

pub type StorageKey = String; // Format: "collection/storage_id"

pub(crate) fn make_storage_key(collection: &str, storage_id: &str) -> StorageKey {
    format!("{collection}/{storage_id}")
}

/// In-memory document store backend using papaya lock-free HashMap.
///
/// Storage identifiers are uuid-v4 strings assigned at creation.
/// `fetch_all` returns documents in ascending storage-id order so the
/// enumeration order callers scan over is deterministic.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    /// Main storage using papaya for lock-free concurrent access
    data: Arc<PapayaHashMap<StorageKey, Payload>>,
}

impl InMemoryStore {
    /// Creates a new, empty in-memory store.
    pub fn new() -> Self {
        Self {
            data: Arc::new(PapayaHashMap::new()),
        }
    }

    /// Inserts a document under a caller-chosen storage identifier.
    ///
    /// Primarily for seeding test fixtures with known identifiers.
    pub fn insert_with_id(&self, collection: &str, storage_id: &str, payload: Payload) {
        let guard = self.data.pin();
        guard.insert(make_storage_key(collection, storage_id), payload);
    }

    /// Number of documents in the given collection.
    pub fn count(&self, collection: &str) -> usize {
        let prefix = format!("{collection}/");
        let guard = self.data.pin();
        guard.iter().filter(|(key, _)| key.starts_with(&prefix)).count()
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn fetch_by_storage_id(
        &self,
        collection: &str,
        storage_id: &str,
    ) -> Result<Option<StoredDocument>, StorageError> {
        let key = make_storage_key(collection, storage_id);
        let guard = self.data.pin();
        Ok(guard
            .get(&key)
            .map(|payload| StoredDocument::new(storage_id, payload.clone())))
    }

    async fn fetch_all(&self, collection: &str) -> Result<Vec<StoredDocument>, StorageError> {
        let prefix = format!("{collection}/");
        let guard = self.data.pin();
        let mut documents: Vec<StoredDocument> = guard
            .iter()
            .filter(|(key, _)| key.starts_with(&prefix))
            .map(|(key, payload)| StoredDocument::new(&key[prefix.len()..], payload.clone()))
            .collect();
        // papaya iteration order is arbitrary; sort so enumeration is stable.
        documents.sort_by(|a, b| a.storage_id.cmp(&b.storage_id));
        Ok(documents)
    }

    async fn create(
        &self,
        collection: &str,
        payload: Payload,
    ) -> Result<StoredDocument, StorageError> {
        let storage_id = uuid::Uuid::new_v4().to_string();
        let key = make_storage_key(collection, &storage_id);

        let guard = self.data.pin();
        if guard.get(&key).is_some() {
            // uuid-v4 collision; treat as a store fault rather than retrying.
            return Err(StorageError::internal(format!(
                "storage id collision in {collection}: {storage_id}"
            )));
        }
        guard.insert(key, payload.clone());

        Ok(StoredDocument::new(storage_id, payload))
    }

    async fn merge_fields(
        &self,
        collection: &str,
        storage_id: &str,
        patch: &Payload,
    ) -> Result<(), StorageError> {
        let key = make_storage_key(collection, storage_id);
        let guard = self.data.pin();

        let existing = guard
            .get(&key)
            .ok_or_else(|| StorageError::not_found(collection, storage_id))?;

        // Field-level overwrite: patch keys win (explicit null included),
        // everything else stays as stored.
        let mut merged = existing.clone();
        for (field, value) in patch {
            merged.insert(field.clone(), value.clone());
        }
        guard.insert(key, merged);

        Ok(())
    }

    async fn delete(&self, collection: &str, storage_id: &str) -> Result<(), StorageError> {
        let key = make_storage_key(collection, storage_id);
        let guard = self.data.pin();
        guard
            .remove(&key)
            .ok_or_else(|| StorageError::not_found(collection, storage_id))?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
