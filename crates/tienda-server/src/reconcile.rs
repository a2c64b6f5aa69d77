//! Identifier reconciliation over a [`DocumentStore`].
//!
//! Callers address documents by an identifier that may be either the
//! store-assigned storage id or the logical `id` field carried inside the
//! payload. Updates resolve the identifier in two phases: a direct storage-id
//! lookup first, then a full-collection scan matching the payload `id` with
//! the loose string/number equality described on [`logical_id_matches`].
//! Deletes resolve by storage id only.

use serde_json::Value;
use tienda_storage::{DynStore, Payload, StorageError, StoredDocument};

/// Result of an update: either the merged document as re-read from the
/// store, or no document resolved for the identifier. Absence is a normal
/// outcome, not an error; storage faults propagate as `Err`.
#[derive(Debug)]
pub enum UpdateOutcome {
    Updated(StoredDocument),
    NotFound,
}

/// Result of a delete. `Deleted` carries the payload the document had at
/// the time of the existence check.
#[derive(Debug)]
pub enum DeleteOutcome {
    Deleted(Payload),
    NotFound,
}

/// Repository for one collection, generic over the storage backend.
#[derive(Clone)]
pub struct ResourceRepository {
    store: DynStore,
    collection: &'static str,
}

impl ResourceRepository {
    pub fn new(store: DynStore, collection: &'static str) -> Self {
        Self { store, collection }
    }

    pub fn collection(&self) -> &'static str {
        self.collection
    }

    pub async fn list(&self) -> Result<Vec<StoredDocument>, StorageError> {
        self.store.fetch_all(self.collection).await
    }

    pub async fn get(&self, storage_id: &str) -> Result<Option<StoredDocument>, StorageError> {
        self.store.fetch_by_storage_id(self.collection, storage_id).await
    }

    pub async fn create(&self, payload: Payload) -> Result<StoredDocument, StorageError> {
        self.store.create(self.collection, payload).await
    }

    /// Merges `patch` into the document addressed by `candidate_id`.
    ///
    /// Resolution: direct storage-id lookup first; on a miss, scan the
    /// collection for the first document (ascending storage-id order) whose
    /// payload `id` matches the candidate. The scan is skipped entirely when
    /// the direct lookup hits. After the merge the document is re-read so the
    /// returned state is what the store actually holds.
    pub async fn update(
        &self,
        candidate_id: &str,
        patch: Payload,
    ) -> Result<UpdateOutcome, StorageError> {
        let storage_id = match self.resolve(candidate_id).await? {
            Some(id) => id,
            None => return Ok(UpdateOutcome::NotFound),
        };

        self.store
            .merge_fields(self.collection, &storage_id, &patch)
            .await?;

        match self
            .store
            .fetch_by_storage_id(self.collection, &storage_id)
            .await?
        {
            Some(doc) => Ok(UpdateOutcome::Updated(doc)),
            // The merge succeeded, so absence here means the document was
            // removed out from under us.
            None => Err(StorageError::internal(format!(
                "document {}/{} vanished after merge",
                self.collection, storage_id
            ))),
        }
    }

    /// Deletes the document with storage id `candidate_id`. Unlike
    /// [`update`](Self::update), no logical-id fallback is attempted.
    pub async fn delete(&self, candidate_id: &str) -> Result<DeleteOutcome, StorageError> {
        let existing = match self
            .store
            .fetch_by_storage_id(self.collection, candidate_id)
            .await?
        {
            Some(doc) => doc,
            None => return Ok(DeleteOutcome::NotFound),
        };

        self.store.delete(self.collection, candidate_id).await?;
        Ok(DeleteOutcome::Deleted(existing.payload))
    }

    async fn resolve(&self, candidate_id: &str) -> Result<Option<String>, StorageError> {
        if let Some(doc) = self
            .store
            .fetch_by_storage_id(self.collection, candidate_id)
            .await?
        {
            return Ok(Some(doc.storage_id));
        }

        let documents = self.store.fetch_all(self.collection).await?;
        Ok(documents
            .into_iter()
            .find(|doc| {
                doc.logical_id()
                    .is_some_and(|id| logical_id_matches(id, candidate_id))
            })
            .map(|doc| doc.storage_id))
    }
}

/// Loose equality between a stored logical `id` and the caller's candidate.
///
/// A stored string matches on exact string equality. Failing that, the
/// candidate is parsed as f64 (a non-numeric candidate simply does not
/// match) and compared against the numeric reading of the stored value:
/// JSON numbers directly, numeric strings parsed. So a stored `3` matches
/// the candidate `"3"`, and a stored `"7"` matches `"7.0"`.
pub fn logical_id_matches(stored: &Value, candidate: &str) -> bool {
    if let Value::String(s) = stored {
        if s == candidate {
            return true;
        }
    }

    let Ok(candidate_num) = candidate.parse::<f64>() else {
        return false;
    };

    let stored_num = match stored {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse::<f64>().ok(),
        _ => None,
    };

    stored_num.is_some_and(|n| n == candidate_num)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::{json, Map};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tienda_db_memory::InMemoryStore;
    use tienda_storage::DocumentStore;

    fn payload(value: Value) -> Payload {
        match value {
            Value::Object(map) => map,
            _ => panic!("payload must be an object"),
        }
    }

    fn repo_with_store(store: Arc<InMemoryStore>) -> ResourceRepository {
        ResourceRepository::new(store, "products")
    }

    #[test]
    fn test_logical_id_matches_strings_and_numbers() {
        assert!(logical_id_matches(&json!("a1"), "a1"));
        assert!(logical_id_matches(&json!(3), "3"));
        assert!(logical_id_matches(&json!("3"), "3"));
        assert!(logical_id_matches(&json!(7), "7.0"));
        assert!(logical_id_matches(&json!("7"), "7.0"));
        assert!(!logical_id_matches(&json!("a1"), "a2"));
        assert!(!logical_id_matches(&json!(3), "three"));
        assert!(!logical_id_matches(&json!(null), "null"));
        assert!(!logical_id_matches(&json!(true), "true"));
    }

    #[tokio::test]
    async fn test_update_by_storage_id() {
        let store = Arc::new(InMemoryStore::new());
        store.insert_with_id("products", "p1", payload(json!({"name": "Mouse", "price": 10})));
        let repo = repo_with_store(store);

        let outcome = repo
            .update("p1", payload(json!({"price": 12})))
            .await
            .unwrap();
        match outcome {
            UpdateOutcome::Updated(doc) => {
                assert_eq!(doc.storage_id, "p1");
                assert_eq!(doc.payload["name"], json!("Mouse"));
                assert_eq!(doc.payload["price"], json!(12));
            }
            UpdateOutcome::NotFound => panic!("expected update"),
        }
    }

    #[tokio::test]
    async fn test_update_falls_back_to_logical_id() {
        let store = Arc::new(InMemoryStore::new());
        store.insert_with_id("products", "a1", payload(json!({"id": 3, "name": "Mouse"})));
        let repo = repo_with_store(store);

        // "3" is not a storage id, but document a1 carries logical id 3.
        let outcome = repo
            .update("3", payload(json!({"name": "Mouse2"})))
            .await
            .unwrap();
        match outcome {
            UpdateOutcome::Updated(doc) => {
                assert_eq!(doc.storage_id, "a1");
                assert_eq!(doc.payload["name"], json!("Mouse2"));
                assert_eq!(doc.payload["id"], json!(3));
            }
            UpdateOutcome::NotFound => panic!("expected fallback to resolve"),
        }
    }

    #[tokio::test]
    async fn test_update_prefers_storage_id_over_logical_id() {
        let store = Arc::new(InMemoryStore::new());
        // "x" is simultaneously a storage id and another document's logical id.
        store.insert_with_id("products", "x", payload(json!({"name": "Direct"})));
        store.insert_with_id("products", "y", payload(json!({"id": "x", "name": "Logical"})));
        let repo = repo_with_store(store);

        let outcome = repo.update("x", payload(json!({"hit": true}))).await.unwrap();
        match outcome {
            UpdateOutcome::Updated(doc) => assert_eq!(doc.storage_id, "x"),
            UpdateOutcome::NotFound => panic!("expected update"),
        }
    }

    #[tokio::test]
    async fn test_update_fallback_picks_lowest_storage_id() {
        let store = Arc::new(InMemoryStore::new());
        store.insert_with_id("products", "b", payload(json!({"id": 5, "name": "Second"})));
        store.insert_with_id("products", "a", payload(json!({"id": 5, "name": "First"})));
        let repo = repo_with_store(store);

        let outcome = repo.update("5", payload(json!({"seen": 1}))).await.unwrap();
        match outcome {
            UpdateOutcome::Updated(doc) => assert_eq!(doc.storage_id, "a"),
            UpdateOutcome::NotFound => panic!("expected update"),
        }
    }

    #[tokio::test]
    async fn test_update_not_found_is_not_an_error() {
        let store = Arc::new(InMemoryStore::new());
        store.insert_with_id("products", "p1", payload(json!({"id": 1})));
        let repo = repo_with_store(store);

        let outcome = repo.update("missing", payload(json!({"x": 1}))).await.unwrap();
        assert!(matches!(outcome, UpdateOutcome::NotFound));
        // The existing document is untouched.
        let doc = repo.get("p1").await.unwrap().unwrap();
        assert!(!doc.payload.contains_key("x"));
    }

    #[tokio::test]
    async fn test_update_omitted_fields_untouched_and_null_written() {
        let store = Arc::new(InMemoryStore::new());
        store.insert_with_id(
            "products",
            "p1",
            payload(json!({"name": "Mouse", "price": 10, "cantidad": 4})),
        );
        let repo = repo_with_store(store);

        let outcome = repo
            .update("p1", payload(json!({"price": null})))
            .await
            .unwrap();
        match outcome {
            UpdateOutcome::Updated(doc) => {
                assert_eq!(doc.payload["name"], json!("Mouse"));
                assert_eq!(doc.payload["cantidad"], json!(4));
                assert_eq!(doc.payload["price"], json!(null));
            }
            UpdateOutcome::NotFound => panic!("expected update"),
        }
    }

    #[tokio::test]
    async fn test_update_is_idempotent() {
        let store = Arc::new(InMemoryStore::new());
        store.insert_with_id("products", "p1", payload(json!({"name": "Mouse"})));
        let repo = repo_with_store(store);

        let patch = payload(json!({"price": 99}));
        let first = repo.update("p1", patch.clone()).await.unwrap();
        let second = repo.update("p1", patch).await.unwrap();
        let (UpdateOutcome::Updated(a), UpdateOutcome::Updated(b)) = (first, second) else {
            panic!("expected both updates to resolve");
        };
        assert_eq!(a.payload, b.payload);
    }

    #[tokio::test]
    async fn test_delete_does_not_fall_back_to_logical_id() {
        let store = Arc::new(InMemoryStore::new());
        store.insert_with_id("products", "a1", payload(json!({"id": 3, "name": "Mouse"})));
        let repo = repo_with_store(store.clone());

        // Update resolves "3" via the logical id; delete must not.
        let outcome = repo.delete("3").await.unwrap();
        assert!(matches!(outcome, DeleteOutcome::NotFound));
        assert_eq!(store.count("products"), 1);

        let outcome = repo.delete("a1").await.unwrap();
        match outcome {
            DeleteOutcome::Deleted(p) => assert_eq!(p["name"], json!("Mouse")),
            DeleteOutcome::NotFound => panic!("expected delete by storage id"),
        }
        assert_eq!(store.count("products"), 0);
    }

    /// Store wrapper counting `fetch_all` calls, to prove the direct-hit
    /// path never scans the collection.
    struct CountingStore {
        inner: InMemoryStore,
        scans: AtomicUsize,
    }

    #[async_trait]
    impl DocumentStore for CountingStore {
        async fn fetch_by_storage_id(
            &self,
            collection: &str,
            storage_id: &str,
        ) -> Result<Option<StoredDocument>, StorageError> {
            self.inner.fetch_by_storage_id(collection, storage_id).await
        }

        async fn fetch_all(&self, collection: &str) -> Result<Vec<StoredDocument>, StorageError> {
            self.scans.fetch_add(1, Ordering::SeqCst);
            self.inner.fetch_all(collection).await
        }

        async fn create(
            &self,
            collection: &str,
            payload: Payload,
        ) -> Result<StoredDocument, StorageError> {
            self.inner.create(collection, payload).await
        }

        async fn merge_fields(
            &self,
            collection: &str,
            storage_id: &str,
            patch: &Payload,
        ) -> Result<(), StorageError> {
            self.inner.merge_fields(collection, storage_id, patch).await
        }

        async fn delete(&self, collection: &str, storage_id: &str) -> Result<(), StorageError> {
            self.inner.delete(collection, storage_id).await
        }

        fn backend_name(&self) -> &'static str {
            "counting"
        }
    }

    #[tokio::test]
    async fn test_direct_hit_never_scans() {
        let counting = Arc::new(CountingStore {
            inner: InMemoryStore::new(),
            scans: AtomicUsize::new(0),
        });
        counting
            .inner
            .insert_with_id("products", "p1", payload(json!({"name": "Mouse"})));
        let repo = ResourceRepository::new(counting.clone(), "products");

        let outcome = repo.update("p1", payload(json!({"price": 5}))).await.unwrap();
        assert!(matches!(outcome, UpdateOutcome::Updated(_)));
        assert_eq!(counting.scans.load(Ordering::SeqCst), 0);

        // A miss scans exactly once.
        let outcome = repo.update("nope", payload(Map::new().into())).await;
        assert!(matches!(outcome, Ok(UpdateOutcome::NotFound)));
        assert_eq!(counting.scans.load(Ordering::SeqCst), 1);
    }

    /// Store that fails every call, to check faults propagate instead of
    /// collapsing into NotFound.
    struct FailingStore;

    #[async_trait]
    impl DocumentStore for FailingStore {
        async fn fetch_by_storage_id(
            &self,
            _collection: &str,
            _storage_id: &str,
        ) -> Result<Option<StoredDocument>, StorageError> {
            Err(StorageError::connection_error("backend down"))
        }

        async fn fetch_all(&self, _collection: &str) -> Result<Vec<StoredDocument>, StorageError> {
            Err(StorageError::connection_error("backend down"))
        }

        async fn create(
            &self,
            _collection: &str,
            _payload: Payload,
        ) -> Result<StoredDocument, StorageError> {
            Err(StorageError::connection_error("backend down"))
        }

        async fn merge_fields(
            &self,
            _collection: &str,
            _storage_id: &str,
            _patch: &Payload,
        ) -> Result<(), StorageError> {
            Err(StorageError::connection_error("backend down"))
        }

        async fn delete(&self, _collection: &str, _storage_id: &str) -> Result<(), StorageError> {
            Err(StorageError::connection_error("backend down"))
        }

        fn backend_name(&self) -> &'static str {
            "failing"
        }
    }

    #[tokio::test]
    async fn test_storage_failure_propagates() {
        let repo = ResourceRepository::new(Arc::new(FailingStore), "products");
        let err = repo
            .update("p1", payload(json!({"x": 1})))
            .await
            .expect_err("expected a storage error, not NotFound");
        assert!(matches!(err, StorageError::ConnectionError { .. }));

        let err = repo.delete("p1").await.expect_err("expected a storage error");
        assert!(matches!(err, StorageError::ConnectionError { .. }));
    }
}
