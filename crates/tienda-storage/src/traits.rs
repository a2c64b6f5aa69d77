//! Storage traits for the document store abstraction layer.

use async_trait::async_trait;

use crate::error::StorageError;
use crate::types::{Payload, StoredDocument};

/// The contract every document store backend must implement.
///
/// A backend manages named collections of documents. Each document gets a
/// store-assigned storage identifier at creation; writes are always
/// field-level merges, never full replacement. Implementations must be
/// thread-safe (`Send + Sync`).
///
/// Connection setup, credentials and collection schema are the backend's own
/// concern; callers receive an already-initialized store.
///
/// # Example
///
/// ```ignore
/// use tienda_storage::{DocumentStore, StorageError, StoredDocument};
///
/// async fn get_client(
///     store: &dyn DocumentStore,
///     id: &str,
/// ) -> Result<Option<StoredDocument>, StorageError> {
///     store.fetch_by_storage_id("clients", id).await
/// }
/// ```
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetches the document whose storage identifier equals `storage_id`.
    ///
    /// Returns `None` if no such document exists.
    ///
    /// # Errors
    ///
    /// Returns an error only for infrastructure issues, not for absence.
    async fn fetch_by_storage_id(
        &self,
        collection: &str,
        storage_id: &str,
    ) -> Result<Option<StoredDocument>, StorageError>;

    /// Fetches every document in the collection.
    ///
    /// Enumeration order is backend-defined but must be deterministic, so
    /// that callers scanning for the first match get a stable answer.
    ///
    /// # Errors
    ///
    /// Returns an error for infrastructure issues.
    async fn fetch_all(&self, collection: &str) -> Result<Vec<StoredDocument>, StorageError>;

    /// Creates a new document with a store-assigned storage identifier.
    ///
    /// # Errors
    ///
    /// Returns an error for infrastructure issues.
    async fn create(
        &self,
        collection: &str,
        payload: Payload,
    ) -> Result<StoredDocument, StorageError>;

    /// Merges `patch` into an existing document, field by field.
    ///
    /// Only fields present in `patch` are written; fields absent from it are
    /// left untouched. A field present with JSON `null` is written as `null`
    /// (explicit null is a valid target value, not a no-op).
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the document does not exist.
    async fn merge_fields(
        &self,
        collection: &str,
        storage_id: &str,
        patch: &Payload,
    ) -> Result<(), StorageError>;

    /// Deletes a document by storage identifier.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the document does not exist.
    async fn delete(&self, collection: &str, storage_id: &str) -> Result<(), StorageError>;

    /// Returns the name of this storage backend for logging/debugging.
    fn backend_name(&self) -> &'static str;
}
