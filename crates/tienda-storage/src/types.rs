//! Data types shared by the document store traits and their callers.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The open payload mapping of a document: field name to JSON value.
pub type Payload = Map<String, Value>;

/// A document as stored in a collection.
///
/// The storage identifier is assigned by the store at creation time and is
/// immutable and unique within its collection. The payload may carry its own
/// logical `id` field; the two are independent and frequently disagree.
///
/// On the wire the storage identifier is surfaced under the fixed key
/// `storageId`, distinct from any payload field, with the payload fields
/// flattened alongside it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredDocument {
    /// The store-assigned identifier of this document.
    #[serde(rename = "storageId")]
    pub storage_id: String,
    /// The document payload.
    #[serde(flatten)]
    pub payload: Payload,
}

impl StoredDocument {
    /// Creates a new `StoredDocument`.
    #[must_use]
    pub fn new(storage_id: impl Into<String>, payload: Payload) -> Self {
        Self {
            storage_id: storage_id.into(),
            payload,
        }
    }

    /// Returns the logical `id` field from the payload, if present.
    #[must_use]
    pub fn logical_id(&self) -> Option<&Value> {
        self.payload.get("id")
    }
}
