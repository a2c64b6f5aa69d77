//! # tienda-storage
//!
//! Document store abstraction layer for the tienda server.
//!
//! This crate defines the traits and types that all storage backends must
//! implement. It does not contain any implementations - those are provided by
//! separate crates (e.g. `tienda-db-memory`).
//!
//! ## Overview
//!
//! The main trait is [`DocumentStore`], which defines the contract for:
//! - point lookup by storage identifier
//! - whole-collection enumeration
//! - creation with store-assigned identifiers
//! - field-level merge updates
//! - deletion
//!
//! ## Storage Backends
//!
//! To implement a storage backend, implement the [`DocumentStore`] trait:
//!
//! ```ignore
//! use async_trait::async_trait;
//! use tienda_storage::{DocumentStore, Payload, StorageError, StoredDocument};
//!
//! struct MyStore {
//!     // ...
//! }
//!
//! #[async_trait]
//! impl DocumentStore for MyStore {
//!     async fn fetch_by_storage_id(
//!         &self,
//!         collection: &str,
//!         storage_id: &str,
//!     ) -> Result<Option<StoredDocument>, StorageError> {
//!         // Implementation
//!     }
//!     // ... other methods
//! }
//! ```

mod error;
mod traits;
mod types;

pub use error::{ErrorCategory, StorageError};
pub use traits::DocumentStore;
pub use types::{Payload, StoredDocument};

/// Type alias for a storage result.
pub type StorageResult<T> = Result<T, StorageError>;

/// Type alias for a shared storage trait object.
pub type DynStore = std::sync::Arc<dyn DocumentStore>;
