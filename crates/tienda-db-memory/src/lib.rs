//! # tienda-db-memory
//!
//! In-memory implementation of the [`tienda_storage::DocumentStore`] trait.
//!
//! Suitable for development, tests and small deployments; the whole dataset
//! lives in process memory with no durability.

mod store;

pub use store::InMemoryStore;
