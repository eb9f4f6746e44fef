//! Persistence contract for the ledger.
//!
//! The core needs exactly two operations from its storage collaborator:
//! `get(key) -> bytes | None` and `put(key, bytes)`. Values are JSON
//! documents produced by the store and engine; backends treat them as opaque
//! bytes.
//!
//! # Design
//!
//! - Object-safe: consumed as `Arc<dyn KeyValueStore>` so the history store
//!   and engine stay backend-agnostic.
//! - `Send + Sync` required for cross-task usage.
//! - Absence of a key is a valid state (`Ok(None)`), not an error.
//! - Single-writer-at-a-time per key is assumed by callers; backends are not
//!   required to coordinate concurrent writers themselves.
//!
//! # Implementors
//!
//! - `FileKeyValueStore` (crosspath-storage): production file-per-key backend
//! - [`InMemoryKeyValueStore`](crate::stubs::InMemoryKeyValueStore): test stub

use async_trait::async_trait;

use crate::error::StorageResult;

/// Logical key names, byte-for-byte those of the reference system.
pub mod keys {
    /// The curated trail of the device user's own points: a JSON array of
    /// `{"time", "latitude", "longitude"}` objects.
    pub const LOCATION_DATA: &str = "LOCATION_DATA";

    /// The most recent intersection result: a JSON array of 28 integers.
    pub const CROSSED_PATHS: &str = "CROSSED_PATHS";
}

/// Async get/set store keyed by string, holding JSON-serialized values.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// Returns `Ok(None)` when the key has never been written.
    ///
    /// # Errors
    /// `StorageError::ReadFailed` when the backend cannot be read;
    /// `StorageError::InvalidKey` when the backend rejects the key.
    async fn get(&self, key: &str) -> StorageResult<Option<Vec<u8>>>;

    /// Replace the value stored under `key`.
    ///
    /// The replacement is atomic from a reader's point of view: a concurrent
    /// `get` observes either the prior value or the new one, never a partial
    /// write.
    ///
    /// # Errors
    /// `StorageError::WriteFailed` when the backend cannot persist;
    /// `StorageError::InvalidKey` when the backend rejects the key.
    async fn put(&self, key: &str, value: Vec<u8>) -> StorageResult<()>;
}
