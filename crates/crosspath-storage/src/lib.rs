//! File-backed persistence for the crosspath location ledger.
//!
//! Provides [`FileKeyValueStore`], the production implementation of the
//! [`KeyValueStore`](crosspath_core::traits::KeyValueStore) contract: one
//! file per key inside a root directory, with atomic replacement on write.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use crosspath_core::config::CurationConfig;
//! use crosspath_core::history::LocationHistoryStore;
//! use crosspath_storage::FileKeyValueStore;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> crosspath_core::error::StorageResult<()> {
//! # let dir = tempfile::tempdir().unwrap();
//! let store = Arc::new(FileKeyValueStore::open(dir.path()).await?);
//! let history = LocationHistoryStore::new(store, CurationConfig::default());
//! assert!(history.history().await.is_empty());
//! # Ok(())
//! # }
//! ```

mod file_store;

pub use file_store::FileKeyValueStore;

// Re-export the error surface of the contract this crate implements.
pub use crosspath_core::error::{StorageError, StorageResult};
