//! In-memory stub implementation of `KeyValueStore`.
//!
//! # WARNING: TEST ONLY - DO NOT USE IN PRODUCTION
//!
//! Holds all values in a `DashMap`; everything is lost on drop. Production
//! code should use `FileKeyValueStore` from `crosspath-storage`.
//!
//! Carries fault-injection switches so the swallow-and-log error policies of
//! the history store and engine can be exercised without a real failing
//! backend.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;

use crate::error::{StorageError, StorageResult};
use crate::traits::KeyValueStore;

/// In-memory implementation of [`KeyValueStore`].
///
/// # WARNING: TEST ONLY - DO NOT USE IN PRODUCTION
#[derive(Debug, Default)]
pub struct InMemoryKeyValueStore {
    data: DashMap<String, Vec<u8>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl InMemoryKeyValueStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `get` fail with `StorageError::ReadFailed`.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent `put` fail with `StorageError::WriteFailed`.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn get(&self, key: &str) -> StorageResult<Option<Vec<u8>>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::ReadFailed {
                key: key.to_string(),
                message: "injected read failure".to_string(),
            });
        }
        Ok(self.data.get(key).map(|entry| entry.value().clone()))
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> StorageResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::WriteFailed {
                key: key.to_string(),
                message: "injected write failure".to_string(),
            });
        }
        self.data.insert(key.to_string(), value);
        Ok(())
    }
}
