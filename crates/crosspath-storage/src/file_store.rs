//! File-per-key store with atomic replacement.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use crosspath_core::error::{StorageError, StorageResult};
use crosspath_core::traits::KeyValueStore;

/// [`KeyValueStore`] backed by one file per key inside a root directory.
///
/// Writes land in a temporary sibling file first and are renamed into place,
/// so a reader observes either the prior value or the new one, never a
/// partial write. A missing file reads as `None`: absence is a valid state.
///
/// Callers provide the single-writer-per-key discipline the contract
/// assumes; the backend does not coordinate concurrent writers.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    root: PathBuf,
}

impl FileKeyValueStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    ///
    /// # Errors
    /// `StorageError::OpenFailed` when the directory cannot be created.
    pub async fn open(root: impl Into<PathBuf>) -> StorageResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)
            .await
            .map_err(|e| StorageError::OpenFailed {
                path: root.display().to_string(),
                message: e.to_string(),
            })?;
        debug!(root = %root.display(), "opened file store");
        Ok(Self { root })
    }

    /// The directory this store writes into.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> StorageResult<PathBuf> {
        // Keys become file names; anything that could escape the root or
        // collide with the temp suffix is rejected.
        let acceptable = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !acceptable {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(key))
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> StorageResult<Option<Vec<u8>>> {
        let path = self.path_for(key)?;
        match fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::ReadFailed {
                key: key.to_string(),
                message: e.to_string(),
            }),
        }
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> StorageResult<()> {
        let path = self.path_for(key)?;
        let staging = path.with_extension("tmp");

        let write_failed = |e: std::io::Error| StorageError::WriteFailed {
            key: key.to_string(),
            message: e.to_string(),
        };
        fs::write(&staging, &value).await.map_err(write_failed)?;
        fs::rename(&staging, &path).await.map_err(write_failed)?;
        debug!(key, bytes = value.len(), "persisted value");
        Ok(())
    }
}
