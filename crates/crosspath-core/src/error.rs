//! Error types for crosspath-core.
//!
//! Two layers of errors:
//!
//! - [`StorageError`]: the error surface of the [`KeyValueStore`] persistence
//!   contract. Backend crates construct these; the core never inspects more
//!   than the variant.
//! - [`CoreError`]: unified crate error, with `From` conversions from the
//!   storage and serialization layers.
//!
//! No error in this crate is fatal to the calling application. The history
//! store and the intersection engine deliberately swallow storage failures at
//! their fire-and-forget entry points (logging via `tracing`) and only the
//! `try_*` variants propagate.
//!
//! [`KeyValueStore`]: crate::traits::KeyValueStore

use thiserror::Error;

/// Errors produced by [`KeyValueStore`](crate::traits::KeyValueStore)
/// implementations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Storage backend failed to open or initialize.
    #[error("Failed to open store at '{path}': {message}")]
    OpenFailed {
        /// Location the backend attempted to open
        path: String,
        /// Underlying error message
        message: String,
    },

    /// Read operation failed.
    #[error("Read failed for key '{key}': {message}")]
    ReadFailed {
        /// Key being read
        key: String,
        /// Underlying error message
        message: String,
    },

    /// Write operation failed.
    #[error("Write failed for key '{key}': {message}")]
    WriteFailed {
        /// Key being written
        key: String,
        /// Underlying error message
        message: String,
    },

    /// Key is not acceptable to the backend.
    #[error("Invalid storage key '{0}'")]
    InvalidKey(String),
}

/// Convenient Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Unified error type for crosspath-core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Persistence backend failure.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Serialization or deserialization of a persisted value failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration rejected by validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Serialization(e.to_string())
    }
}

/// Convenient Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
