//! Crosspath core library.
//!
//! Provides the on-device location-history ledger and the spatio-temporal
//! exposure matching engine for a contact-tracing application.
//!
//! # Architecture
//!
//! This crate defines:
//! - Domain types (`Point`, `TrailStats`, `ExposureBins`)
//! - The `KeyValueStore` persistence contract and its logical keys
//! - `LocationHistoryStore`: curation policy for the user's own GPS trail
//!   (throttling, retention trimming, stationary backfill)
//! - `IntersectionEngine`: proximity matching between the user's trail and an
//!   externally supplied "concern" trail, binned by days-ago
//! - Normalization of loosely typed external point records
//! - Error types and result aliases
//!
//! Persistence backends live in `crosspath-storage`; this crate ships an
//! in-memory stub for tests.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use crosspath_core::config::CurationConfig;
//! use crosspath_core::history::LocationHistoryStore;
//! use crosspath_core::stubs::InMemoryKeyValueStore;
//! use crosspath_core::types::RawFix;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let store = Arc::new(InMemoryKeyValueStore::new());
//! let history = LocationHistoryStore::new(store, CurationConfig::default());
//! history.append(RawFix { time: 1_583_696_413_000.0, latitude: 37.42, longitude: -122.08 }).await;
//! assert_eq!(history.stats().await.count, 1);
//! # }
//! ```

pub mod config;
pub mod error;
pub mod history;
pub mod intersect;
pub mod normalize;
pub mod stubs;
pub mod traits;
pub mod types;

// Re-exports for convenience
pub use config::{CurationConfig, MatchingConfig};
pub use error::{CoreError, CoreResult, StorageError, StorageResult};
pub use history::{AppendOutcome, LocationHistoryStore, MergeOutcome};
pub use intersect::{intersect_trails, IntersectionEngine, IntersectionReport};
pub use normalize::{normalize, parse_record, Normalized, RejectionReason};
pub use traits::{keys, KeyValueStore};
pub use types::{AgeBreakdown, ExposureBins, Point, RawFix, TrailStats, DAY_BIN_COUNT};
