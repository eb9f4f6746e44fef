//! Curated append, read, and stats over the persisted trail.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::CurationConfig;
use crate::error::CoreResult;
use crate::traits::{keys, KeyValueStore};
use crate::types::{Point, RawFix, TrailStats};

/// What an append decided to do with a fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    /// The fix was stored, preceded by `backfilled` synthetic points.
    Saved {
        /// Synthetic stationary points inserted before the fix.
        backfilled: usize,
    },
    /// The fix arrived sooner than the save floor allows and was discarded.
    Throttled,
}

/// Single authority for reading and writing the user's own curated trail.
///
/// Appends run the full curation policy: throttle below the save floor, trim
/// beyond the retention window, backfill stationary gaps, then persist the
/// whole array. The read-modify-write cycle is serialized through an internal
/// single-writer lock, so overlapping appends cannot lose each other's
/// curation.
///
/// Fire-and-forget entry points ([`append`](Self::append),
/// [`history`](Self::history)) swallow storage failures after logging them;
/// continuous telemetry tolerates a lost fix, and another one arrives within
/// minutes. The `try_*` variants propagate instead.
pub struct LocationHistoryStore {
    pub(crate) store: Arc<dyn KeyValueStore>,
    pub(crate) config: CurationConfig,
    pub(crate) write_lock: Mutex<()>,
}

impl LocationHistoryStore {
    /// Create a store over the given backend.
    pub fn new(store: Arc<dyn KeyValueStore>, config: CurationConfig) -> Self {
        Self {
            store,
            config,
            write_lock: Mutex::new(()),
        }
    }

    /// The backend this store persists through.
    pub fn backing_store(&self) -> Arc<dyn KeyValueStore> {
        Arc::clone(&self.store)
    }

    /// Load the persisted trail. Absence is a valid state and yields an
    /// empty vector.
    ///
    /// # Errors
    /// `CoreError::Storage` on backend failure, `CoreError::Serialization`
    /// when the persisted value does not parse.
    pub async fn try_history(&self) -> CoreResult<Vec<Point>> {
        match self.store.get(keys::LOCATION_DATA).await? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => Ok(Vec::new()),
        }
    }

    /// Load the persisted trail, treating failure like absence.
    pub async fn history(&self) -> Vec<Point> {
        match self.try_history().await {
            Ok(points) => points,
            Err(error) => {
                warn!(%error, "failed to load location history, treating as empty");
                Vec::new()
            }
        }
    }

    /// First/last point and count of the stored trail.
    pub async fn stats(&self) -> TrailStats {
        TrailStats::from_points(&self.history().await)
    }

    /// Curate and persist one raw fix, swallowing any failure.
    ///
    /// The fix may be silently lost when persistence fails; callers treat
    /// appends as fire-and-forget.
    pub async fn append(&self, fix: RawFix) {
        if let Err(error) = self.try_append(fix).await {
            warn!(%error, time = fix.time, "location fix dropped: persistence failed");
        }
    }

    /// Curate and persist one raw fix.
    ///
    /// # Errors
    /// `CoreError::Storage` / `CoreError::Serialization` when the trail
    /// cannot be read back or written.
    pub async fn try_append(&self, fix: RawFix) -> CoreResult<AppendOutcome> {
        // Hold the writer lock across the whole read-modify-write cycle.
        let _guard = self.write_lock.lock().await;

        // Always work in integral UTC milliseconds.
        let unixtime_utc = fix.floored_time();
        let cutoff = unixtime_utc - self.config.retention_window_ms();

        let history = self.try_history().await?;

        // No matter how fast fixes arrive, saves never happen closer
        // together than the save floor.
        if let Some(last) = history.last() {
            if last.time + self.config.min_save_interval_ms() > unixtime_utc {
                debug!(time = unixtime_utc, "discarding fix: too soon after last save");
                return Ok(AppendOutcome::Throttled);
            }
        }

        // Keep only the retention window.
        let mut curated: Vec<Point> = history
            .into_iter()
            .filter(|point| point.time > cutoff)
            .collect();

        // Backfill the stationary gap since the last stored point. A gap in
        // the data is taken to mean the device stayed at its last known
        // location, so the synthetic points carry that position, not the new
        // fix's. The backfill never reaches further back than the cap.
        let mut backfilled = 0;
        if let Some(last) = curated.last().copied() {
            let interval = self.config.location_interval_ms();
            let mut gap_start = last.time;
            if unixtime_utc - gap_start > self.config.max_backfill_ms() {
                gap_start = unixtime_utc - self.config.max_backfill_ms();
            }

            let mut synthetic_time = gap_start + interval;
            while synthetic_time < unixtime_utc - interval {
                curated.push(Point::new(synthetic_time, last.latitude, last.longitude));
                backfilled += 1;
                synthetic_time += interval;
            }
            if backfilled > 0 {
                debug!(backfilled, from = gap_start, "backfilled stationary gap");
            }
        }

        curated.push(Point::new(unixtime_utc, fix.latitude, fix.longitude));
        self.persist(&curated).await?;
        info!(
            time = unixtime_utc,
            backfilled,
            stored = curated.len(),
            "saved location"
        );
        Ok(AppendOutcome::Saved { backfilled })
    }

    /// Replace the persisted trail wholesale.
    pub(crate) async fn persist(&self, points: &[Point]) -> CoreResult<()> {
        let bytes = serde_json::to_vec(points)?;
        self.store.put(keys::LOCATION_DATA, bytes).await?;
        Ok(())
    }
}
