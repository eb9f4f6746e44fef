//! The matching loop and its trait-consuming driver.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::MatchingConfig;
use crate::history::LocationHistoryStore;
use crate::normalize::{normalize, sort_points_by_time};
use crate::traits::{keys, KeyValueStore};
use crate::types::{ExposureBins, Point, MS_PER_DAY};

/// Result of one intersection run.
///
/// Only `bins` is persisted; the diagnostics counters describe what this run
/// dropped and exist so callers can surface data-quality problems instead of
/// silently under-reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IntersectionReport {
    /// Proximity matches binned by age in days.
    pub bins: ExposureBins,
    /// Matches whose age fell outside the histogram span.
    pub out_of_range_matches: u32,
    /// Concern records dropped during normalization.
    pub rejected_concern_points: usize,
}

/// Count proximity events between two sorted trails, binned by recency.
///
/// Both slices must be sorted by time ascending; `concern_points` is entered
/// through a binary search per self point, then scanned forward only while
/// inside the temporal window, so the cost is O(n log m + matches) rather
/// than a full cross product.
///
/// A concern point matches when it lies within the temporal window around
/// the self point and strictly closer than the distance threshold. Matches
/// are aged against `now_ms` by the self point's timestamp, rounded to whole
/// days; ages outside the 28-day span are dropped and counted.
pub fn intersect_trails(
    self_points: &[Point],
    concern_points: &[Point],
    now_ms: i64,
    config: &MatchingConfig,
) -> IntersectionReport {
    let window = config.time_window_ms();
    let threshold_sq = config.distance_window_feet * config.distance_window_feet;

    let mut report = IntersectionReport::default();
    for point in self_points {
        let time_min = point.time - window;
        let time_max = point.time + window;

        let mut i = super::geometry::lower_bound_by_time(concern_points, time_min);
        while i < concern_points.len() && concern_points[i].time <= time_max {
            let dist_sq = super::geometry::distance_feet_sq(point, &concern_points[i], config);
            if dist_sq < threshold_sq {
                let days_ago = ((now_ms - point.time) as f64 / MS_PER_DAY as f64).round() as i64;
                if !report.bins.record(days_ago) {
                    debug!(days_ago, time = point.time, "match outside histogram span");
                    report.out_of_range_matches += 1;
                }
            }
            i += 1;
        }
    }
    report
}

/// Compares the stored self trail against an externally supplied concern
/// trail and persists the resulting histogram.
///
/// A run is a pure read, a pure compute, and a single persist. Storage
/// failures on either side are logged and absorbed: the worst case is an
/// empty or unpersisted result, never a failed run.
pub struct IntersectionEngine {
    history: Arc<LocationHistoryStore>,
    config: MatchingConfig,
}

impl IntersectionEngine {
    /// Create an engine reading the self trail from `history` and persisting
    /// results through the same backend.
    pub fn new(history: Arc<LocationHistoryStore>, config: MatchingConfig) -> Self {
        Self { history, config }
    }

    /// Intersect the stored trail against `concern` records, with `now_ms`
    /// as the recency reference. Persists the histogram wholesale under
    /// `CROSSED_PATHS`, replacing any prior result, and returns the report.
    pub async fn intersect(&self, concern: &[Value], now_ms: i64) -> IntersectionReport {
        let mut self_points = self.history.history().await;
        sort_points_by_time(&mut self_points);

        let concern_normalized = normalize(concern);

        let mut report = intersect_trails(
            &self_points,
            &concern_normalized.points,
            now_ms,
            &self.config,
        );
        report.rejected_concern_points = concern_normalized.rejected;

        self.persist_bins(&report.bins).await;
        info!(
            matches = report.bins.total(),
            out_of_range = report.out_of_range_matches,
            rejected = report.rejected_concern_points,
            "crossing results computed"
        );
        report
    }

    /// [`intersect`](Self::intersect) with the current wall clock as the
    /// recency reference.
    pub async fn intersect_now(&self, concern: &[Value]) -> IntersectionReport {
        self.intersect(concern, chrono::Utc::now().timestamp_millis())
            .await
    }

    /// The most recently persisted histogram, if any run has completed.
    pub async fn last_result(&self) -> Option<ExposureBins> {
        let store = self.history.backing_store();
        match store.get(keys::CROSSED_PATHS).await {
            Ok(Some(bytes)) => match serde_json::from_slice(&bytes) {
                Ok(bins) => Some(bins),
                Err(error) => {
                    warn!(%error, "persisted crossing result does not parse");
                    None
                }
            },
            Ok(None) => None,
            Err(error) => {
                warn!(%error, "failed to load persisted crossing result");
                None
            }
        }
    }

    async fn persist_bins(&self, bins: &ExposureBins) {
        let store = self.history.backing_store();
        let bytes = match serde_json::to_vec(bins) {
            Ok(bytes) => bytes,
            Err(error) => {
                warn!(%error, "failed to serialize crossing result");
                return;
            }
        };
        if let Err(error) = store.put(keys::CROSSED_PATHS, bytes).await {
            warn!(%error, "failed to persist crossing result");
        }
    }
}
