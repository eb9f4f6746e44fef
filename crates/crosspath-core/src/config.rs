//! Configuration for the history store and the intersection engine.
//!
//! The reference system kept these values as fixed globals; here they are
//! explicit structs passed in at construction so instances can be tuned
//! independently and tests stay deterministic. The [`defaults`] module holds
//! the reference constants with their provenance.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Reference constants for trail curation and proximity matching.
pub mod defaults {
    /// Desired gap between recorded locations: 5 minutes.
    pub const LOCATION_INTERVAL_MS: u64 = 60_000 * 5;

    /// Hard floor between saves: 4 minutes (80% of the location interval,
    /// kept shorter than the interval to avoid skipping legitimate polls).
    pub const MIN_SAVE_INTERVAL_MS: u64 = LOCATION_INTERVAL_MS * 4 / 5;

    /// Longest stationary gap that will be backfilled: 8 hours.
    pub const MAX_BACKFILL_MS: u64 = 60_000 * 60 * 8;

    /// Trail retention horizon: 28 days.
    pub const RETENTION_WINDOW_MS: u64 = 60_000 * 60 * 24 * 28;

    /// Temporal co-location window: +/- 2 hours.
    pub const TIME_WINDOW_MS: u64 = 60_000 * 60 * 2;

    /// Spatial co-location threshold, in feet.
    pub const DISTANCE_WINDOW_FEET: f64 = 60.0;

    /// Feet per degree of latitude, calibrated near 38 degrees North.
    pub const FT_PER_DEGREE_LAT: f64 = 364_000.0;

    /// Feet per degree of longitude, calibrated near 38 degrees North.
    /// Not scaled by actual latitude; retuning is a deployment decision.
    pub const FT_PER_DEGREE_LON: f64 = 288_200.0;
}

/// Tuning for [`LocationHistoryStore`](crate::history::LocationHistoryStore)
/// curation: how densely the trail is recorded, how far gaps are backfilled,
/// and how much history is retained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurationConfig {
    /// Desired gap between recorded locations. Backfill points are spaced by
    /// this interval.
    pub location_interval: Duration,

    /// Minimum accepted gap between saves. Fixes arriving sooner than this
    /// after the last stored point are discarded.
    pub min_save_interval: Duration,

    /// Cap on how far back a stationary gap is backfilled.
    pub max_backfill: Duration,

    /// Points older than `now - retention_window` are dropped on every write.
    pub retention_window: Duration,
}

impl Default for CurationConfig {
    fn default() -> Self {
        Self {
            location_interval: Duration::from_millis(defaults::LOCATION_INTERVAL_MS),
            min_save_interval: Duration::from_millis(defaults::MIN_SAVE_INTERVAL_MS),
            max_backfill: Duration::from_millis(defaults::MAX_BACKFILL_MS),
            retention_window: Duration::from_millis(defaults::RETENTION_WINDOW_MS),
        }
    }
}

impl CurationConfig {
    /// Build a config around a custom location interval, deriving the save
    /// floor as 80% of it the way the reference tuning does.
    pub fn with_location_interval(location_interval: Duration) -> Self {
        Self {
            location_interval,
            min_save_interval: location_interval * 4 / 5,
            ..Self::default()
        }
    }

    /// Validate internal consistency.
    ///
    /// # Errors
    /// `CoreError::InvalidConfig` if any interval is zero, the save floor is
    /// not shorter than the location interval, or the retention window does
    /// not cover the backfill cap.
    pub fn validate(&self) -> CoreResult<()> {
        if self.location_interval.is_zero() || self.min_save_interval.is_zero() {
            return Err(CoreError::InvalidConfig(
                "intervals must be non-zero".to_string(),
            ));
        }
        if self.min_save_interval >= self.location_interval {
            return Err(CoreError::InvalidConfig(
                "min_save_interval must be shorter than location_interval".to_string(),
            ));
        }
        if self.retention_window <= self.max_backfill {
            return Err(CoreError::InvalidConfig(
                "retention_window must exceed max_backfill".to_string(),
            ));
        }
        Ok(())
    }

    pub(crate) fn location_interval_ms(&self) -> i64 {
        self.location_interval.as_millis() as i64
    }

    pub(crate) fn min_save_interval_ms(&self) -> i64 {
        self.min_save_interval.as_millis() as i64
    }

    pub(crate) fn max_backfill_ms(&self) -> i64 {
        self.max_backfill.as_millis() as i64
    }

    pub(crate) fn retention_window_ms(&self) -> i64 {
        self.retention_window.as_millis() as i64
    }
}

/// Tuning for the [`IntersectionEngine`](crate::intersect::IntersectionEngine):
/// the spatio-temporal window inside which two points count as an encounter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// Half-width of the temporal window around each of the user's points.
    pub time_window: Duration,

    /// Distance threshold in feet. Matches are strictly closer than this.
    pub distance_window_feet: f64,

    /// Flat-earth conversion factor, feet per degree of latitude.
    pub ft_per_degree_lat: f64,

    /// Flat-earth conversion factor, feet per degree of longitude.
    pub ft_per_degree_lon: f64,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            time_window: Duration::from_millis(defaults::TIME_WINDOW_MS),
            distance_window_feet: defaults::DISTANCE_WINDOW_FEET,
            ft_per_degree_lat: defaults::FT_PER_DEGREE_LAT,
            ft_per_degree_lon: defaults::FT_PER_DEGREE_LON,
        }
    }
}

impl MatchingConfig {
    /// Validate internal consistency.
    ///
    /// # Errors
    /// `CoreError::InvalidConfig` if the distance threshold or either
    /// conversion factor is not a positive finite number.
    pub fn validate(&self) -> CoreResult<()> {
        let factors = [
            ("distance_window_feet", self.distance_window_feet),
            ("ft_per_degree_lat", self.ft_per_degree_lat),
            ("ft_per_degree_lon", self.ft_per_degree_lon),
        ];
        for (name, value) in factors {
            if !value.is_finite() || value <= 0.0 {
                return Err(CoreError::InvalidConfig(format!(
                    "{name} must be positive and finite, got {value}"
                )));
            }
        }
        Ok(())
    }

    pub(crate) fn time_window_ms(&self) -> i64 {
        self.time_window.as_millis() as i64
    }
}
