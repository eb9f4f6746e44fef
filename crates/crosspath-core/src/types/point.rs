//! Point types: the stored observation and the as-delivered GPS fix.

use serde::{Deserialize, Serialize};

/// A single curated location observation.
///
/// Immutable once created; two points with identical fields are the same
/// observation (there is no separate identity). Serializes to the persisted
/// wire shape `{"time": …, "latitude": …, "longitude": …}` with `time` in
/// integral milliseconds since the Unix epoch, UTC.
///
/// Synthetic backfill points share this shape and are indistinguishable from
/// observed ones once stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Milliseconds since the Unix epoch, UTC.
    pub time: i64,
    /// Degrees of latitude.
    pub latitude: f64,
    /// Degrees of longitude.
    pub longitude: f64,
}

impl Point {
    /// Construct a point.
    pub fn new(time: i64, latitude: f64, longitude: f64) -> Self {
        Self {
            time,
            latitude,
            longitude,
        }
    }

    /// Construct from coordinates encoded as integer degrees times 1e7, the
    /// encoding used by external timeline exports.
    pub fn from_e7(time: i64, latitude_e7: i64, longitude_e7: i64) -> Self {
        Self {
            time,
            latitude: latitude_e7 as f64 * 1e-7,
            longitude: longitude_e7 as f64 * 1e-7,
        }
    }
}

/// A raw GPS fix as delivered by the geolocation collaborator.
///
/// The timestamp arrives as a float; [`LocationHistoryStore::append`]
/// floors it to integral UTC milliseconds before any curation decision.
///
/// [`LocationHistoryStore::append`]: crate::history::LocationHistoryStore::append
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawFix {
    /// Milliseconds since the Unix epoch, UTC; possibly fractional.
    pub time: f64,
    /// Degrees of latitude.
    pub latitude: f64,
    /// Degrees of longitude.
    pub longitude: f64,
}

impl RawFix {
    /// The fix timestamp floored to integral milliseconds.
    pub fn floored_time(&self) -> i64 {
        self.time.floor() as i64
    }
}
