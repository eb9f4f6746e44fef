//! Summary statistics over the stored trail.

use serde::{Deserialize, Serialize};

use super::point::Point;
use super::bins::MS_PER_DAY;

const MS_PER_HOUR: i64 = 60_000 * 60;
const MS_PER_MINUTE: i64 = 60_000;

/// First/last point and count of the stored trail.
///
/// `count == 0` implies both points are `None`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TrailStats {
    /// Oldest stored point, if any.
    pub first_point: Option<Point>,
    /// Newest stored point, if any.
    pub last_point: Option<Point>,
    /// Number of stored points.
    pub count: usize,
}

impl TrailStats {
    /// Compute stats from a stored trail. O(1) given the array.
    pub fn from_points(points: &[Point]) -> Self {
        Self {
            first_point: points.first().copied(),
            last_point: points.last().copied(),
            count: points.len(),
        }
    }

    /// Age of the newest point relative to `now_ms`, for status display.
    pub fn age_of_last(&self, now_ms: i64) -> Option<AgeBreakdown> {
        self.last_point
            .map(|point| AgeBreakdown::between(now_ms, point.time))
    }
}

/// Elapsed time decomposed for display: whole days, hours within the day,
/// minutes within the hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgeBreakdown {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
}

impl AgeBreakdown {
    /// Decompose `now_ms - then_ms`.
    pub fn between(now_ms: i64, then_ms: i64) -> Self {
        let elapsed = now_ms - then_ms;
        Self {
            days: elapsed / MS_PER_DAY,
            hours: (elapsed / MS_PER_HOUR) % 24,
            minutes: (elapsed / MS_PER_MINUTE) % 60,
        }
    }
}
