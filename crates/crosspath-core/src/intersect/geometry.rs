//! Planar distance and time-index helpers for the matching loop.

use crate::config::MatchingConfig;
use crate::types::Point;

/// Squared planar distance between two points, in square feet.
///
/// Flat-earth approximation: degree deltas scaled by fixed feet-per-degree
/// factors. Squared so the hot loop compares against a squared threshold
/// without a square root per candidate.
pub(crate) fn distance_feet_sq(a: &Point, b: &Point, config: &MatchingConfig) -> f64 {
    let delta_lat = (b.latitude - a.latitude) * config.ft_per_degree_lat;
    let delta_lon = (b.longitude - a.longitude) * config.ft_per_degree_lon;
    delta_lat * delta_lat + delta_lon * delta_lon
}

/// Index of the first point with `time >= target`, or `points.len()` when
/// every point is earlier. `points` must be sorted by time ascending.
pub(crate) fn lower_bound_by_time(points: &[Point], target: i64) -> usize {
    points.partition_point(|point| point.time < target)
}
