//! Tests for the intersection engine and its helpers.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use crate::config::{CurationConfig, MatchingConfig};
use crate::history::LocationHistoryStore;
use crate::stubs::InMemoryKeyValueStore;
use crate::traits::{keys, KeyValueStore};
use crate::types::{Point, MS_PER_DAY};

use super::geometry::{distance_feet_sq, lower_bound_by_time};
use super::{intersect_trails, IntersectionEngine};

const MS_PER_HOUR: i64 = 60_000 * 60;

fn points(times: &[i64]) -> Vec<Point> {
    times.iter().map(|&t| Point::new(t, 0.0, 0.0)).collect()
}

#[test]
fn test_lower_bound_insertion_points() {
    let concern = points(&[10, 20, 30]);
    assert_eq!(lower_bound_by_time(&concern, 5), 0);
    assert_eq!(lower_bound_by_time(&concern, 10), 0);
    assert_eq!(lower_bound_by_time(&concern, 15), 1);
    assert_eq!(lower_bound_by_time(&concern, 20), 1);
    assert_eq!(lower_bound_by_time(&concern, 25), 2);
    assert_eq!(lower_bound_by_time(&concern, 35), 3);
    assert_eq!(lower_bound_by_time(&[], 10), 0);
}

#[test]
fn test_lower_bound_brackets_absent_target() {
    let concern = points(&[0, 100, 200, 300, 400]);
    let target = 250;
    let i = lower_bound_by_time(&concern, target);
    assert!(concern[i - 1].time < target);
    assert!(target < concern[i].time);
}

#[test]
fn test_distance_uses_flat_earth_factors() {
    let config = MatchingConfig::default();
    let a = Point::new(0, 10.0, 10.0);
    let b = Point::new(0, 10.0001, 10.0001);
    let expected = 36.4_f64 * 36.4 + 28.82 * 28.82;
    assert!((distance_feet_sq(&a, &b, &config) - expected).abs() < 1e-6);
}

#[test]
fn test_close_pair_bins_today() {
    // The canonical example: one self point, one concern point about 46 ft
    // away at the same instant.
    let self_points = vec![Point::new(0, 10.0, 10.0)];
    let concern = vec![Point::new(0, 10.0001, 10.0001)];

    let report = intersect_trails(&self_points, &concern, 0, &MatchingConfig::default());
    assert_eq!(report.bins.get(0), Some(1));
    assert_eq!(report.bins.total(), 1);
    assert_eq!(report.out_of_range_matches, 0);
}

#[test]
fn test_far_pair_does_not_match() {
    let self_points = vec![Point::new(0, 10.0, 10.0)];
    let concern = vec![Point::new(0, 10.001, 10.001)];
    let report = intersect_trails(&self_points, &concern, 0, &MatchingConfig::default());
    assert_eq!(report.bins.total(), 0);
}

#[test]
fn test_distance_threshold_is_strict() {
    // Factors chosen so the squared distance is exactly the squared
    // threshold: equality must be excluded.
    let config = MatchingConfig {
        distance_window_feet: 60.0,
        ft_per_degree_lat: 120.0,
        ft_per_degree_lon: 120.0,
        ..MatchingConfig::default()
    };
    let self_points = vec![Point::new(0, 0.0, 0.0)];

    let at_threshold = vec![Point::new(0, 0.5, 0.0)]; // 0.5 deg * 120 = 60 ft
    let report = intersect_trails(&self_points, &at_threshold, 0, &config);
    assert_eq!(report.bins.total(), 0);

    let inside = vec![Point::new(0, 0.25, 0.0)]; // 30 ft
    let report = intersect_trails(&self_points, &inside, 0, &config);
    assert_eq!(report.bins.total(), 1);
}

#[test]
fn test_time_window_bounds_are_inclusive() {
    let config = MatchingConfig::default();
    let self_points = vec![Point::new(10 * MS_PER_HOUR, 0.0, 0.0)];

    let edges = vec![
        Point::new(8 * MS_PER_HOUR, 0.0, 0.0),  // exactly -2h
        Point::new(12 * MS_PER_HOUR, 0.0, 0.0), // exactly +2h
    ];
    let report = intersect_trails(&self_points, &edges, 10 * MS_PER_HOUR, &config);
    assert_eq!(report.bins.get(0), Some(2));

    let beyond = vec![
        Point::new(8 * MS_PER_HOUR - 1, 0.0, 0.0),
        Point::new(12 * MS_PER_HOUR + 1, 0.0, 0.0),
    ];
    let report = intersect_trails(&self_points, &beyond, 10 * MS_PER_HOUR, &config);
    assert_eq!(report.bins.total(), 0);
}

#[test]
fn test_each_pair_in_window_counts() {
    let self_points = points(&[0, 1_000]);
    let concern = points(&[0, 100, 200]);
    let report = intersect_trails(&self_points, &concern, 0, &MatchingConfig::default());
    // Every concern point is inside both self windows.
    assert_eq!(report.bins.get(0), Some(6));
}

#[test]
fn test_day_binning_rounds_age() {
    let config = MatchingConfig::default();
    let now = 100 * MS_PER_DAY;
    let self_points = vec![
        Point::new(now - MS_PER_DAY - 4 * MS_PER_HOUR, 0.0, 0.0), // 1.17 days -> bin 1
        Point::new(now - 2 * MS_PER_DAY + 4 * MS_PER_HOUR, 0.0, 0.0), // 1.83 days -> bin 2
    ];
    // Concern points co-located and co-timed with each self point.
    let concern = self_points.clone();

    let report = intersect_trails(&self_points, &concern, now, &config);
    assert_eq!(report.bins.get(1), Some(1));
    assert_eq!(report.bins.get(2), Some(1));
    assert_eq!(report.bins.total(), 2);
}

#[test]
fn test_translation_of_both_trails_and_clock_preserves_bins() {
    let config = MatchingConfig::default();
    let now = 50 * MS_PER_DAY;
    let self_points: Vec<Point> = vec![
        Point::new(now - 3 * MS_PER_DAY, 10.0, 10.0),
        Point::new(now - MS_PER_HOUR, 20.0, 20.0),
    ];
    let concern: Vec<Point> = vec![
        Point::new(now - 3 * MS_PER_DAY + MS_PER_HOUR, 10.00005, 10.00005),
        Point::new(now - MS_PER_HOUR + 30, 20.00002, 19.99998),
    ];

    let baseline = intersect_trails(&self_points, &concern, now, &config);
    assert!(baseline.bins.total() > 0);

    let shift = 7 * MS_PER_DAY + 1_234;
    let shifted_self: Vec<Point> = self_points
        .iter()
        .map(|p| Point::new(p.time + shift, p.latitude, p.longitude))
        .collect();
    let shifted_concern: Vec<Point> = concern
        .iter()
        .map(|p| Point::new(p.time + shift, p.latitude, p.longitude))
        .collect();

    let shifted = intersect_trails(&shifted_self, &shifted_concern, now + shift, &config);
    assert_eq!(shifted.bins, baseline.bins);
}

#[test]
fn test_match_older_than_span_is_dropped_and_counted() {
    let config = MatchingConfig::default();
    let now = 100 * MS_PER_DAY;
    let self_points = vec![Point::new(now - 30 * MS_PER_DAY, 0.0, 0.0)];
    let concern = self_points.clone();

    let report = intersect_trails(&self_points, &concern, now, &config);
    assert_eq!(report.bins.total(), 0);
    assert_eq!(report.out_of_range_matches, 1);
}

#[test]
fn test_future_self_point_is_dropped_and_counted() {
    let config = MatchingConfig::default();
    let now = 100 * MS_PER_DAY;
    let self_points = vec![Point::new(now + 2 * MS_PER_DAY, 0.0, 0.0)];
    let concern = self_points.clone();

    let report = intersect_trails(&self_points, &concern, now, &config);
    assert_eq!(report.bins.total(), 0);
    assert_eq!(report.out_of_range_matches, 1);
}

#[test]
fn test_empty_inputs_produce_empty_bins() {
    let config = MatchingConfig::default();
    let report = intersect_trails(&[], &points(&[0, 10]), 0, &config);
    assert_eq!(report.bins.total(), 0);
    let report = intersect_trails(&points(&[0, 10]), &[], 0, &config);
    assert_eq!(report.bins.total(), 0);
}

// ---- driver ----

fn engine_fixture() -> (Arc<InMemoryKeyValueStore>, IntersectionEngine) {
    let kv = Arc::new(InMemoryKeyValueStore::new());
    let history = Arc::new(LocationHistoryStore::new(
        kv.clone(),
        CurationConfig::default(),
    ));
    let engine = IntersectionEngine::new(history, MatchingConfig::default());
    (kv, engine)
}

async fn seed_trail(kv: &InMemoryKeyValueStore, trail: &[Point]) {
    kv.put(keys::LOCATION_DATA, serde_json::to_vec(trail).unwrap())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_engine_persists_histogram_wire_shape() {
    let (kv, engine) = engine_fixture();
    seed_trail(&kv, &[Point::new(0, 10.0, 10.0)]).await;

    let concern = vec![json!({"time": 0, "latitude": 10.0001, "longitude": 10.0001})];
    let report = engine.intersect(&concern, 0).await;
    assert_eq!(report.bins.get(0), Some(1));

    let bytes = kv.get(keys::CROSSED_PATHS).await.unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    let array = value.as_array().unwrap();
    assert_eq!(array.len(), 28);
    assert_eq!(array[0], json!(1));
    assert!(array[1..].iter().all(|v| *v == json!(0)));
}

#[tokio::test]
async fn test_engine_reads_back_last_result() {
    let (kv, engine) = engine_fixture();
    assert!(engine.last_result().await.is_none());

    seed_trail(&kv, &[Point::new(0, 10.0, 10.0)]).await;
    let concern = vec![json!({"time": 0, "latitude": 10.0001, "longitude": 10.0001})];
    let report = engine.intersect(&concern, 0).await;

    assert_eq!(engine.last_result().await, Some(report.bins));
}

#[tokio::test]
async fn test_engine_overwrites_prior_result_wholesale() {
    let (kv, engine) = engine_fixture();
    seed_trail(&kv, &[Point::new(0, 10.0, 10.0)]).await;

    let near = vec![json!({"time": 0, "latitude": 10.0001, "longitude": 10.0001})];
    engine.intersect(&near, 0).await;

    let far = vec![json!({"time": 0, "latitude": 50.0, "longitude": 50.0})];
    engine.intersect(&far, 0).await;

    assert_eq!(engine.last_result().await.unwrap().total(), 0);
}

#[tokio::test]
async fn test_engine_sorts_self_trail_defensively() {
    // Stored trail out of order (possible after an import): matching must
    // still see every point.
    let (kv, engine) = engine_fixture();
    seed_trail(
        &kv,
        &[
            Point::new(5 * MS_PER_DAY, 20.0, 20.0),
            Point::new(MS_PER_DAY, 10.0, 10.0),
        ],
    )
    .await;

    let now = 6 * MS_PER_DAY;
    let concern = vec![
        json!({"time": MS_PER_DAY, "latitude": 10.0001, "longitude": 10.0001}),
        json!({"time": 5 * MS_PER_DAY, "latitude": 20.0001, "longitude": 20.0001}),
    ];
    let report = engine.intersect(&concern, now).await;
    assert_eq!(report.bins.get(1), Some(1));
    assert_eq!(report.bins.get(5), Some(1));
}

#[tokio::test]
async fn test_engine_counts_rejected_concern_records() {
    let (kv, engine) = engine_fixture();
    seed_trail(&kv, &[Point::new(0, 10.0, 10.0)]).await;

    let concern = vec![
        json!({"time": "0", "latitude": "10.0001", "longitude": "10.0001"}),
        json!({"latitude": 10.0, "longitude": 10.0}),
        json!({"time": "never", "latitude": 10.0, "longitude": 10.0}),
    ];
    let report = engine.intersect(&concern, 0).await;
    assert_eq!(report.bins.get(0), Some(1));
    assert_eq!(report.rejected_concern_points, 2);
}

#[tokio::test]
async fn test_engine_survives_storage_failure() {
    let (kv, engine) = engine_fixture();
    seed_trail(&kv, &[Point::new(0, 10.0, 10.0)]).await;
    kv.set_fail_reads(true);
    kv.set_fail_writes(true);

    // Self trail unreadable, result unpersistable: still a clean, empty run.
    let concern = vec![json!({"time": 0, "latitude": 10.0001, "longitude": 10.0001})];
    let report = engine.intersect(&concern, 0).await;
    assert_eq!(report.bins.total(), 0);

    kv.set_fail_reads(false);
    assert!(engine.last_result().await.is_none());
}

#[tokio::test]
async fn test_engine_with_widened_window_tuning() {
    let kv = Arc::new(InMemoryKeyValueStore::new());
    let history = Arc::new(LocationHistoryStore::new(
        kv.clone(),
        CurationConfig::default(),
    ));
    let engine = IntersectionEngine::new(
        history,
        MatchingConfig {
            time_window: Duration::from_secs(4 * 3600),
            ..MatchingConfig::default()
        },
    );
    seed_trail(&kv, &[Point::new(0, 10.0, 10.0)]).await;

    // 3h away: outside the default +/-2h window, inside the widened one.
    let concern = vec![json!({"time": 3 * MS_PER_HOUR, "latitude": 10.0001, "longitude": 10.0001})];
    let report = engine.intersect(&concern, 0).await;
    assert_eq!(report.bins.get(0), Some(1));
}
