//! Per-day encounter histogram.

use serde::{Deserialize, Serialize};

/// Number of days the ledger retains and the histogram spans.
pub const DAY_BIN_COUNT: usize = 28;

/// Milliseconds in one day.
pub const MS_PER_DAY: i64 = 60_000 * 60 * 24;

/// Counts of proximity matches binned by age in days.
///
/// `bin[0]` is today, `bin[27]` is 27 days ago. Persisted as a bare JSON
/// array of 28 integers, wire compatible with the reference system's
/// `CROSSED_PATHS` value. Overwritten wholesale on each intersection run,
/// never merged with a prior result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExposureBins {
    bins: [u32; DAY_BIN_COUNT],
}

impl ExposureBins {
    /// An all-zero histogram.
    pub fn new() -> Self {
        Self {
            bins: [0; DAY_BIN_COUNT],
        }
    }

    /// Count one match aged `days_ago` days.
    ///
    /// Returns `false` without recording when the age falls outside the
    /// histogram span; the caller decides how to account for the drop.
    pub fn record(&mut self, days_ago: i64) -> bool {
        if (0..DAY_BIN_COUNT as i64).contains(&days_ago) {
            self.bins[days_ago as usize] += 1;
            true
        } else {
            false
        }
    }

    /// Matches recorded for `days_ago`, or `None` outside the span.
    pub fn get(&self, days_ago: usize) -> Option<u32> {
        self.bins.get(days_ago).copied()
    }

    /// The raw 28-slot array, today first.
    pub fn as_slice(&self) -> &[u32] {
        &self.bins
    }

    /// Total matches across all days.
    pub fn total(&self) -> u64 {
        self.bins.iter().map(|&n| u64::from(n)).sum()
    }
}

impl Default for ExposureBins {
    fn default() -> Self {
        Self::new()
    }
}

impl From<[u32; DAY_BIN_COUNT]> for ExposureBins {
    fn from(bins: [u32; DAY_BIN_COUNT]) -> Self {
        Self { bins }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_zeroed() {
        let bins = ExposureBins::new();
        assert_eq!(bins.total(), 0);
        assert!(bins.as_slice().iter().all(|&n| n == 0));
    }

    #[test]
    fn test_record_in_range() {
        let mut bins = ExposureBins::new();
        assert!(bins.record(0));
        assert!(bins.record(0));
        assert!(bins.record(27));
        assert_eq!(bins.get(0), Some(2));
        assert_eq!(bins.get(27), Some(1));
        assert_eq!(bins.total(), 3);
    }

    #[test]
    fn test_record_out_of_range_is_dropped() {
        let mut bins = ExposureBins::new();
        assert!(!bins.record(-1));
        assert!(!bins.record(28));
        assert_eq!(bins.total(), 0);
    }

    #[test]
    fn test_serializes_as_bare_array() {
        let mut bins = ExposureBins::new();
        bins.record(1);
        let json = serde_json::to_string(&bins).unwrap();
        assert!(json.starts_with("[0,1,0"));
        let back: ExposureBins = serde_json::from_str(&json).unwrap();
        assert_eq!(back, bins);
    }
}
