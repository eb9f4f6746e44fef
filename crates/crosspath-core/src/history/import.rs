//! Merging an externally exported trail into the stored history.
//!
//! Timeline exports (the user's own history retrieved from another system)
//! are merged point-by-point: a record already present under exact
//! `(time, latitude, longitude)` equality is skipped, everything else is
//! appended. The merged array is persisted as-is, unsorted; consumers that
//! need ordering re-sort on read via normalization.

use serde_json::Value;
use tracing::{debug, info};

use crate::error::CoreResult;
use crate::normalize::parse_record;
use crate::types::Point;

use super::store::LocationHistoryStore;

/// Tally of one merge run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MergeOutcome {
    /// Records newly added to the trail.
    pub imported: usize,
    /// Records skipped because an identical point was already stored.
    pub duplicates: usize,
    /// Records dropped because they did not parse.
    pub rejected: usize,
}

impl LocationHistoryStore {
    /// Merge loosely typed external records into the stored trail.
    ///
    /// # Errors
    /// `CoreError::Storage` / `CoreError::Serialization` when the trail
    /// cannot be read back or written.
    pub async fn merge_external(&self, records: &[Value]) -> CoreResult<MergeOutcome> {
        let _guard = self.write_lock.lock().await;

        let mut history = self.try_history().await?;
        let mut outcome = MergeOutcome::default();

        for record in records {
            match parse_record(record) {
                Ok(point) => {
                    if contains_point(&history, &point) {
                        outcome.duplicates += 1;
                    } else {
                        history.push(point);
                        outcome.imported += 1;
                    }
                }
                Err(reason) => {
                    debug!(%reason, "skipping unparseable import record");
                    outcome.rejected += 1;
                }
            }
        }

        self.persist(&history).await?;
        info!(
            imported = outcome.imported,
            duplicates = outcome.duplicates,
            rejected = outcome.rejected,
            "merged external trail"
        );
        Ok(outcome)
    }
}

fn contains_point(history: &[Point], candidate: &Point) -> bool {
    history.iter().any(|stored| {
        stored.time == candidate.time
            && stored.latitude == candidate.latitude
            && stored.longitude == candidate.longitude
    })
}
