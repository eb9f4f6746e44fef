//! Normalization of loosely typed point records.
//!
//! Externally sourced trails arrive as untrusted JSON: fields may be strings
//! instead of numbers, carry extra keys, or be missing entirely, and the
//! sequence may be unsorted (common after an import). This module coerces,
//! filters, and sorts such input before the intersection engine touches it.
//!
//! Records that cannot be coerced to finite numbers are rejected and counted
//! rather than silently carried as NaN, which would poison every downstream
//! distance comparison. Sorting is explicitly numeric by `time` ascending;
//! the binary-search entry point of the engine depends on it.

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::types::Point;

/// Why a record was dropped during normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RejectionReason {
    /// A required field is absent.
    #[error("record is missing required field '{0}'")]
    MissingField(&'static str),

    /// A field is present but neither a number nor a numeric string.
    #[error("field '{0}' is not numeric")]
    NotNumeric(&'static str),

    /// A field parsed to NaN or an infinity.
    #[error("field '{0}' is not finite")]
    NotFinite(&'static str),
}

/// Result of normalizing an untrusted record sequence.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Normalized {
    /// Surviving points, sorted by `time` ascending.
    pub points: Vec<Point>,
    /// Number of records dropped.
    pub rejected: usize,
}

/// Parse one loosely typed record into a [`Point`].
///
/// Accepts JSON numbers directly and strings that parse as finite floats;
/// extra fields are ignored. The timestamp is floored to integral
/// milliseconds.
///
/// # Errors
/// The [`RejectionReason`] describing the first field that failed.
pub fn parse_record(record: &Value) -> Result<Point, RejectionReason> {
    let time = coerce_field(record, "time")?;
    let latitude = coerce_field(record, "latitude")?;
    let longitude = coerce_field(record, "longitude")?;
    Ok(Point::new(time.floor() as i64, latitude, longitude))
}

fn coerce_field(record: &Value, field: &'static str) -> Result<f64, RejectionReason> {
    let value = record
        .get(field)
        .ok_or(RejectionReason::MissingField(field))?;
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .ok_or(RejectionReason::NotNumeric(field))?;
    if !number.is_finite() {
        return Err(RejectionReason::NotFinite(field));
    }
    Ok(number)
}

/// Normalize an untrusted record sequence: parse each record, drop and count
/// the unparseable ones, sort the survivors by time.
pub fn normalize(records: &[Value]) -> Normalized {
    let mut normalized = Normalized::default();
    for record in records {
        match parse_record(record) {
            Ok(point) => normalized.points.push(point),
            Err(reason) => {
                debug!(%reason, "dropping malformed record");
                normalized.rejected += 1;
            }
        }
    }
    sort_points_by_time(&mut normalized.points);
    normalized
}

/// Defensive re-sort for already-typed trails. Stable, numeric by `time`.
pub fn sort_points_by_time(points: &mut [Point]) {
    points.sort_by_key(|point| point.time);
}
