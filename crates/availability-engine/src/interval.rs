//! Time intervals and the bounding range of an availability query.

use chrono::{DateTime, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{AvailabilityError, Result};

/// A closed span of time with `start <= end`.
///
/// Serializes as `{"start": "...", "end": "..."}` with RFC 3339 instants, which
/// is also the free-window shape the suggestion generator consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "UncheckedInterval")]
pub struct Interval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

#[derive(Deserialize)]
struct UncheckedInterval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TryFrom<UncheckedInterval> for Interval {
    type Error = AvailabilityError;

    fn try_from(raw: UncheckedInterval) -> Result<Self> {
        Interval::new(raw.start, raw.end)
    }
}

impl Interval {
    /// Build an interval, rejecting `end < start`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if end < start {
            return Err(AvailabilityError::malformed(
                "interval",
                format!("end {} precedes start {}", end.to_rfc3339(), start.to_rfc3339()),
            ));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// True when the two intervals share time. Touching endpoints do not overlap.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Trim the interval to `range`. Returns `None` when nothing of it lies inside.
    ///
    /// A zero-length interval sitting exactly on a range boundary is kept.
    pub fn clip_to(&self, range: &TimeRange) -> Option<Interval> {
        if self.end < range.start || self.start > range.end {
            return None;
        }
        let start = self.start.max(range.start);
        let end = self.end.min(range.end);
        if start == end && self.start != self.end {
            // Only touches the range from outside.
            return None;
        }
        Some(Interval { start, end })
    }

    /// Construct from bounds the caller has already ordered.
    pub(crate) fn ordered(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    /// Widen `end` in place. Only the merger uses this, on intervals it owns.
    pub(crate) fn extend_to(&mut self, end: DateTime<Utc>) {
        self.end = self.end.max(end);
    }
}

/// The `[start, end]` range an availability computation is bounded by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeRange {
    pub(crate) start: DateTime<Utc>,
    pub(crate) end: DateTime<Utc>,
}

impl TimeRange {
    /// # Errors
    /// Returns `AvailabilityError::InvalidRange` when `start > end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if start > end {
            return Err(AvailabilityError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Parse both bounds with [`parse_datetime`], resolving naive values in `tz`.
    pub fn parse(start: &str, end: &str, tz: Tz) -> Result<Self> {
        let start = parse_datetime(start, tz)
            .map_err(|reason| AvailabilityError::InvalidRequest(format!("range start: {reason}")))?;
        let end = parse_datetime(end, tz)
            .map_err(|reason| AvailabilityError::InvalidRequest(format!("range end: {reason}")))?;
        Self::new(start, end)
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }
}

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

/// Parse an ISO 8601 timestamp into a UTC instant.
///
/// Accepts RFC 3339 (offset carried in the string), naive local datetimes
/// (e.g. "2025-10-04T09:00:00", resolved in `tz`) and bare dates, which mean
/// local midnight in `tz`.
pub fn parse_datetime(s: &str, tz: Tz) -> std::result::Result<DateTime<Utc>, String> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return resolve_local(naive, tz);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return start_of_day(date, tz);
    }
    Err(format!("unrecognized datetime '{s}'"))
}

/// Midnight at the start of `date` in `tz`, as a UTC instant.
pub fn start_of_day(date: NaiveDate, tz: Tz) -> std::result::Result<DateTime<Utc>, String> {
    resolve_local(date.and_time(chrono::NaiveTime::MIN), tz)
}

/// Resolve a wall-clock time in `tz`.
///
/// Ambiguous times (DST fall-back) take the earlier instant; times inside a
/// spring-forward gap do not exist and are rejected.
pub fn resolve_local(naive: NaiveDateTime, tz: Tz) -> std::result::Result<DateTime<Utc>, String> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest.with_timezone(&Utc)),
        LocalResult::None => Err(format!("local time {naive} does not exist in {tz}")),
    }
}
