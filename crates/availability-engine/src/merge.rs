//! Union of busy intervals across participants.
//!
//! Flattens every participant's intervals, sorts by start, then sweeps once:
//! an interval that starts at or before the current block's end extends it,
//! anything later opens a new block.

use serde::Serialize;

use crate::interval::{Interval, TimeRange};

/// Sorted busy intervals with a strictly positive gap between neighbours.
///
/// Touching or overlapping intervals are always merged, so for consecutive
/// `a, b` the timeline guarantees `a.end < b.start`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BusyTimeline(Vec<Interval>);

impl BusyTimeline {
    pub fn intervals(&self) -> &[Interval] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Interval> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<Interval> {
        self.0
    }

    /// Restrict the timeline to `range`, dropping blocks outside it and
    /// trimming those that straddle a boundary.
    ///
    /// Clipping cannot bring two blocks into contact, so the invariant holds.
    pub fn clip_to(&self, range: &TimeRange) -> BusyTimeline {
        BusyTimeline(self.0.iter().filter_map(|b| b.clip_to(range)).collect())
    }
}

impl<'a> IntoIterator for &'a BusyTimeline {
    type Item = &'a Interval;
    type IntoIter = std::slice::Iter<'a, Interval>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Merge per-participant interval lists into one busy timeline.
///
/// Participant order does not affect the result. Each input interval must
/// already satisfy `start <= end`, which [`Interval`] enforces on construction.
pub fn merge_busy(participants: &[Vec<Interval>]) -> BusyTimeline {
    merge_intervals(participants.iter().flatten().copied())
}

/// Merge an arbitrary collection of intervals into one busy timeline.
pub fn merge_intervals(intervals: impl IntoIterator<Item = Interval>) -> BusyTimeline {
    let mut intervals: Vec<Interval> = intervals.into_iter().collect();
    if intervals.is_empty() {
        return BusyTimeline::default();
    }

    // Sort by start (then end, for a deterministic sweep).
    intervals.sort_unstable();

    let mut merged: Vec<Interval> = Vec::with_capacity(intervals.len());
    for interval in intervals {
        if let Some(last) = merged.last_mut() {
            if interval.start() <= last.end() {
                // Overlapping or touching, extend the current block.
                last.extend_to(interval.end());
                continue;
            }
        }
        merged.push(interval);
    }

    BusyTimeline(merged)
}
