//! Derive free windows from a busy timeline.
//!
//! Walks the busy blocks in order with a cursor starting at the range start,
//! emitting the gap before each block and the tail after the last one.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::interval::{Interval, TimeRange};
use crate::merge::BusyTimeline;

/// Sorted, non-overlapping free windows, all inside the range they were derived for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FreeWindowSet(Vec<Interval>);

impl FreeWindowSet {
    pub fn windows(&self) -> &[Interval] {
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

    /// Keep only windows lasting at least `min_minutes`.
    pub fn at_least(&self, min_minutes: i64) -> FreeWindowSet {
        FreeWindowSet(
            self.0
                .iter()
                .filter(|w| w.duration_minutes() >= min_minutes)
                .copied()
                .collect(),
        )
    }

    /// The earliest window lasting at least `min_minutes`.
    pub fn first_at_least(&self, min_minutes: i64) -> Option<Interval> {
        self.0
            .iter()
            .find(|w| w.duration_minutes() >= min_minutes)
            .copied()
    }

    /// Total free time across all windows.
    pub fn total_minutes(&self) -> i64 {
        self.0.iter().map(Interval::duration_minutes).sum()
    }
}

impl<'a> IntoIterator for &'a FreeWindowSet {
    type Item = &'a Interval;
    type IntoIter = std::slice::Iter<'a, Interval>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Compute the gaps in `busy` within `range`.
///
/// The timeline is clipped to the range first, so busy time that starts
/// before `range.start` or runs past `range.end` is handled here rather than
/// by the caller. A timeline covering the whole range yields no windows; an
/// empty one yields the full range (unless the range itself is empty).
pub fn derive_free_windows(busy: &BusyTimeline, range: &TimeRange) -> FreeWindowSet {
    let clipped = busy.clip_to(range);

    let mut windows = Vec::new();
    let mut cursor: DateTime<Utc> = range.start();

    // Zero-length blocks occupy no time and would only split a window in two.
    for block in clipped.iter().filter(|b| b.start() < b.end()) {
        if block.start() > cursor {
            windows.push(Interval::ordered(cursor, block.start()));
        }
        cursor = cursor.max(block.end());
    }

    // Trailing window after the last busy block.
    if cursor < range.end() {
        windows.push(Interval::ordered(cursor, range.end()));
    }

    FreeWindowSet(windows)
}
