//! Tests for deriving free windows from a busy timeline.

use availability_engine::freebusy::derive_free_windows;
use availability_engine::interval::{Interval, TimeRange};
use availability_engine::merge::merge_intervals;
use chrono::{DateTime, TimeZone, Utc};

fn at(hour: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, 4, hour, min, 0).unwrap()
}

fn iv(start: (u32, u32), end: (u32, u32)) -> Interval {
    Interval::new(at(start.0, start.1), at(end.0, end.1)).unwrap()
}

fn workday() -> TimeRange {
    TimeRange::new(at(9, 0), at(17, 0)).unwrap()
}

#[test]
fn busy_at_range_start_leaves_the_rest_free() {
    let busy = merge_intervals(vec![iv((9, 0), (10, 0))]);

    let free = derive_free_windows(&busy, &workday());

    assert_eq!(free.windows(), &[iv((10, 0), (17, 0))]);
}

#[test]
fn no_busy_time_frees_the_whole_range() {
    let free = derive_free_windows(&merge_intervals(vec![]), &workday());

    assert_eq!(free.windows(), &[iv((9, 0), (17, 0))]);
    assert_eq!(free.total_minutes(), 480);
}

#[test]
fn busy_covering_the_range_leaves_nothing() {
    let busy = merge_intervals(vec![iv((8, 0), (18, 0))]);

    let free = derive_free_windows(&busy, &workday());

    assert!(free.is_empty());
}

#[test]
fn busy_exactly_filling_the_range_leaves_nothing() {
    let busy = merge_intervals(vec![iv((9, 0), (17, 0))]);

    assert!(derive_free_windows(&busy, &workday()).is_empty());
}

#[test]
fn single_block_in_the_middle_produces_two_windows() {
    let busy = merge_intervals(vec![iv((10, 0), (11, 0))]);

    let free = derive_free_windows(&busy, &workday());

    assert_eq!(free.windows(), &[iv((9, 0), (10, 0)), iv((11, 0), (17, 0))]);
    assert_eq!(free.windows()[0].duration_minutes(), 60);
    assert_eq!(free.windows()[1].duration_minutes(), 360);
}

#[test]
fn multiple_gaps_between_blocks() {
    let busy = merge_intervals(vec![
        iv((9, 30), (10, 0)),
        iv((12, 0), (13, 0)),
        iv((15, 0), (16, 0)),
    ]);

    let free = derive_free_windows(&busy, &workday());

    let minutes: Vec<i64> = free.iter().map(Interval::duration_minutes).collect();
    assert_eq!(minutes, vec![30, 120, 120, 60]);
}

#[test]
fn busy_straddling_range_start_advances_cursor() {
    let busy = merge_intervals(vec![iv((8, 0), (9, 30))]);

    let free = derive_free_windows(&busy, &workday());

    assert_eq!(free.windows(), &[iv((9, 30), (17, 0))]);
}

#[test]
fn busy_running_past_range_end_is_clipped() {
    let busy = merge_intervals(vec![iv((16, 0), (19, 0))]);

    let free = derive_free_windows(&busy, &workday());

    assert_eq!(free.windows(), &[iv((9, 0), (16, 0))]);
    assert!(free.iter().all(|w| w.end() <= at(17, 0)));
}

#[test]
fn busy_entirely_outside_the_range_is_ignored() {
    let busy = merge_intervals(vec![iv((6, 0), (7, 0)), iv((18, 0), (20, 0))]);

    let free = derive_free_windows(&busy, &workday());

    assert_eq!(free.windows(), &[iv((9, 0), (17, 0))]);
}

#[test]
fn busy_after_range_does_not_produce_inverted_window() {
    // Unclipped, a block starting after range end would emit (cursor, block.start)
    // past the range boundary.
    let busy = merge_intervals(vec![iv((10, 0), (11, 0)), iv((18, 0), (19, 0))]);

    let free = derive_free_windows(&busy, &workday());

    assert_eq!(free.windows(), &[iv((9, 0), (10, 0)), iv((11, 0), (17, 0))]);
}

#[test]
fn empty_range_has_no_windows() {
    let range = TimeRange::new(at(9, 0), at(9, 0)).unwrap();

    assert!(derive_free_windows(&merge_intervals(vec![]), &range).is_empty());
}

#[test]
fn first_at_least_skips_short_gaps() {
    let busy = merge_intervals(vec![iv((9, 0), (9, 30)), iv((10, 0), (12, 0))]);
    let free = derive_free_windows(&busy, &workday());

    let slot = free.first_at_least(60).unwrap();

    assert_eq!(slot, iv((12, 0), (17, 0)));
}

#[test]
fn first_at_least_returns_none_when_nothing_fits() {
    let busy = merge_intervals(vec![iv((9, 0), (12, 0)), iv((12, 15), (17, 0))]);
    let free = derive_free_windows(&busy, &workday());

    assert!(free.first_at_least(60).is_none());
}

#[test]
fn at_least_filters_short_windows() {
    let busy = merge_intervals(vec![iv((9, 15), (10, 0)), iv((16, 30), (17, 0))]);
    let free = derive_free_windows(&busy, &workday());

    let long = free.at_least(60);

    assert_eq!(free.len(), 2);
    assert_eq!(long.windows(), &[iv((10, 0), (16, 30))]);
}

#[test]
fn zero_length_busy_block_does_not_split_a_window() {
    let busy = merge_intervals(vec![iv((12, 0), (12, 0))]);

    let free = derive_free_windows(&busy, &workday());

    assert_eq!(free.windows(), &[iv((9, 0), (17, 0))]);
}
