//! Tests for merging busy intervals across participants.

use availability_engine::interval::{Interval, TimeRange};
use availability_engine::merge::{merge_busy, merge_intervals};
use chrono::{DateTime, TimeZone, Utc};

fn at(hour: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, 4, hour, min, 0).unwrap()
}

fn iv(start: (u32, u32), end: (u32, u32)) -> Interval {
    Interval::new(at(start.0, start.1), at(end.0, end.1)).unwrap()
}

#[test]
fn empty_input_yields_empty_timeline() {
    assert!(merge_busy(&[]).is_empty());
    assert!(merge_busy(&[vec![], vec![]]).is_empty());
}

#[test]
fn overlapping_intervals_across_participants_merge() {
    // 9:00-10:00 and 9:30-11:00 → 9:00-11:00
    let alice = vec![iv((9, 0), (10, 0))];
    let bob = vec![iv((9, 30), (11, 0))];

    let timeline = merge_busy(&[alice, bob]);

    assert_eq!(timeline.intervals(), &[iv((9, 0), (11, 0))]);
}

#[test]
fn touching_intervals_merge_into_one() {
    // 9:00-12:00 and 12:00-13:00 → 9:00-13:00
    let timeline = merge_busy(&[vec![iv((9, 0), (12, 0)), iv((12, 0), (13, 0))]]);

    assert_eq!(timeline.len(), 1);
    assert_eq!(timeline.intervals()[0], iv((9, 0), (13, 0)));
}

#[test]
fn disjoint_intervals_stay_separate_and_sorted() {
    let alice = vec![iv((14, 0), (15, 0))];
    let bob = vec![iv((9, 0), (10, 0))];

    let timeline = merge_busy(&[alice, bob]);

    assert_eq!(
        timeline.intervals(),
        &[iv((9, 0), (10, 0)), iv((14, 0), (15, 0))]
    );
}

#[test]
fn nested_interval_is_absorbed() {
    let timeline = merge_intervals(vec![iv((9, 0), (17, 0)), iv((11, 0), (12, 0))]);

    assert_eq!(timeline.intervals(), &[iv((9, 0), (17, 0))]);
}

#[test]
fn equal_starts_merge_to_longest_end() {
    let timeline = merge_intervals(vec![
        iv((9, 0), (9, 30)),
        iv((9, 0), (11, 0)),
        iv((9, 0), (10, 0)),
    ]);

    assert_eq!(timeline.intervals(), &[iv((9, 0), (11, 0))]);
}

#[test]
fn cascading_overlaps_chain_into_one_block() {
    let timeline = merge_busy(&[
        vec![iv((9, 0), (10, 30))],
        vec![iv((10, 0), (11, 30))],
        vec![iv((11, 0), (12, 0))],
    ]);

    assert_eq!(timeline.intervals(), &[iv((9, 0), (12, 0))]);
}

#[test]
fn participant_order_does_not_matter() {
    let a = vec![iv((9, 0), (10, 0)), iv((13, 0), (14, 0))];
    let b = vec![iv((9, 45), (11, 0))];
    let c = vec![iv((16, 0), (16, 30))];

    let forward = merge_busy(&[a.clone(), b.clone(), c.clone()]);
    let backward = merge_busy(&[c, b, a]);

    assert_eq!(forward, backward);
}

#[test]
fn merging_a_timeline_again_changes_nothing() {
    let timeline = merge_busy(&[
        vec![iv((9, 0), (10, 0)), iv((9, 30), (11, 0))],
        vec![iv((12, 0), (13, 0))],
    ]);

    let again = merge_intervals(timeline.intervals().iter().copied());

    assert_eq!(again, timeline);
}

#[test]
fn clip_trims_straddling_blocks_and_drops_outside_ones() {
    let timeline = merge_intervals(vec![
        iv((6, 0), (7, 0)),
        iv((8, 0), (10, 0)),
        iv((16, 0), (18, 0)),
        iv((19, 0), (20, 0)),
    ]);
    let range = TimeRange::new(at(9, 0), at(17, 0)).unwrap();

    let clipped = timeline.clip_to(&range);

    assert_eq!(
        clipped.intervals(),
        &[iv((9, 0), (10, 0)), iv((16, 0), (17, 0))]
    );
}

#[test]
fn clip_drops_blocks_that_only_touch_the_range() {
    let timeline = merge_intervals(vec![iv((8, 0), (9, 0)), iv((17, 0), (18, 0))]);
    let range = TimeRange::new(at(9, 0), at(17, 0)).unwrap();

    assert!(timeline.clip_to(&range).is_empty());
}

#[test]
fn timeline_serializes_as_plain_array() {
    let timeline = merge_intervals(vec![iv((9, 0), (10, 0))]);

    let json = serde_json::to_value(&timeline).unwrap();

    assert_eq!(
        json,
        serde_json::json!([{"start": "2025-10-04T09:00:00Z", "end": "2025-10-04T10:00:00Z"}])
    );
}
