//! Multi-participant availability with privacy-preserving output.
//!
//! Takes each participant's raw events, normalizes them, merges everyone's busy
//! time into one timeline and derives the windows when all participants are
//! free. This is the pure half of the pipeline; [`crate::service`] adds the
//! fetching.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{AvailabilityError, Result};
use crate::event::{normalize_events, RawEvent};
use crate::freebusy::{derive_free_windows, FreeWindowSet};
use crate::interval::{Interval, TimeRange};
use crate::merge::{merge_busy, BusyTimeline};

/// One participant's already-flattened events (all calendars concatenated).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantEvents {
    #[serde(alias = "id")]
    pub participant: String,
    #[serde(default)]
    pub events: Vec<RawEvent>,
}

/// One participant's normalized busy intervals, sorted by start.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticipantBusy {
    pub participant: String,
    pub intervals: Vec<Interval>,
}

/// Privacy level for availability output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrivacyLevel {
    /// Busy blocks report how many participants are busy in them.
    Full,
    /// Only busy/free time ranges; `participant_count` is always 0.
    #[default]
    Opaque,
}

/// A merged busy block in the shared view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusyBlock {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Participants with busy time inside this block. 0 under `Opaque`.
    pub participant_count: usize,
}

/// Shared availability of a group within a range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SharedAvailability {
    pub start_range: DateTime<Utc>,
    pub end_range: DateTime<Utc>,
    pub busy: Vec<BusyBlock>,
    pub shared_free_time: FreeWindowSet,
    pub privacy: PrivacyLevel,
}

/// Normalize every participant's events.
///
/// A participant whose events cannot be normalized fails the whole batch with
/// `ParticipantUnavailable`, carrying the underlying `MalformedEvent`.
pub fn normalize_participants(
    participants: &[ParticipantEvents],
    default_tz: Tz,
) -> Result<Vec<ParticipantBusy>> {
    participants
        .iter()
        .map(|p| {
            normalize_events(&p.events, default_tz)
                .map(|intervals| ParticipantBusy {
                    participant: p.participant.clone(),
                    intervals,
                })
                .map_err(|e| AvailabilityError::unavailable(&p.participant, e))
        })
        .collect()
}

/// Compute the windows within `range` when every participant is free.
///
/// A participant with no events is free for the whole range.
///
/// # Errors
/// - `NoParticipants` for an empty participant list.
/// - `ParticipantUnavailable` if any participant's events cannot be normalized.
pub fn shared_availability(
    participants: &[ParticipantEvents],
    range: &TimeRange,
    default_tz: Tz,
    privacy: PrivacyLevel,
) -> Result<SharedAvailability> {
    if participants.is_empty() {
        return Err(AvailabilityError::NoParticipants);
    }
    let busy = normalize_participants(participants, default_tz)?;
    Ok(availability_from_busy(&busy, range, privacy))
}

/// The merge + derive steps over already-normalized participants.
pub fn availability_from_busy(
    participants: &[ParticipantBusy],
    range: &TimeRange,
    privacy: PrivacyLevel,
) -> SharedAvailability {
    let per_participant: Vec<Vec<Interval>> =
        participants.iter().map(|p| p.intervals.clone()).collect();
    let timeline = merge_busy(&per_participant).clip_to(range);
    let shared_free_time = derive_free_windows(&timeline, range);

    let busy = match privacy {
        PrivacyLevel::Full => busy_blocks_with_counts(participants, &timeline, range),
        PrivacyLevel::Opaque => timeline
            .iter()
            .map(|block| BusyBlock {
                start: block.start(),
                end: block.end(),
                participant_count: 0,
            })
            .collect(),
    };

    SharedAvailability {
        start_range: range.start(),
        end_range: range.end(),
        busy,
        shared_free_time,
        privacy,
    }
}

/// Free time of a single participant within `range`.
///
/// Unlike [`shared_availability`], a malformed event surfaces directly as
/// `MalformedEvent`.
pub fn participant_free_time(
    events: &[RawEvent],
    range: &TimeRange,
    default_tz: Tz,
) -> Result<FreeWindowSet> {
    let intervals = normalize_events(events, default_tz)?;
    let timeline = merge_busy(&[intervals]);
    Ok(derive_free_windows(&timeline, range))
}

/// Merge every participant's events into one busy timeline, unbounded by any range.
pub fn merged_busy_timeline(
    participants: &[ParticipantEvents],
    default_tz: Tz,
) -> Result<BusyTimeline> {
    let busy = normalize_participants(participants, default_tz)?;
    let per_participant: Vec<Vec<Interval>> = busy.into_iter().map(|p| p.intervals).collect();
    Ok(merge_busy(&per_participant))
}

/// For each merged block, count the participants with at least one interval
/// overlapping it (after clipping to the range).
fn busy_blocks_with_counts(
    participants: &[ParticipantBusy],
    timeline: &BusyTimeline,
    range: &TimeRange,
) -> Vec<BusyBlock> {
    timeline
        .iter()
        .map(|block| {
            let participant_count = participants
                .iter()
                .filter(|p| {
                    p.intervals.iter().any(|interval| {
                        interval
                            .clip_to(range)
                            .is_some_and(|clipped| occupies(&clipped, block))
                    })
                })
                .count();
            BusyBlock {
                start: block.start(),
                end: block.end(),
                participant_count,
            }
        })
        .collect()
}

/// Whether `interval` contributes to `block`. Zero-length intervals count when
/// they sit inside the block, since they never overlap in the strict sense.
fn occupies(interval: &Interval, block: &Interval) -> bool {
    interval.overlaps(block)
        || (interval.start() == interval.end()
            && block.start() <= interval.start()
            && interval.start() <= block.end())
}
