//! Normalize raw provider events into intervals.
//!
//! Each record carries a start and an end marker, each either a precise
//! `dateTime` or an all-day `date`. All-day markers resolve to local midnight:
//! the provider's all-day end date is already exclusive, so `date: 2025-10-05`
//! as an end means "up to the start of the 5th".

use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AvailabilityError, Result};
use crate::interval::{parse_datetime, start_of_day, Interval};

/// A calendar event as delivered by the upstream provider.
///
/// Only the time markers matter for availability; the remaining fields are
/// carried so error messages can name the offending record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default)]
    pub start: Option<EventTime>,
    #[serde(default)]
    pub end: Option<EventTime>,
}

/// One end of an event: a timed instant, an all-day date, or (malformed) neither.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTime {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

impl EventTime {
    pub fn timed(date_time: impl Into<String>) -> Self {
        Self {
            date_time: Some(date_time.into()),
            ..Self::default()
        }
    }

    pub fn all_day(date: impl Into<String>) -> Self {
        Self {
            date: Some(date.into()),
            ..Self::default()
        }
    }

    pub fn with_time_zone(mut self, tz: impl Into<String>) -> Self {
        self.time_zone = Some(tz.into());
        self
    }
}

impl RawEvent {
    pub fn new(start: EventTime, end: EventTime) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Convert one raw event into an interval.
///
/// `dateTime` takes precedence over `date` when a marker has both. Naive
/// datetimes and all-day dates resolve in the marker's `timeZone`, falling
/// back to `default_tz`.
///
/// # Errors
/// `MalformedEvent` if a marker is missing, unparseable, names an unknown
/// timezone, or if end precedes start.
pub fn normalize_event(event: &RawEvent, default_tz: Tz) -> Result<Interval> {
    normalize_labeled(event, &label(event, None), default_tz)
}

/// Convert a batch of raw events into intervals sorted ascending by start.
///
/// The first malformed record fails the whole batch.
pub fn normalize_events(events: &[RawEvent], default_tz: Tz) -> Result<Vec<Interval>> {
    let mut intervals = events
        .iter()
        .enumerate()
        .map(|(index, event)| normalize_labeled(event, &label(event, Some(index)), default_tz))
        .collect::<Result<Vec<_>>>()?;

    intervals.sort();
    debug!(count = intervals.len(), "normalized events");
    Ok(intervals)
}

fn normalize_labeled(event: &RawEvent, label: &str, default_tz: Tz) -> Result<Interval> {
    let start = resolve_marker(event.start.as_ref(), "start", label, default_tz)?;
    let end = resolve_marker(event.end.as_ref(), "end", label, default_tz)?;

    if end < start {
        return Err(AvailabilityError::malformed(
            label,
            format!("end {} precedes start {}", end.to_rfc3339(), start.to_rfc3339()),
        ));
    }
    Ok(Interval::ordered(start, end))
}

fn resolve_marker(
    marker: Option<&EventTime>,
    which: &str,
    label: &str,
    default_tz: Tz,
) -> Result<chrono::DateTime<chrono::Utc>> {
    let marker = marker
        .ok_or_else(|| AvailabilityError::malformed(label, format!("missing {which} marker")))?;

    let tz = match marker.time_zone.as_deref() {
        Some(name) => name.parse::<Tz>().map_err(|_| {
            AvailabilityError::malformed(label, format!("{which}: unknown timeZone '{name}'"))
        })?,
        None => default_tz,
    };

    if let Some(date_time) = marker.date_time.as_deref() {
        return parse_datetime(date_time, tz)
            .map_err(|reason| AvailabilityError::malformed(label, format!("{which}: {reason}")));
    }

    if let Some(date) = marker.date.as_deref() {
        let day = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").map_err(|e| {
            AvailabilityError::malformed(label, format!("{which}: invalid date '{date}': {e}"))
        })?;
        return start_of_day(day, tz)
            .map_err(|reason| AvailabilityError::malformed(label, format!("{which}: {reason}")));
    }

    Err(AvailabilityError::malformed(
        label,
        format!("{which} has neither dateTime nor date"),
    ))
}

/// Name an event for error messages: its id, else its position in the batch.
fn label(event: &RawEvent, index: Option<usize>) -> String {
    match (&event.id, index) {
        (Some(id), _) => format!("'{id}'"),
        (None, Some(index)) => format!("#{index}"),
        (None, None) => "<unnamed>".to_string(),
    }
}
