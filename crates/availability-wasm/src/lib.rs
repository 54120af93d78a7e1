//! WASM bindings for availability-engine.
//!
//! Exposes busy merging and free-time derivation to JavaScript via
//! `wasm-bindgen`. Participants and events cross the boundary as JSON strings
//! in the calendar provider's event shape; results come back as JSON strings.
//! Errors are thrown as `"<kind>: <detail>"` strings, where `kind` is the
//! engine's snake_case error kind.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p availability-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target nodejs --out-dir packages/availability-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/availability_wasm.wasm
//! ```

use availability_engine::availability::{
    merged_busy_timeline, participant_free_time, shared_availability, ParticipantEvents,
    PrivacyLevel,
};
use availability_engine::{AvailabilityError, RawEvent, TimeRange};
use chrono_tz::Tz;
use serde::Serialize;
use wasm_bindgen::prelude::*;

type EngineResult<T> = Result<T, AvailabilityError>;

// ---------------------------------------------------------------------------
// Boundary helpers
// ---------------------------------------------------------------------------

fn parse_timezone(timezone: &str) -> EngineResult<Tz> {
    timezone
        .parse::<Tz>()
        .map_err(|_| AvailabilityError::InvalidTimezone(timezone.to_string()))
}

fn parse_privacy(privacy: Option<&str>) -> EngineResult<PrivacyLevel> {
    match privacy {
        None | Some("opaque") => Ok(PrivacyLevel::Opaque),
        Some("full") => Ok(PrivacyLevel::Full),
        Some(other) => Err(AvailabilityError::InvalidRequest(format!(
            "unknown privacy level '{}', expected 'full' or 'opaque'",
            other
        ))),
    }
}

fn parse_json<T: serde::de::DeserializeOwned>(json: &str, what: &str) -> EngineResult<T> {
    serde_json::from_str(json)
        .map_err(|e| AvailabilityError::InvalidRequest(format!("Invalid {} JSON: {}", what, e)))
}

fn to_json<T: Serialize>(value: &T) -> EngineResult<String> {
    serde_json::to_string(value)
        .map_err(|e| AvailabilityError::InvalidRequest(format!("Serialization error: {}", e)))
}

fn to_js_error(err: AvailabilityError) -> JsValue {
    JsValue::from_str(&format!("{}: {}", err.kind().as_str(), err))
}

fn shared_free_time_json(
    participants_json: &str,
    start: &str,
    end: &str,
    timezone: &str,
    privacy: Option<&str>,
) -> EngineResult<String> {
    let tz = parse_timezone(timezone)?;
    let privacy = parse_privacy(privacy)?;
    let range = TimeRange::parse(start, end, tz)?;
    let participants: Vec<ParticipantEvents> = parse_json(participants_json, "participants")?;

    to_json(&shared_availability(&participants, &range, tz, privacy)?)
}

fn free_time_json(
    events_json: &str,
    start: &str,
    end: &str,
    timezone: &str,
) -> EngineResult<String> {
    let tz = parse_timezone(timezone)?;
    let range = TimeRange::parse(start, end, tz)?;
    let events: Vec<RawEvent> = parse_json(events_json, "events")?;

    to_json(&participant_free_time(&events, &range, tz)?)
}

fn merge_busy_json(participants_json: &str, timezone: &str) -> EngineResult<String> {
    let tz = parse_timezone(timezone)?;
    let participants: Vec<ParticipantEvents> = parse_json(participants_json, "participants")?;

    to_json(&merged_busy_timeline(&participants, tz)?)
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Compute the windows inside `[start, end]` when every participant is free.
///
/// `participants_json` is an array of `{id, events}` objects. Naive `start`,
/// `end` and event times are read in `timezone` (IANA name). `privacy` is
/// `"full"` or `"opaque"` (the default). Returns the `SharedAvailability`
/// object as JSON: `{start_range, end_range, busy, shared_free_time, privacy}`.
#[wasm_bindgen(js_name = "sharedFreeTime")]
pub fn shared_free_time(
    participants_json: &str,
    start: &str,
    end: &str,
    timezone: &str,
    privacy: Option<String>,
) -> Result<String, JsValue> {
    shared_free_time_json(participants_json, start, end, timezone, privacy.as_deref())
        .map_err(to_js_error)
}

/// Free windows of a single calendar. `events_json` is an array of events.
#[wasm_bindgen(js_name = "freeTime")]
pub fn free_time(
    events_json: &str,
    start: &str,
    end: &str,
    timezone: &str,
) -> Result<String, JsValue> {
    free_time_json(events_json, start, end, timezone).map_err(to_js_error)
}

/// Merged busy timeline of all participants, without clipping to a range.
#[wasm_bindgen(js_name = "mergeBusy")]
pub fn merge_busy(participants_json: &str, timezone: &str) -> Result<String, JsValue> {
    merge_busy_json(participants_json, timezone).map_err(to_js_error)
}
