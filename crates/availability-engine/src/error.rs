//! Error types for availability computations.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AvailabilityError {
    /// A raw event record could not be turned into an interval.
    #[error("Malformed event {event}: {reason}")]
    MalformedEvent { event: String, reason: String },

    #[error("Invalid range: start {start} is after end {end}")]
    InvalidRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// One participant's fetch or normalization failed, so no shared result exists.
    #[error("Participant {participant} unavailable: {source}")]
    ParticipantUnavailable {
        participant: String,
        #[source]
        source: Box<AvailabilityError>,
    },

    #[error("At least one participant is required")]
    NoParticipants,

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Event fetch failed: {0}")]
    Fetch(#[from] SourceError),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Suggestion generator failed: {0}")]
    Suggestion(#[source] SourceError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Failures reported by external collaborators (calendar source, suggestion generator).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("unknown participant: {0}")]
    UnknownParticipant(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("timed out after {0:?}")]
    TimedOut(Duration),
}

/// Machine-readable failure category, paired with the `Display` text as the detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    MalformedEvent,
    InvalidRange,
    ParticipantUnavailable,
    NoParticipants,
    InvalidTimezone,
    Fetch,
    InvalidRequest,
    Suggestion,
    Config,
}

impl AvailabilityError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MalformedEvent { .. } => ErrorKind::MalformedEvent,
            Self::InvalidRange { .. } => ErrorKind::InvalidRange,
            Self::ParticipantUnavailable { .. } => ErrorKind::ParticipantUnavailable,
            Self::NoParticipants => ErrorKind::NoParticipants,
            Self::InvalidTimezone(_) => ErrorKind::InvalidTimezone,
            Self::Fetch(_) => ErrorKind::Fetch,
            Self::InvalidRequest(_) => ErrorKind::InvalidRequest,
            Self::Suggestion(_) => ErrorKind::Suggestion,
            Self::Config(_) => ErrorKind::Config,
        }
    }

    /// The innermost engine error, looking through `ParticipantUnavailable` wrappers.
    pub fn root_cause(&self) -> &AvailabilityError {
        match self {
            Self::ParticipantUnavailable { source, .. } => source.root_cause(),
            other => other,
        }
    }

    pub(crate) fn malformed(event: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedEvent {
            event: event.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn unavailable(participant: impl Into<String>, cause: AvailabilityError) -> Self {
        Self::ParticipantUnavailable {
            participant: participant.into(),
            source: Box::new(cause),
        }
    }
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MalformedEvent => "malformed_event",
            Self::InvalidRange => "invalid_range",
            Self::ParticipantUnavailable => "participant_unavailable",
            Self::NoParticipants => "no_participants",
            Self::InvalidTimezone => "invalid_timezone",
            Self::Fetch => "fetch",
            Self::InvalidRequest => "invalid_request",
            Self::Suggestion => "suggestion",
            Self::Config => "config",
        }
    }
}

pub type Result<T> = std::result::Result<T, AvailabilityError>;
