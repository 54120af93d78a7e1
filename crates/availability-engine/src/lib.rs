//! # availability-engine
//!
//! Shared free-time computation for groups of calendar-bearing participants.
//!
//! Raw provider events are normalized into UTC intervals, merged across every
//! participant into a single busy timeline, and complemented within a bounded
//! range to yield the windows when everyone is free. Fetching events and
//! generating activity suggestions are external collaborators reached through
//! the traits in [`source`].
//!
//! ## Modules
//!
//! - [`interval`]: `Interval` and the bounding `TimeRange`
//! - [`event`]: raw provider records → sorted intervals
//! - [`merge`]: N interval lists → one non-overlapping `BusyTimeline`
//! - [`freebusy`]: busy timeline → `FreeWindowSet` within a range
//! - [`availability`]: pure multi-participant pipeline with privacy levels
//! - [`suggestion`]: request/response contract of the suggestion generator
//! - [`config`]: engine and provider configuration
//! - [`source`]: collaborator traits (feature `service`)
//! - [`service`]: async orchestrator (feature `service`)
//! - [`error`]: error types

pub mod availability;
pub mod config;
pub mod error;
pub mod event;
pub mod freebusy;
pub mod interval;
pub mod merge;
#[cfg(feature = "service")]
pub mod service;
#[cfg(feature = "service")]
pub mod source;
pub mod suggestion;

pub use availability::{
    participant_free_time, shared_availability, BusyBlock, ParticipantEvents, PrivacyLevel,
    SharedAvailability,
};
pub use config::{ConfigHealth, EngineConfig};
pub use error::{AvailabilityError, ErrorKind, SourceError};
pub use event::{normalize_event, normalize_events, EventTime, RawEvent};
pub use freebusy::{derive_free_windows, FreeWindowSet};
pub use interval::{Interval, TimeRange};
pub use merge::{merge_busy, merge_intervals, BusyTimeline};
pub use suggestion::{ActivitySuggestion, BudgetTier, SuggestionParams, SuggestionRequest};
#[cfg(feature = "service")]
pub use service::{ActivityPlan, AvailabilityService};
#[cfg(feature = "service")]
pub use source::{Credentials, EventSource, Participant, StaticEventSource, SuggestionGenerator};
