//! Seams to the external collaborators: the calendar event source and the
//! activity-suggestion generator.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::availability::ParticipantEvents;
use crate::error::SourceError;
use crate::event::RawEvent;
use crate::interval::TimeRange;
use crate::suggestion::{ActivitySuggestion, SuggestionRequest};

/// Tokens the event source uses to act on a participant's behalf.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub access_token: String,
    pub refresh_token: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_token", &"<redacted>")
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub id: String,
    pub credentials: Credentials,
}

impl Participant {
    pub fn new(id: impl Into<String>, credentials: Credentials) -> Self {
        Self {
            id: id.into(),
            credentials,
        }
    }

    /// A participant known only by id, for sources that need no tokens.
    pub fn anonymous(id: impl Into<String>) -> Self {
        Self::new(id, Credentials::default())
    }
}

/// Supplies one participant's raw events within a range, already flattened
/// across all of their calendars.
#[async_trait]
pub trait EventSource: Send + Sync {
    async fn fetch_events(
        &self,
        participant: &Participant,
        range: &TimeRange,
    ) -> Result<Vec<RawEvent>, SourceError>;
}

/// Turns free windows plus preferences into activity suggestions.
#[async_trait]
pub trait SuggestionGenerator: Send + Sync {
    async fn suggest(
        &self,
        request: &SuggestionRequest,
    ) -> Result<Vec<ActivitySuggestion>, SourceError>;
}

/// An event source backed by events held in memory, keyed by participant id.
///
/// Returns every stored event regardless of the requested range; the engine
/// clips to the range itself.
#[derive(Debug, Clone, Default)]
pub struct StaticEventSource {
    events: HashMap<String, Vec<RawEvent>>,
}

impl StaticEventSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, participant: impl Into<String>, events: Vec<RawEvent>) {
        self.events.entry(participant.into()).or_default().extend(events);
    }

    pub fn with_participant(
        mut self,
        participant: impl Into<String>,
        events: Vec<RawEvent>,
    ) -> Self {
        self.insert(participant, events);
        self
    }

    /// Ids in the order they sort, for callers that want "everyone".
    pub fn participant_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.events.keys().cloned().collect();
        ids.sort();
        ids
    }
}

impl FromIterator<ParticipantEvents> for StaticEventSource {
    fn from_iter<T: IntoIterator<Item = ParticipantEvents>>(iter: T) -> Self {
        let mut source = Self::new();
        for p in iter {
            source.insert(p.participant, p.events);
        }
        source
    }
}

#[async_trait]
impl EventSource for StaticEventSource {
    async fn fetch_events(
        &self,
        participant: &Participant,
        _range: &TimeRange,
    ) -> Result<Vec<RawEvent>, SourceError> {
        self.events
            .get(&participant.id)
            .cloned()
            .ok_or_else(|| SourceError::UnknownParticipant(participant.id.clone()))
    }
}
