//! The availability orchestrator.
//!
//! Fetches every participant's events through an [`EventSource`], runs them
//! through normalize → merge → derive and returns the shared free windows.
//! Fetches run concurrently; the first failure drops the rest and fails the
//! whole computation.

use chrono_tz::Tz;
use futures::future::try_join_all;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::availability::{self, availability_from_busy, ParticipantBusy, SharedAvailability};
use crate::config::EngineConfig;
use crate::error::{AvailabilityError, Result, SourceError};
use crate::event::{normalize_events, RawEvent};
use crate::freebusy::FreeWindowSet;
use crate::interval::TimeRange;
use crate::source::{EventSource, Participant, SuggestionGenerator};
use crate::suggestion::{ActivitySuggestion, SuggestionParams, SuggestionRequest};

/// Shared availability plus the activities proposed for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityPlan {
    pub availability: SharedAvailability,
    pub suggestions: Vec<ActivitySuggestion>,
}

pub struct AvailabilityService<S> {
    config: EngineConfig,
    timezone: Tz,
    source: S,
}

impl<S: EventSource> AvailabilityService<S> {
    /// # Errors
    /// `InvalidTimezone` if the configured default timezone is unknown.
    pub fn new(config: EngineConfig, source: S) -> Result<Self> {
        let timezone = config.timezone()?;
        Ok(Self {
            config,
            timezone,
            source,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Windows within `range` when every participant is free.
    ///
    /// # Errors
    /// - `NoParticipants` for an empty participant list.
    /// - `ParticipantUnavailable` if any participant's fetch fails, times out,
    ///   or returns events that cannot be normalized.
    pub async fn shared_free_time(
        &self,
        range: &TimeRange,
        participants: &[Participant],
    ) -> Result<SharedAvailability> {
        if participants.is_empty() {
            return Err(AvailabilityError::NoParticipants);
        }
        info!(
            participants = participants.len(),
            start = %range.start(),
            end = %range.end(),
            "computing shared free time"
        );

        let busy = try_join_all(participants.iter().map(|p| self.busy_for(p, range))).await?;
        let result = availability_from_busy(&busy, range, self.config.privacy);

        debug!(
            busy_blocks = result.busy.len(),
            free_windows = result.shared_free_time.len(),
            "shared free time computed"
        );
        Ok(result)
    }

    /// Fetch-and-derive for a single participant.
    ///
    /// Errors are reported as-is (`Fetch`, `MalformedEvent`), not wrapped in
    /// `ParticipantUnavailable`.
    pub async fn participant_free_time(
        &self,
        range: &TimeRange,
        participant: &Participant,
    ) -> Result<FreeWindowSet> {
        let events = self.fetch(participant, range).await?;
        availability::participant_free_time(&events, range, self.timezone)
    }

    /// Compute shared free time and ask `generator` for activities that fit it.
    ///
    /// Windows shorter than `min_window_minutes` are not offered. When no
    /// window remains the generator is not called.
    pub async fn plan_activities<G>(
        &self,
        range: &TimeRange,
        participants: &[Participant],
        params: SuggestionParams,
        generator: &G,
    ) -> Result<ActivityPlan>
    where
        G: SuggestionGenerator + ?Sized,
    {
        // Validate the request before spending any fetches on it.
        let mut request = SuggestionRequest::new(params, Vec::new())?;

        let availability = self.shared_free_time(range, participants).await?;
        request.free_windows = availability
            .shared_free_time
            .at_least(self.config.min_window_minutes)
            .into_inner();

        if request.free_windows.is_empty() {
            info!("no free window long enough, skipping suggestions");
            return Ok(ActivityPlan {
                availability,
                suggestions: Vec::new(),
            });
        }

        let suggestions = generator
            .suggest(&request)
            .await
            .map_err(AvailabilityError::Suggestion)?;
        info!(count = suggestions.len(), "received activity suggestions");

        Ok(ActivityPlan {
            availability,
            suggestions,
        })
    }

    async fn busy_for(
        &self,
        participant: &Participant,
        range: &TimeRange,
    ) -> Result<ParticipantBusy> {
        let events = self
            .fetch(participant, range)
            .await
            .map_err(|e| AvailabilityError::unavailable(&participant.id, e))?;
        let intervals = normalize_events(&events, self.timezone).map_err(|e| {
            warn!(participant = %participant.id, error = %e, "participant events rejected");
            AvailabilityError::unavailable(&participant.id, e)
        })?;
        Ok(ParticipantBusy {
            participant: participant.id.clone(),
            intervals,
        })
    }

    async fn fetch(&self, participant: &Participant, range: &TimeRange) -> Result<Vec<RawEvent>> {
        let timeout = self.config.fetch_timeout();
        match tokio::time::timeout(timeout, self.source.fetch_events(participant, range)).await {
            Ok(Ok(events)) => {
                debug!(participant = %participant.id, count = events.len(), "fetched events");
                Ok(events)
            }
            Ok(Err(e)) => {
                warn!(participant = %participant.id, error = %e, "event fetch failed");
                Err(AvailabilityError::Fetch(e))
            }
            Err(_) => {
                warn!(participant = %participant.id, ?timeout, "event fetch timed out");
                Err(AvailabilityError::Fetch(SourceError::TimedOut(timeout)))
            }
        }
    }
}
