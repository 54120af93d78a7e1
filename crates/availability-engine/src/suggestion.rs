//! Contract types for the downstream activity-suggestion generator.
//!
//! The generator receives the group's free windows together with planning
//! preferences and answers with one suggestion per window. Field names are
//! camelCase on the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{AvailabilityError, Result};
use crate::interval::Interval;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetTier {
    Low,
    #[default]
    Medium,
    High,
}

/// Estimated cost per person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CostTier {
    #[serde(rename = "$")]
    Cheap,
    #[serde(rename = "$$")]
    Moderate,
    #[serde(rename = "$$$")]
    Expensive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Setting {
    Indoor,
    Outdoor,
    Either,
}

/// Planning preferences supplied by the caller, everything but the windows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionParams {
    pub location: String,
    pub group_size: u32,
    #[serde(default)]
    pub budget: BudgetTier,
    #[serde(default)]
    pub preferences: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionRequest {
    pub location: String,
    pub group_size: u32,
    pub budget: BudgetTier,
    pub preferences: Vec<String>,
    pub free_windows: Vec<Interval>,
}

impl SuggestionRequest {
    /// # Errors
    /// `InvalidRequest` if the group is empty or the location is blank.
    pub fn new(params: SuggestionParams, free_windows: Vec<Interval>) -> Result<Self> {
        if params.group_size < 1 {
            return Err(AvailabilityError::InvalidRequest(
                "group size must be at least 1".to_string(),
            ));
        }
        if params.location.trim().is_empty() {
            return Err(AvailabilityError::InvalidRequest(
                "location must not be empty".to_string(),
            ));
        }
        Ok(Self {
            location: params.location,
            group_size: params.group_size,
            budget: params.budget,
            preferences: params.preferences,
            free_windows,
        })
    }
}

/// One proposed activity, tied to a free window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivitySuggestion {
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub duration_minutes: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_cost_per_person: Option<CostTier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indoor_outdoor: Option<Setting>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_recommended: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Parse a generator reply. Anything that is not a JSON array of suggestions
/// yields an empty list.
pub fn parse_suggestions(text: &str) -> Vec<ActivitySuggestion> {
    match serde_json::from_str::<Vec<ActivitySuggestion>>(text) {
        Ok(suggestions) => suggestions,
        Err(e) => {
            warn!(error = %e, "discarding unparseable suggestion reply");
            Vec::new()
        }
    }
}
