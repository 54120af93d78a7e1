//! Engine and provider configuration.
//!
//! Read once at process start and passed explicitly into the service; nothing
//! in the engine consults the environment on its own.

use std::path::Path;
use std::time::Duration;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::availability::PrivacyLevel;
use crate::error::{AvailabilityError, Result};

pub const DEFAULT_SUGGESTION_MODEL: &str = "gemini-1.5-flash";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// IANA timezone for naive datetimes and all-day events without their own zone.
    pub default_timezone: String,
    /// Upper bound on a single participant's event fetch.
    pub fetch_timeout_secs: u64,
    pub privacy: PrivacyLevel,
    /// Free windows shorter than this are not offered to the suggestion generator.
    pub min_window_minutes: i64,
    pub calendar: Option<CalendarProviderConfig>,
    pub suggestions: Option<SuggestionProviderConfig>,
}

/// OAuth client registration for the calendar provider.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarProviderConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: Option<String>,
}

#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionProviderConfig {
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
}

/// Which provider settings are present, without exposing any secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigHealth {
    pub has_suggestion_key: bool,
    pub has_calendar_client: bool,
    pub redirect_uri: Option<String>,
}

fn default_model() -> String {
    DEFAULT_SUGGESTION_MODEL.to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_timezone: "UTC".to_string(),
            fetch_timeout_secs: 30,
            privacy: PrivacyLevel::default(),
            min_window_minutes: 0,
            calendar: None,
            suggestions: None,
        }
    }
}

impl std::fmt::Debug for CalendarProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CalendarProviderConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("redirect_uri", &self.redirect_uri)
            .finish()
    }
}

impl std::fmt::Debug for SuggestionProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuggestionProviderConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .finish()
    }
}

impl EngineConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(s).map_err(|e| AvailabilityError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            AvailabilityError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Build a config from `(key, value)` pairs, typically `std::env::vars()`.
    ///
    /// Recognized keys: `GOOGLE_CLIENT_ID`, `GOOGLE_CLIENT_SECRET`,
    /// `GOOGLE_REDIRECT_URI`, `GEMINI_API_KEY`, `GEMINI_MODEL`,
    /// `AVAILABILITY_TIMEZONE`, `AVAILABILITY_FETCH_TIMEOUT_SECS`,
    /// `AVAILABILITY_MIN_WINDOW_MINUTES`. Empty values count as unset.
    pub fn from_env_vars<I, K, V>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut config = Self::default();
        let mut client_id = None;
        let mut client_secret = None;
        let mut redirect_uri = None;
        let mut api_key = None;
        let mut model = None;

        for (key, value) in vars {
            let value: String = value.into();
            if value.trim().is_empty() {
                continue;
            }
            match key.as_ref() {
                "GOOGLE_CLIENT_ID" => client_id = Some(value),
                "GOOGLE_CLIENT_SECRET" => client_secret = Some(value),
                "GOOGLE_REDIRECT_URI" => redirect_uri = Some(value),
                "GEMINI_API_KEY" => api_key = Some(value),
                "GEMINI_MODEL" => model = Some(value),
                "AVAILABILITY_TIMEZONE" => config.default_timezone = value,
                "AVAILABILITY_FETCH_TIMEOUT_SECS" => {
                    config.fetch_timeout_secs = parse_number(&key, &value)?;
                }
                "AVAILABILITY_MIN_WINDOW_MINUTES" => {
                    config.min_window_minutes = parse_number(&key, &value)?;
                }
                _ => {}
            }
        }

        config.calendar = match (client_id, client_secret) {
            (Some(client_id), Some(client_secret)) => Some(CalendarProviderConfig {
                client_id,
                client_secret,
                redirect_uri,
            }),
            (None, None) => None,
            _ => {
                return Err(AvailabilityError::Config(
                    "GOOGLE_CLIENT_ID and GOOGLE_CLIENT_SECRET must be set together".to_string(),
                ))
            }
        };
        config.suggestions = api_key.map(|api_key| SuggestionProviderConfig {
            api_key,
            model: model.unwrap_or_else(default_model),
        });

        config.validate()?;
        Ok(config)
    }

    /// The configured default timezone.
    pub fn timezone(&self) -> Result<Tz> {
        self.default_timezone
            .parse::<Tz>()
            .map_err(|_| AvailabilityError::InvalidTimezone(self.default_timezone.clone()))
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn health(&self) -> ConfigHealth {
        ConfigHealth {
            has_suggestion_key: self.suggestions.is_some(),
            has_calendar_client: self.calendar.is_some(),
            redirect_uri: self.calendar.as_ref().and_then(|c| c.redirect_uri.clone()),
        }
    }

    fn validate(&self) -> Result<()> {
        self.timezone()?;
        if self.fetch_timeout_secs == 0 {
            return Err(AvailabilityError::Config(
                "fetch_timeout_secs must be positive".to_string(),
            ));
        }
        if self.min_window_minutes < 0 {
            return Err(AvailabilityError::Config(
                "min_window_minutes must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(key: impl AsRef<str>, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        AvailabilityError::Config(format!("{} is not a number: '{}'", key.as_ref(), value))
    })
}
