use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::WeatherError;

/// A trimmed, non-empty place name entered or selected by the user.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlaceQuery(String);

impl PlaceQuery {
    pub fn parse(raw: &str) -> Result<Self, WeatherError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(WeatherError::Validation);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlaceQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for PlaceQuery {
    type Error = WeatherError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

/// A match returned by the provider's place search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemotePlace {
    pub name: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub country: String,
}

/// One row of the suggestion list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuggestionItem {
    /// A previously searched place; can be deleted from the list.
    History(String),
    /// A place from the remote search endpoint.
    Remote(RemotePlace),
    /// Separates history matches from remote matches. Never selectable.
    Divider,
}

impl SuggestionItem {
    /// The place name to query when this item is activated.
    pub fn place(&self) -> Option<&str> {
        match self {
            SuggestionItem::History(place) => Some(place),
            SuggestionItem::Remote(remote) => Some(&remote.name),
            SuggestionItem::Divider => None,
        }
    }

    pub fn is_selectable(&self) -> bool {
        !matches!(self, SuggestionItem::Divider)
    }

    pub fn is_deletable(&self) -> bool {
        matches!(self, SuggestionItem::History(_))
    }
}

/// Current conditions for one completed lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSnapshot {
    pub icon_url: String,
    pub condition: String,
    /// Exact provider value; use [`WeatherSnapshot::temperature_rounded`] for display.
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub location_name: String,
    pub country: String,
    pub humidity_pct: u8,
    pub wind_kph: f64,
    pub observed_at: Option<DateTime<Utc>>,
}

impl WeatherSnapshot {
    pub fn temperature_rounded(&self) -> i64 {
        self.temperature_c.round() as i64
    }

    /// Place label, optionally followed by the country.
    pub fn label(&self, with_country: bool) -> String {
        if with_country && !self.country.is_empty() {
            format!("{}, {}", self.location_name, self.country)
        } else {
            self.location_name.clone()
        }
    }
}

/// What the search area shows. Exactly one at a time.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum UiState {
    #[default]
    Idle,
    Loading,
    Success(WeatherSnapshot),
    Error(String),
}

impl UiState {
    pub fn loading_visible(&self) -> bool {
        matches!(self, UiState::Loading)
    }

    pub fn result(&self) -> Option<&WeatherSnapshot> {
        match self {
            UiState::Success(snapshot) => Some(snapshot),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            UiState::Error(message) => Some(message),
            _ => None,
        }
    }
}
