//! Core library for the `weather` search tool.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The weatherapi.com client behind the `WeatherProvider` trait
//! - Persisted search history and autocomplete suggestions
//! - The search controller that drives a search box UI
//!
//! It is used by `weather-cli`, but carries no terminal code and can back other front-ends.

pub mod config;
pub mod controller;
pub mod error;
pub mod history;
pub mod model;
pub mod panel;
pub mod provider;
pub mod request;
pub mod suggest;

pub use config::{ClientConfig, Config};
pub use controller::{Key, SearchController};
pub use error::WeatherError;
pub use history::{FileStorage, HISTORY_KEY, HISTORY_LIMIT, HistoryStorage, HistoryStore, MemoryStorage};
pub use model::{PlaceQuery, RemotePlace, SuggestionItem, UiState, WeatherSnapshot};
pub use panel::SuggestionPanel;
pub use provider::{WeatherProvider, provider_from_config};
pub use request::{RequestId, RequestRegion};
pub use suggest::SuggestionProvider;
