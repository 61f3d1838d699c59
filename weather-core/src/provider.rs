use crate::{
    Config, PlaceQuery, RemotePlace, WeatherError, WeatherSnapshot,
    provider::weatherapi::WeatherApiProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod weatherapi;

/// Source of current conditions and place suggestions.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Current conditions for a place.
    async fn fetch_current(&self, place: &PlaceQuery) -> Result<WeatherSnapshot, WeatherError>;

    /// Places whose name matches partial text.
    async fn search_places(&self, text: &str) -> Result<Vec<RemotePlace>, WeatherError>;
}

/// Construct the weatherapi.com provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.require_api_key()?;
    let provider = WeatherApiProvider::new(api_key.to_owned(), config.client.clone())?;
    Ok(Box::new(provider))
}

/// Make a provider-relative icon reference absolute with `scheme`.
///
/// `//cdn/x.png` and `http://cdn/x.png` both become `{scheme}://cdn/x.png`.
/// URLs that already use `scheme` are returned unchanged.
pub fn normalize_icon_url(icon: &str, scheme: &str) -> String {
    let icon = icon.trim();
    if icon.is_empty() {
        return String::new();
    }
    if let Some(rest) = icon.strip_prefix("//") {
        return format!("{scheme}://{rest}");
    }
    if let Some(rest) = icon.strip_prefix("http://") {
        return format!("{scheme}://{rest}");
    }
    icon.to_string()
}
