use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::{
    ClientConfig, PlaceQuery, RemotePlace, WeatherError, WeatherSnapshot,
    provider::normalize_icon_url,
};

use super::WeatherProvider;

/// Client for weatherapi.com `current.json` and `search.json`.
#[derive(Debug, Clone)]
pub struct WeatherApiProvider {
    api_key: String,
    config: ClientConfig,
    http: Client,
}

impl WeatherApiProvider {
    pub fn new(api_key: String, config: ClientConfig) -> Result<Self, WeatherError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { api_key, config, http })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn endpoint(&self, name: &str) -> String {
        format!("{}/{name}", self.config.base_url.trim_end_matches('/'))
    }

    fn classify_status(&self, status: StatusCode) -> Option<WeatherError> {
        if status.is_success() {
            None
        } else if self.config.not_found_statuses.contains(&status.as_u16()) {
            Some(WeatherError::NotFound)
        } else {
            Some(WeatherError::Service(status.as_u16()))
        }
    }

    fn snapshot_from(&self, parsed: WaResponse) -> WeatherSnapshot {
        let observed_at = parsed
            .current
            .last_updated_epoch
            .or(parsed.location.localtime_epoch)
            .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0));

        WeatherSnapshot {
            icon_url: normalize_icon_url(&parsed.current.condition.icon, &self.config.icon_scheme),
            condition: parsed.current.condition.text,
            temperature_c: parsed.current.temp_c,
            feels_like_c: parsed.current.feelslike_c.unwrap_or(parsed.current.temp_c),
            location_name: parsed.location.name,
            country: parsed.location.country,
            humidity_pct: parsed.current.humidity,
            wind_kph: parsed.current.wind_kph,
            observed_at,
        }
    }
}

#[derive(Debug, Deserialize)]
struct WaLocation {
    name: String,
    #[serde(default)]
    country: String,
    localtime_epoch: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct WaCondition {
    text: String,
    #[serde(default)]
    icon: String,
}

#[derive(Debug, Deserialize)]
struct WaCurrent {
    temp_c: f64,
    feelslike_c: Option<f64>,
    humidity: u8,
    wind_kph: f64,
    condition: WaCondition,
    last_updated_epoch: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct WaResponse {
    location: WaLocation,
    current: WaCurrent,
}

#[async_trait]
impl WeatherProvider for WeatherApiProvider {
    #[instrument(skip(self, place), fields(place = %place))]
    async fn fetch_current(&self, place: &PlaceQuery) -> Result<WeatherSnapshot, WeatherError> {
        let res = self
            .http
            .get(self.endpoint("current.json"))
            .query(&[("key", self.api_key.as_str()), ("q", place.as_str()), ("aqi", "no")])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;
        debug!(%status, "weatherapi current response");

        if let Some(err) = self.classify_status(status) {
            debug!(body = %truncate_body(&body), "weatherapi current request failed");
            return Err(err);
        }

        let parsed: WaResponse = serde_json::from_str(&body)?;
        Ok(self.snapshot_from(parsed))
    }

    #[instrument(skip(self))]
    async fn search_places(&self, text: &str) -> Result<Vec<RemotePlace>, WeatherError> {
        let res = self
            .http
            .get(self.endpoint("search.json"))
            .query(&[("key", self.api_key.as_str()), ("q", text)])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;
        debug!(%status, "weatherapi search response");

        if !status.is_success() {
            debug!(body = %truncate_body(&body), "weatherapi search request failed");
            return Err(WeatherError::Service(status.as_u16()));
        }

        Ok(serde_json::from_str(&body)?)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
