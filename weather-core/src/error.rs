use thiserror::Error;

/// Failures surfaced by a weather lookup.
///
/// Every variant is recoverable: the search controller renders it as a
/// single user-visible message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WeatherError {
    /// The query was empty after trimming.
    #[error("Please enter a city name.")]
    Validation,

    /// The provider did not recognize the place.
    #[error("City not found.")]
    NotFound,

    /// The provider answered with a non-success status other than not-found.
    #[error("Weather service error. (status {0})")]
    Service(u16),

    /// The request never produced a response.
    #[error("Network error: {0}")]
    Network(String),

    /// A success response whose body could not be understood.
    #[error("Unexpected response from weather service: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            WeatherError::Parse(err.to_string())
        } else {
            WeatherError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for WeatherError {
    fn from(err: serde_json::Error) -> Self {
        WeatherError::Parse(err.to_string())
    }
}
