use thiserror::Error;

/// Errors produced while looking up the weather.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// The user (or platform) refused access to the device location.
    #[error("Location permission denied")]
    PermissionDenied,

    /// The location service could not produce a coordinate reading.
    #[error("Location unavailable: {0}")]
    Location(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid endpoint URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Transport failure (connect, timeout, body read).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("Weather provider returned {status}: {message}")]
    Api { status: u16, message: String },

    /// A background lookup ended without a result (it panicked or was cancelled).
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// The payload did not match the expected JSON shape.
    #[error("Failed to decode weather response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl WeatherError {
    pub fn is_network(&self) -> bool {
        matches!(self, WeatherError::Network(_))
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, WeatherError::Decode(_))
    }
}
