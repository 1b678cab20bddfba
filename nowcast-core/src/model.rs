use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::WeatherError;

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

/// What to look up: free text or a coordinate pair.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherQuery {
    Text(String),
    Coordinates(Coordinates),
}

impl WeatherQuery {
    /// Build a free-text query. The text is trimmed and must not be empty.
    pub fn text(text: &str) -> Result<Self, WeatherError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(WeatherError::InvalidInput("search text is empty".to_string()));
        }
        Ok(WeatherQuery::Text(trimmed.to_string()))
    }

    pub fn coordinates(latitude: f64, longitude: f64) -> Self {
        WeatherQuery::Coordinates(Coordinates::new(latitude, longitude))
    }

    /// Value sent as the provider's `q` parameter.
    ///
    /// Coordinates are passed through as a literal `"{lat},{lon}"` pair without
    /// range checks; the provider decides whether they are acceptable.
    pub fn as_param(&self) -> String {
        match self {
            WeatherQuery::Text(text) => text.clone(),
            WeatherQuery::Coordinates(coords) => coords.to_string(),
        }
    }
}

/// Current conditions for one location, as reported by the provider.
///
/// `temperature_c` is always Celsius; display conversion happens at render time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherResult {
    pub location_name: String,
    pub temperature_c: f64,
    pub condition_text: String,
    pub condition_code: i32,
}
