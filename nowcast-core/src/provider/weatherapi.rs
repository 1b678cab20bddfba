use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::{
    config::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS},
    error::WeatherError,
    model::{WeatherQuery, WeatherResult},
};

use super::WeatherProvider;

const CURRENT_ENDPOINT: &str = "current.json";

/// Client for WeatherAPI.com's current conditions endpoint.
#[derive(Debug, Clone)]
pub struct WeatherApiProvider {
    api_key: String,
    endpoint: Url,
    http: Client,
}

impl WeatherApiProvider {
    pub fn new(api_key: String) -> Result<Self, WeatherError> {
        Self::with_options(api_key, DEFAULT_BASE_URL, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_options(
        api_key: String,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, WeatherError> {
        let endpoint =
            Url::parse(&format!("{}/{CURRENT_ENDPOINT}", base_url.trim_end_matches('/')))?;
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self { api_key, endpoint, http })
    }

    /// Full request URL for `query`, including the API key.
    pub fn request_url(&self, query: &WeatherQuery) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("key", &self.api_key)
            .append_pair("q", &query.as_param());
        url
    }

    /// Look up current conditions by free text. Blank text fails without a request.
    pub async fn fetch_by_query(&self, text: &str) -> Result<WeatherResult, WeatherError> {
        let query = WeatherQuery::text(text)?;
        self.fetch(&query).await
    }

    pub async fn fetch_by_coordinates(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<WeatherResult, WeatherError> {
        self.fetch(&WeatherQuery::coordinates(latitude, longitude)).await
    }

    async fn fetch(&self, query: &WeatherQuery) -> Result<WeatherResult, WeatherError> {
        // the URL carries the key, so only the query is logged
        debug!(q = %query.as_param(), "requesting current weather");

        let res = self.http.get(self.request_url(query)).send().await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(WeatherError::Api {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let parsed: WaResponse = serde_json::from_str(&body)?;
        Ok(parsed.into())
    }
}

#[derive(Debug, Deserialize)]
struct WaLocation {
    name: String,
}

#[derive(Debug, Deserialize)]
struct WaCondition {
    text: String,
    code: i32,
}

#[derive(Debug, Deserialize)]
struct WaCurrent {
    temp_c: f64,
    condition: WaCondition,
}

#[derive(Debug, Deserialize)]
struct WaResponse {
    location: WaLocation,
    current: WaCurrent,
}

impl From<WaResponse> for WeatherResult {
    fn from(res: WaResponse) -> Self {
        WeatherResult {
            location_name: res.location.name,
            temperature_c: res.current.temp_c,
            condition_text: res.current.condition.text,
            condition_code: res.current.condition.code,
        }
    }
}

/// Error envelope: `{"error": {"code": 1006, "message": "No matching location found."}}`
#[derive(Debug, Deserialize)]
struct WaErrorEnvelope {
    error: WaErrorBody,
}

#[derive(Debug, Deserialize)]
struct WaErrorBody {
    message: String,
}

#[async_trait]
impl WeatherProvider for WeatherApiProvider {
    async fn current(&self, query: &WeatherQuery) -> Result<WeatherResult, WeatherError> {
        match query {
            WeatherQuery::Text(text) => self.fetch_by_query(text).await,
            WeatherQuery::Coordinates(coords) => {
                self.fetch_by_coordinates(coords.latitude, coords.longitude).await
            }
        }
    }
}

fn error_message(body: &str) -> String {
    match serde_json::from_str::<WaErrorEnvelope>(body) {
        Ok(envelope) => envelope.error.message,
        Err(_) => truncate_body(body),
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}
