use crate::{
    Config, WeatherQuery, WeatherResult, error::WeatherError,
    provider::weatherapi::WeatherApiProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod weatherapi;

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Current conditions for `query`. Issues at most one request.
    async fn current(&self, query: &WeatherQuery) -> Result<WeatherResult, WeatherError>;
}

/// Construct the WeatherAPI.com provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.api_key()?;

    let provider =
        WeatherApiProvider::with_options(api_key.to_owned(), config.base_url(), config.timeout())?;

    Ok(Box::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        let err = provider_from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("No API key configured"));
    }

    #[test]
    fn provider_from_config_rejects_bad_base_url() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".into());
        cfg.base_url = Some("not a url".into());

        let err = provider_from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("Invalid endpoint URL"));
    }

    #[test]
    fn provider_from_config_works_when_configured() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".into());

        assert!(provider_from_config(&cfg).is_ok());
    }
}
