use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{model::Coordinates, units::TemperatureUnit};

pub const DEFAULT_BASE_URL: &str = "https://api.weatherapi.com/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

pub const ENV_API_KEY: &str = "NOWCAST_API_KEY";
pub const ENV_BASE_URL: &str = "NOWCAST_BASE_URL";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// units = "fahrenheit"
///
/// [location]
/// latitude = 48.85
/// longitude = 2.35
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// WeatherAPI.com key. Never compiled in; comes from this file or `NOWCAST_API_KEY`.
    pub api_key: Option<String>,

    /// Provider base URL, without the endpoint path.
    pub base_url: Option<String>,

    pub timeout_secs: Option<u64>,

    /// Initial display unit.
    #[serde(default)]
    pub units: TemperatureUnit,

    /// Fixed device location used by the location button.
    pub location: Option<Coordinates>,
}

impl Config {
    /// Load config from disk (or defaults on first run) and apply environment overrides.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        let mut cfg = Self::load_from(&path)?;
        cfg.apply_overrides(|name| std::env::var(name).ok());
        Ok(cfg)
    }

    /// Load config from an explicit path, or return an empty default if it doesn't exist yet.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to the platform config directory.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "nowcast", "nowcast")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Apply overrides looked up by variable name; non-empty values win over the file.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty(ENV_API_KEY) {
            self.api_key = Some(key);
        }
        if let Some(url) = non_empty(ENV_BASE_URL) {
            self.base_url = Some(url);
        }
    }

    /// Returns the API key, or an error explaining how to configure one.
    pub fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                anyhow!(
                    "No API key configured.\n\
                     Hint: run `nowcast configure` or set {ENV_API_KEY}."
                )
            })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    /// Request timeout; a missing or zero `timeout_secs` means the default.
    pub fn timeout(&self) -> Duration {
        let secs = self.timeout_secs.filter(|s| *s > 0).unwrap_or(DEFAULT_TIMEOUT_SECS);
        Duration::from_secs(secs)
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    pub fn set_location(&mut self, location: Option<Coordinates>) {
        self.location = location;
    }
}
