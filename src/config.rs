//! Runtime settings.
//!
//! Settings come from an optional YAML file. Every field has a default, so a
//! missing file or a partial file both yield a working configuration.
//!
//! ```yaml
//! request_timeout_secs: 20
//! poll_interval_secs: 1800
//! readings_base_url: https://www.katolskakyrkan.se/forsamlingsliv/ordo-och-veckans-lasningar
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{info, instrument};

pub const DEFAULT_CALENDAR_API_URL: &str =
    "http://calapi.inadiutorium.cz/api/v0/en/calendars/default/{year}/{month}/{day}";
pub const DEFAULT_READINGS_BASE_URL: &str =
    "https://www.katolskakyrkan.se/forsamlingsliv/ordo-och-veckans-lasningar";
pub const DEFAULT_MARTYROLOGY_URL: &str = "http://www.boston-catholic-journal.com/1959-roman-martrylogy-in-english/roman-martyrology-1959-{month}-in-english.htm";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Calendar API URL template with `{year}`, `{month}` and `{day}` placeholders.
    pub calendar_api_url: String,
    /// Root of the weekly readings pages; day pages live at `vecka-N/<slug>`.
    pub readings_base_url: String,
    /// Martyrology URL template with a `{month}` placeholder (English month name).
    pub martyrology_url: String,
    pub request_timeout_secs: u64,
    /// How often the stand-in host polls the sensors.
    pub poll_interval_secs: u64,
    pub user_agent: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            calendar_api_url: DEFAULT_CALENDAR_API_URL.to_string(),
            readings_base_url: DEFAULT_READINGS_BASE_URL.to_string(),
            martyrology_url: DEFAULT_MARTYROLOGY_URL.to_string(),
            request_timeout_secs: 30,
            poll_interval_secs: 3600,
            user_agent: concat!("catholic_se/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl Settings {
    /// Load settings from `path`, or return the defaults when no path is given.
    ///
    /// # Arguments
    ///
    /// * `path` - Optional YAML file; missing keys keep their defaults
    ///
    /// # Returns
    ///
    /// The settings, or a [`ConfigError`] when the file cannot be read or
    /// parsed.
    #[instrument(level = "info")]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            info!("No config file given; using defaults");
            return Ok(Self::default());
        };
        let shown = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: shown.clone(),
            source,
        })?;
        let settings = Self::from_yaml(&raw).map_err(|source| ConfigError::Yaml {
            path: shown.clone(),
            source,
        })?;
        info!(path = %shown, "Loaded configuration");
        Ok(settings)
    }

    /// Parse settings from YAML text; an empty document yields the defaults.
    pub fn from_yaml(raw: &str) -> Result<Self, serde_yaml::Error> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw)
    }

    /// Timeout applied to every upstream request.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Delay between polls of the stand-in host, never below one second.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }
}
