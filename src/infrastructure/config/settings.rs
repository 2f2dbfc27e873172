//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application settings.
//! Configuration is loaded from a TOML file with an environment variable
//! override for the API token (`COSI_API_KEY`).
//!
//! # Example
//!
//! ```no_run
//! use cosi_broker::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.logging.init();
//!     Ok(())
//! }
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use super::custom::CustomOptions;
use super::logging::LoggingConfig;
use crate::application::broker::{CustomBrokerOptions, SelectionOptions};
use crate::domain::IdValue;
use crate::error::{ConfigError, Result};

/// Environment variable that overrides `api.key`.
pub const API_KEY_ENV: &str = "COSI_API_KEY";

/// Circonus API settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// API token. Prefer setting `COSI_API_KEY` over writing it to disk.
    #[serde(default)]
    pub key: String,
    /// Application name registered with the token.
    #[serde(default = "default_api_app")]
    pub app: String,
    #[serde(default = "default_api_url")]
    pub url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            key: String::new(),
            app: default_api_app(),
            url: default_api_url(),
        }
    }
}

fn default_api_app() -> String {
    "cosi".into()
}

fn default_api_url() -> String {
    "https://api.circonus.com/v2/".into()
}

/// COSI service settings.
#[derive(Debug, Clone, Deserialize)]
pub struct CosiConfig {
    #[serde(default = "default_cosi_url")]
    pub url: String,
}

impl Default for CosiConfig {
    fn default() -> Self {
        Self {
            url: default_cosi_url(),
        }
    }
}

fn default_cosi_url() -> String {
    "https://onestep.circonus.com/".into()
}

/// Broker selection overrides.
#[derive(Debug, Clone, Deserialize)]
pub struct BrokerConfig {
    /// Broker to use for every check type.
    #[serde(default)]
    pub id: Option<IdValue>,
    /// Broker type; `enterprise` restricts selection to enterprise brokers.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    /// Connect timeout for enterprise broker probes, in milliseconds.
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            id: None,
            kind: None,
            probe_timeout_ms: default_probe_timeout_ms(),
        }
    }
}

const fn default_probe_timeout_ms() -> u64 {
    500
}

/// Main application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub cosi: CosiConfig,

    #[serde(default)]
    pub broker: BrokerConfig,

    /// JSON file with operator customizations for registration.
    #[serde(default)]
    pub custom_options_file: Option<PathBuf>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation
    /// fails.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;

        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                config.api.key = key;
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the TOML content is
    /// malformed or validation fails.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Apply command line overrides and re-validate.
    pub fn with_overrides(
        mut self,
        broker_id: Option<String>,
        broker_type: Option<String>,
    ) -> Result<Self> {
        if let Some(id) = broker_id {
            if id.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "broker.id",
                    reason: "must not be empty".to_string(),
                }
                .into());
            }
            self.broker.id = Some(IdValue::Text(id));
        }
        if let Some(kind) = broker_type {
            self.broker.kind = Some(kind);
        }
        self.validate()?;
        Ok(self)
    }

    /// Broker id override, ignoring blank values.
    #[must_use]
    pub fn broker_id(&self) -> Option<String> {
        self.broker
            .id
            .as_ref()
            .filter(|id| !id.is_blank())
            .map(IdValue::as_text)
    }

    /// Load the custom options file, if one is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn custom_options(&self) -> Result<CustomOptions> {
        match &self.custom_options_file {
            Some(path) if !path.as_os_str().is_empty() => CustomOptions::load(path),
            _ => Ok(CustomOptions::default()),
        }
    }

    /// Selection options combining these settings with the custom `broker`
    /// section.
    #[must_use]
    pub fn selection_options(&self, custom: CustomBrokerOptions) -> SelectionOptions {
        SelectionOptions {
            broker_id: self.broker_id(),
            broker_type: self.broker.kind.clone().filter(|t| !t.trim().is_empty()),
            custom,
            probe_timeout: Duration::from_millis(self.broker.probe_timeout_ms),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.api.key.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "api.key" }.into());
        }
        if self.api.url.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "api.url" }.into());
        }
        if self.cosi.url.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "cosi.url" }.into());
        }
        if let Some(id) = self.broker_id() {
            if !id.bytes().all(|b| b.is_ascii_digit()) {
                return Err(ConfigError::InvalidValue {
                    field: "broker.id",
                    reason: format!("'{id}' should be a number"),
                }
                .into());
            }
        }
        if self.broker.probe_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "broker.probe_timeout_ms",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ConfigError::InvalidValue {
                field: "logging.format",
                reason: "must be \"pretty\" or \"json\"".to_string(),
            }
            .into());
        }
        Ok(())
    }
}
