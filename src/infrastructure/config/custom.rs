//! Custom registration options file.
//!
//! The registration installer writes operator customizations to a JSON
//! file. Only the `broker` section matters here; other sections are
//! ignored.

use std::path::Path;

use serde::Deserialize;

use crate::application::broker::CustomBrokerOptions;
use crate::error::{ConfigError, Result};

/// Parsed custom options file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomOptions {
    #[serde(default)]
    pub broker: Option<CustomBrokerOptions>,
}

impl CustomOptions {
    /// Parse custom options from JSON content.
    pub fn parse_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content).map_err(ConfigError::ParseCustomOptions)?)
    }

    /// Load custom options from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_json(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_broker_section_and_ignores_others() {
        let options = CustomOptions::parse_json(
            r#"{
                "host_vars": {"foo": "bar"},
                "broker": {"list": ["12", 34], "default": 1}
            }"#,
        )
        .unwrap();

        let broker = options.broker.unwrap();
        assert_eq!(broker.list_index(), Some(1));
        assert!(broker.list.is_some());
    }

    #[test]
    fn missing_broker_section_is_fine() {
        let options = CustomOptions::parse_json("{}").unwrap();
        assert!(options.broker.is_none());
    }

    #[test]
    fn malformed_json_is_config_error() {
        assert!(matches!(
            CustomOptions::parse_json("{"),
            Err(crate::error::Error::Config(ConfigError::ParseCustomOptions(_)))
        ));
    }
}
