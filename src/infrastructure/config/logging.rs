//! Logging configuration and initialization.

use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_level() -> String {
    "info".into()
}

fn default_format() -> String {
    "pretty".into()
}

impl LoggingConfig {
    /// Adjust the level from command line verbosity flags.
    ///
    /// `quiet` limits output to warnings; each `-v` steps up from the
    /// configured level (one for debug, two or more for trace).
    #[must_use]
    pub fn with_verbosity(mut self, quiet: bool, verbose: u8) -> Self {
        if quiet {
            self.level = "warn".into();
        } else if verbose == 1 {
            self.level = "debug".into();
        } else if verbose > 1 {
            self.level = "trace".into();
        }
        self
    }

    /// Initialize the tracing subscriber with this logging configuration.
    ///
    /// `RUST_LOG` takes precedence over the configured level. Logs go to
    /// stderr so command output stays clean.
    pub fn init(&self) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level));

        match self.format.as_str() {
            "json" => {
                fmt()
                    .json()
                    .with_env_filter(filter)
                    .with_writer(std::io::stderr)
                    .init();
            }
            _ => {
                fmt()
                    .with_env_filter(filter)
                    .with_writer(std::io::stderr)
                    .init();
            }
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: default_format(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_overrides_level() {
        let base = LoggingConfig::default();
        assert_eq!(base.clone().with_verbosity(true, 2).level, "warn");
        assert_eq!(base.clone().with_verbosity(false, 1).level, "debug");
        assert_eq!(base.clone().with_verbosity(false, 3).level, "trace");
        assert_eq!(base.with_verbosity(false, 0).level, "info");
    }
}
