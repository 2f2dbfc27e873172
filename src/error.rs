use thiserror::Error;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("custom broker list found but is invalid: missing '{key}' in broker.default")]
    InvalidCustomDefaults { key: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),

    #[error("failed to parse custom options: {0}")]
    ParseCustomOptions(#[source] serde_json::Error),
}

/// Errors returned by the Circonus API or the COSI defaults service.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("API returned an empty body for {path} (status {status})")]
    NullBody {
        path: String,
        status: u16,
        raw_body: String,
    },

    #[error("API error for {path}: status {status}")]
    Status {
        path: String,
        status: u16,
        raw_body: String,
    },

    #[error("unable to decode response from {path}: {reason}")]
    Decode { path: String, reason: String },

    #[error("unable to connect to {url}")]
    Unreachable { url: String },
}

impl ApiError {
    /// HTTP status attached to the error, when one was received.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::NullBody { status, .. } | ApiError::Status { status, .. } => Some(*status),
            ApiError::Decode { .. } | ApiError::Unreachable { .. } => None,
        }
    }

    /// Raw response body, for diagnostics.
    #[must_use]
    pub fn raw_body(&self) -> Option<&str> {
        match self {
            ApiError::NullBody { raw_body, .. } | ApiError::Status { raw_body, .. } => {
                Some(raw_body)
            }
            ApiError::Decode { .. } | ApiError::Unreachable { .. } => None,
        }
    }
}

/// Broker lookup and selection failures.
///
/// Every variant is terminal for the registration run that triggered it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BrokerError {
    #[error("invalid broker id '{id}', must only be digits")]
    InvalidId { id: String },

    #[error("no broker found with id {id}")]
    NotFound { id: String },

    #[error("unable to determine default broker to use for '{check_type}'")]
    SelectionExhausted { check_type: String },

    #[error("invalid default broker {name} is not valid for '{check_type}'")]
    InvalidSelection { name: String, check_type: String },

    #[error(
        "broker type set to \"enterprise\", {valid} enterprise brokers found but none could be reached"
    )]
    EnterpriseUnreachable { check_type: String, valid: usize },

    #[error("broker type set to \"enterprise\", no enterprise brokers found for '{check_type}'")]
    NoEnterpriseBrokers { check_type: String },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Broker(#[from] BrokerError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_errors_surface_as_config_errors() {
        let err = crate::infrastructure::config::settings::Config::load("/nonexistent/cosi.toml")
            .unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::ReadFile(_))));

        let err = crate::infrastructure::config::custom::CustomOptions::parse_json("{").unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::ParseCustomOptions(_))));
    }

    #[test]
    fn api_error_exposes_status_and_body() {
        let err = ApiError::Status {
            path: "/broker".into(),
            status: 403,
            raw_body: "denied".into(),
        };
        assert_eq!(err.status(), Some(403));
        assert_eq!(err.raw_body(), Some("denied"));
        assert_eq!(ApiError::Unreachable { url: "x".into() }.status(), None);
    }
}
