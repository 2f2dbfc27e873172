//! Broker identifier types with proper encapsulation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BrokerError;

/// Path prefix used by the Circonus API for broker resources.
pub const BROKER_CID_PREFIX: &str = "/broker/";

/// Broker identifier - a non-empty string of ASCII digits.
///
/// The inner String is private to ensure all construction goes through
/// [`BrokerId::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct BrokerId(String);

impl BrokerId {
    /// Validate and wrap a broker id.
    ///
    /// # Errors
    ///
    /// Returns [`BrokerError::InvalidId`] when the value is empty or contains
    /// anything other than the digits `0-9`.
    pub fn parse(id: impl AsRef<str>) -> Result<Self, BrokerError> {
        let id = id.as_ref();
        if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
            return Err(BrokerError::InvalidId { id: id.to_string() });
        }
        Ok(Self(id.to_string()))
    }

    /// Extract the id from a composed identifier such as `/broker/1234`.
    pub fn from_cid(cid: &str) -> Result<Self, BrokerError> {
        Self::parse(cid.strip_prefix(BROKER_CID_PREFIX).unwrap_or(cid))
    }

    /// The composed identifier (`/broker/<id>`) used by the API.
    #[must_use]
    pub fn cid(&self) -> String {
        format!("{BROKER_CID_PREFIX}{}", self.0)
    }

    /// Get the broker ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BrokerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BrokerId {
    type Err = BrokerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<u64> for BrokerId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

/// A broker id as written by hand in configuration files.
///
/// Installers and operators write ids both as JSON/TOML numbers and as
/// strings; this keeps the raw text so validation happens at the point of use.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum IdValue {
    Number(u64),
    Text(String),
}

impl IdValue {
    /// Raw textual form, unvalidated.
    #[must_use]
    pub fn as_text(&self) -> String {
        match self {
            IdValue::Number(n) => n.to_string(),
            IdValue::Text(s) => s.clone(),
        }
    }

    /// Validate into a [`BrokerId`].
    pub fn to_broker_id(&self) -> Result<BrokerId, BrokerError> {
        BrokerId::parse(self.as_text())
    }

    /// True for values that count as "unset" (empty string or zero).
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            IdValue::Number(n) => *n == 0,
            IdValue::Text(s) => s.trim().is_empty(),
        }
    }
}

impl fmt::Display for IdValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_text())
    }
}
