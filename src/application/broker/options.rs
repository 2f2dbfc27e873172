//! Selection options: operator overrides and the custom `broker` section.

use std::time::Duration;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::domain::IdValue;

/// Probe timeout used when none is configured.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_millis(500);

const ENTERPRISE: &str = "enterprise";

/// The `broker.default` value of the custom options file.
///
/// It is overloaded: alongside `broker.list` it is an index into that list,
/// on its own it is a full default broker mapping.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CustomDefault {
    Index(i64),
    Map(Map<String, Value>),
    /// Anything else; ignored with a warning at selection time.
    Other(Value),
}

/// The `broker` section of the custom options file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CustomBrokerOptions {
    /// Specific broker to use.
    #[serde(default)]
    pub id: Option<IdValue>,
    /// Candidate brokers; kept loose so a malformed list is ignored rather
    /// than rejected.
    #[serde(default)]
    pub list: Option<Value>,
    #[serde(default)]
    pub default: Option<CustomDefault>,
}

impl CustomBrokerOptions {
    /// Id set through `broker.id`, ignoring blank values.
    #[must_use]
    pub fn explicit_id(&self) -> Option<&IdValue> {
        self.id.as_ref().filter(|id| !id.is_blank())
    }

    /// Index into `broker.list`, when `broker.default` is a number.
    #[must_use]
    pub fn list_index(&self) -> Option<i64> {
        match self.default {
            Some(CustomDefault::Index(idx)) => Some(idx),
            _ => None,
        }
    }

    /// Default broker mapping, when `broker.default` is an object.
    #[must_use]
    pub fn default_map(&self) -> Option<&Map<String, Value>> {
        match &self.default {
            Some(CustomDefault::Map(map)) => Some(map),
            _ => None,
        }
    }
}

/// Everything the selector needs besides the broker data itself.
#[derive(Debug, Clone)]
pub struct SelectionOptions {
    /// Broker id given on the command line (`cosi_broker_id`).
    pub broker_id: Option<String>,
    /// Broker type given on the command line (`cosi_broker_type`).
    pub broker_type: Option<String>,
    pub custom: CustomBrokerOptions,
    /// How long an enterprise broker member may take to accept a connection.
    pub probe_timeout: Duration,
}

impl Default for SelectionOptions {
    fn default() -> Self {
        Self {
            broker_id: None,
            broker_type: None,
            custom: CustomBrokerOptions::default(),
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }
}

impl SelectionOptions {
    /// True when only enterprise brokers are acceptable.
    #[must_use]
    pub fn force_enterprise(&self) -> bool {
        self.broker_type
            .as_deref()
            .is_some_and(|t| t.trim().eq_ignore_ascii_case(ENTERPRISE))
    }
}
