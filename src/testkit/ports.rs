//! In-memory port implementations for testing.
//!
//! - [`FakeApi`] - Replays one scripted [`ApiResponse`] for every request.
//! - [`FakeDefaults`] - Returns a fixed default map, or fails as if the
//!   COSI service refused the connection.
//! - [`FakeProbe`] - Treats a fixed set of hosts as reachable.
//!
//! Each fake counts its calls so tests can assert what was (not) consulted.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use super::domain::broker_list_json;
use crate::domain::{Broker, DefaultBrokerMap};
use crate::error::{ApiError, Result};
use crate::port::outbound::{ApiResponse, BrokerApi, DefaultsSource, ProbeOutcome, ReachabilityProbe};

// ---------------------------------------------------------------------------
// FakeApi
// ---------------------------------------------------------------------------

pub struct FakeApi {
    response: ApiResponse,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl FakeApi {
    /// Respond with `body` and `status`.
    pub fn responding(body: Option<Value>, status: u16) -> Self {
        let raw_body = body.as_ref().map(Value::to_string).unwrap_or_default();
        Self {
            response: ApiResponse {
                body,
                status,
                raw_body,
            },
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Respond with `brokers` and status 200.
    pub fn with_brokers(brokers: &[Broker]) -> Self {
        Self::responding(Some(broker_list_json(brokers)), 200)
    }

    /// Hold every response back for `delay`, to widen race windows.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BrokerApi for FakeApi {
    async fn get(&self, _path: &str, _params: Option<&[(&str, &str)]>) -> Result<ApiResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.response.clone())
    }
}

// ---------------------------------------------------------------------------
// FakeDefaults
// ---------------------------------------------------------------------------

pub struct FakeDefaults {
    map: Option<DefaultBrokerMap>,
    calls: AtomicUsize,
}

impl FakeDefaults {
    pub fn new(map: DefaultBrokerMap) -> Self {
        Self {
            map: Some(map),
            calls: AtomicUsize::new(0),
        }
    }

    /// Empty mapping: the platform policy never yields a broker.
    pub fn empty() -> Self {
        Self::new(DefaultBrokerMap::new())
    }

    /// Fail every fetch with [`ApiError::Unreachable`].
    pub fn unreachable() -> Self {
        Self {
            map: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DefaultsSource for FakeDefaults {
    async fn fetch(&self) -> Result<DefaultBrokerMap> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.map {
            Some(map) => Ok(map.clone()),
            None => Err(ApiError::Unreachable {
                url: "http://cosi.invalid/brokers".to_string(),
            }
            .into()),
        }
    }
}

// ---------------------------------------------------------------------------
// FakeProbe
// ---------------------------------------------------------------------------

pub struct FakeProbe {
    reachable: HashSet<String>,
    calls: AtomicUsize,
}

impl FakeProbe {
    /// Only the listed hosts accept connections.
    pub fn reachable(hosts: &[&str]) -> Self {
        Self {
            reachable: hosts.iter().map(|h| (*h).to_string()).collect(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Nothing accepts connections.
    pub fn none() -> Self {
        Self::reachable(&[])
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReachabilityProbe for FakeProbe {
    async fn test(&self, host: &str, _port: u16, _timeout: Duration) -> ProbeOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.reachable.contains(host) {
            ProbeOutcome::reachable(Duration::from_millis(1))
        } else {
            ProbeOutcome::unreachable("connection refused", Duration::from_millis(1))
        }
    }
}
