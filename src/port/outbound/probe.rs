//! Reachability probe port.

use std::time::Duration;

use async_trait::async_trait;

/// Outcome of a single reachability test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub success: bool,
    pub error: Option<String>,
    pub elapsed: Duration,
}

impl ProbeOutcome {
    #[must_use]
    pub fn reachable(elapsed: Duration) -> Self {
        Self {
            success: true,
            error: None,
            elapsed,
        }
    }

    #[must_use]
    pub fn unreachable(error: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            elapsed,
        }
    }
}

/// Tests whether `host:port` accepts connections within a timeout.
///
/// Failures are reported in the outcome, never as errors.
#[async_trait]
pub trait ReachabilityProbe: Send + Sync {
    async fn test(&self, host: &str, port: u16, timeout: Duration) -> ProbeOutcome;
}
