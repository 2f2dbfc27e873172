//! TCP connect reachability probe.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::net::TcpStream;

use crate::port::outbound::{ProbeOutcome, ReachabilityProbe};

/// Considers an endpoint reachable when a TCP connection completes within
/// the timeout. The connection is closed immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpProbe;

impl TcpProbe {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ReachabilityProbe for TcpProbe {
    async fn test(&self, host: &str, port: u16, timeout: Duration) -> ProbeOutcome {
        let start = Instant::now();

        match tokio::time::timeout(timeout, TcpStream::connect((host, port))).await {
            Ok(Ok(_stream)) => ProbeOutcome::reachable(start.elapsed()),
            Ok(Err(e)) => ProbeOutcome::unreachable(e.to_string(), start.elapsed()),
            Err(_) => ProbeOutcome::unreachable(
                format!("timed out after {}ms", timeout.as_millis()),
                start.elapsed(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn open_port_is_reachable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let outcome = TcpProbe::new()
            .test("127.0.0.1", port, Duration::from_millis(500))
            .await;
        assert!(outcome.success);
        assert!(outcome.error.is_none());
    }

    #[tokio::test]
    async fn closed_port_is_unreachable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let outcome = TcpProbe::new()
            .test("127.0.0.1", port, Duration::from_millis(500))
            .await;
        assert!(!outcome.success);
        assert!(outcome.error.is_some());
    }
}
