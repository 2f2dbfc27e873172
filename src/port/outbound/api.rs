//! Monitoring API port.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

/// A response from the monitoring API.
///
/// Non-success statuses are not errors at this level; callers decide what
/// counts as a failure.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// Parsed JSON body, `None` when the body was empty, `null` or not JSON.
    pub body: Option<Value>,
    /// HTTP status code.
    pub status: u16,
    /// Body exactly as received.
    pub raw_body: String,
}

impl ApiResponse {
    /// Whether the status is in `[200, 400)`.
    #[must_use]
    pub fn is_ok_status(&self) -> bool {
        (200..400).contains(&self.status)
    }
}

/// Authenticated read access to the monitoring API.
///
/// # Errors
///
/// [`get`](Self::get) fails only on transport errors.
#[async_trait]
pub trait BrokerApi: Send + Sync {
    /// Issue a GET request for `path` (e.g. `/broker`) with optional query
    /// parameters.
    async fn get(&self, path: &str, params: Option<&[(&str, &str)]>) -> Result<ApiResponse>;
}
