//! Platform default broker source.

use async_trait::async_trait;

use crate::domain::DefaultBrokerMap;
use crate::error::Result;

/// Remote service publishing the default broker per check type.
#[async_trait]
pub trait DefaultsSource: Send + Sync {
    /// Fetch the current mapping.
    ///
    /// # Errors
    ///
    /// Returns an API error for non-200 responses or undecodable bodies, and
    /// [`ApiError::Unreachable`](crate::error::ApiError::Unreachable) when the
    /// service refuses the connection.
    async fn fetch(&self) -> Result<DefaultBrokerMap>;
}
