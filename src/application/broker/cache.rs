//! Process-lifetime cache of the broker list and default broker mapping.
//!
//! Both values are fetched at most once. Concurrent first callers wait on
//! the same fetch; a failed fetch leaves the cell empty so the error reaches
//! every caller that triggered it.

use std::sync::Arc;

use serde_json::{Map, Value};
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::domain::{Broker, BrokerId, DefaultBrokerMap};
use crate::error::{ApiError, BrokerError, Result};
use crate::port::outbound::{BrokerApi, DefaultsSource};

/// API path listing every broker available to the token.
pub const BROKER_PATH: &str = "/broker";

/// Find a broker by id in an already fetched list and return a copy of it.
///
/// # Errors
///
/// Returns [`BrokerError::NotFound`] when no broker carries the id.
pub fn lookup(brokers: &[Broker], id: &BrokerId) -> std::result::Result<Broker, BrokerError> {
    let cid = id.cid();
    brokers
        .iter()
        .find(|b| b.cid() == cid)
        .cloned()
        .ok_or_else(|| BrokerError::NotFound {
            id: id.to_string(),
        })
}

/// Shared broker data for one registration run.
///
/// Construct once and hand an `Arc` to every consumer.
pub struct BrokerListCache {
    api: Arc<dyn BrokerApi>,
    defaults_source: Arc<dyn DefaultsSource>,
    custom_defaults: Option<Map<String, Value>>,
    brokers: OnceCell<Vec<Broker>>,
    defaults: OnceCell<DefaultBrokerMap>,
}

impl BrokerListCache {
    /// Create an empty cache.
    ///
    /// `custom_defaults` is the custom options `broker.default` section, if
    /// the operator supplied one; it replaces the remote defaults service.
    #[must_use]
    pub fn new(
        api: Arc<dyn BrokerApi>,
        defaults_source: Arc<dyn DefaultsSource>,
        custom_defaults: Option<Map<String, Value>>,
    ) -> Self {
        Self {
            api,
            defaults_source,
            custom_defaults,
            brokers: OnceCell::new(),
            defaults: OnceCell::new(),
        }
    }

    /// Brokers with at least one active member, in API order.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the API returns no body or a status outside
    /// `[200, 400)`, or a body that is not a broker list.
    pub async fn brokers(&self) -> Result<&[Broker]> {
        self.brokers
            .get_or_try_init(|| self.fetch_brokers())
            .await
            .map(Vec::as_slice)
    }

    /// Default broker mapping, from custom options or the COSI service.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidCustomDefaults`](crate::error::ConfigError::InvalidCustomDefaults)
    /// for an incomplete custom section, or whatever the defaults source
    /// reports.
    pub async fn default_brokers(&self) -> Result<&DefaultBrokerMap> {
        self.defaults.get_or_try_init(|| self.load_defaults()).await
    }

    /// Copy of the broker with the given id.
    ///
    /// The id is validated before the broker list is consulted.
    ///
    /// # Errors
    ///
    /// Returns [`BrokerError::InvalidId`] for a non-numeric id and
    /// [`BrokerError::NotFound`] when no cached broker matches.
    pub async fn broker_by_id(&self, id: &str) -> Result<Broker> {
        let id = BrokerId::parse(id)?;
        let brokers = self.brokers().await?;
        Ok(lookup(brokers, &id)?)
    }

    async fn fetch_brokers(&self) -> Result<Vec<Broker>> {
        info!("Fetching broker list from Circonus");

        let response = self.api.get(BROKER_PATH, None).await?;
        let ok_status = response.is_ok_status();

        let Some(body) = response.body else {
            return Err(ApiError::NullBody {
                path: BROKER_PATH.to_string(),
                status: response.status,
                raw_body: response.raw_body,
            }
            .into());
        };

        if !ok_status {
            return Err(ApiError::Status {
                path: BROKER_PATH.to_string(),
                status: response.status,
                raw_body: response.raw_body,
            }
            .into());
        }

        let all: Vec<Broker> = serde_json::from_value(body).map_err(|e| ApiError::Decode {
            path: BROKER_PATH.to_string(),
            reason: e.to_string(),
        })?;

        let total = all.len();
        let brokers: Vec<Broker> = all
            .into_iter()
            .filter(Broker::has_active_detail)
            .collect();

        debug!(total, active = brokers.len(), "Fetched broker list");
        Ok(brokers)
    }

    async fn load_defaults(&self) -> Result<DefaultBrokerMap> {
        debug!("Checking custom configuration for default broker list");

        if let Some(section) = &self.custom_defaults {
            let map = DefaultBrokerMap::from_custom(section)?;
            info!(entries = map.len(), "Using custom default broker list");
            return Ok(map);
        }

        info!("Fetching default broker list from COSI");
        let map = self.defaults_source.fetch().await?;
        debug!(entries = map.len(), "Fetched default broker list");
        Ok(map)
    }
}
