//! Default broker selection.
//!
//! For a check type, the first of these policies to produce a broker wins:
//!
//! 1. **Custom** - the command line broker id, then the custom options
//!    `broker.id`, then a pick from `broker.list`. The chosen broker must
//!    support the check type or the policy yields nothing.
//! 2. **Enterprise** - a random reachable enterprise broker supporting the
//!    check type.
//! 3. **Platform** - the COSI default mapping.
//!
//! The winner is re-validated and memoized per check type.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::cache::{lookup, BrokerListCache};
use super::options::{CustomDefault, SelectionOptions};
use crate::domain::{choose_index, Broker, BrokerId, BrokerKind, DefaultEntry, IdValue, ListChoice};
use crate::error::{BrokerError, ConfigError, Result};
use crate::port::outbound::ReachabilityProbe;

/// Picks and remembers the default broker for each check type.
pub struct BrokerSelector {
    cache: Arc<BrokerListCache>,
    probe: Arc<dyn ReachabilityProbe>,
    options: SelectionOptions,
    chosen: Mutex<HashMap<String, Broker>>,
    rng: Mutex<StdRng>,
}

impl BrokerSelector {
    #[must_use]
    pub fn new(
        cache: Arc<BrokerListCache>,
        probe: Arc<dyn ReachabilityProbe>,
        options: SelectionOptions,
    ) -> Self {
        Self {
            cache,
            probe,
            options,
            chosen: Mutex::new(HashMap::new()),
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Use a deterministic random source for list and enterprise picks.
    #[must_use]
    pub fn with_seed(self, seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            ..self
        }
    }

    #[must_use]
    pub fn cache(&self) -> &Arc<BrokerListCache> {
        &self.cache
    }

    #[must_use]
    pub fn options(&self) -> &SelectionOptions {
        &self.options
    }

    /// Default broker for `check_type`.
    ///
    /// Repeated calls for the same check type return the remembered broker
    /// without touching the API or the probe again.
    ///
    /// # Errors
    ///
    /// Every error is terminal for the registration run: API and
    /// configuration failures, unknown broker ids, a forced enterprise
    /// selection with no usable broker, and
    /// [`BrokerError::SelectionExhausted`] when no policy applies.
    pub async fn default_broker(&self, check_type: &str) -> Result<Broker> {
        if let Some(broker) = self.chosen.lock().get(check_type) {
            debug!(check_type, broker = broker.id_str(), "Default broker already verified");
            return Ok(broker.clone());
        }

        let (brokers, _) = tokio::try_join!(self.cache.brokers(), self.cache.default_brokers())?;

        let mut id = self.custom_broker(check_type).await?;
        if id.is_none() {
            id = self.enterprise_broker(check_type).await?;
        }
        if id.is_none() {
            id = self.platform_broker(check_type).await?;
        }

        let Some(id) = id else {
            return Err(BrokerError::SelectionExhausted {
                check_type: check_type.to_string(),
            }
            .into());
        };

        let broker = lookup(brokers, &id)?;
        if !broker.is_valid_for(check_type) {
            return Err(BrokerError::InvalidSelection {
                name: broker.name().to_string(),
                check_type: check_type.to_string(),
            }
            .into());
        }

        info!(
            check_type,
            broker = broker.id_str(),
            name = broker.name(),
            "Default broker selected"
        );

        let mut chosen = self.chosen.lock();
        Ok(chosen
            .entry(check_type.to_string())
            .or_insert(broker)
            .clone())
    }

    /// Broker requested by the operator, if it supports `check_type`.
    ///
    /// A requested broker that does not support the check type is dropped
    /// with a warning; the other custom options are not consulted then.
    ///
    /// # Errors
    ///
    /// Fails for a malformed command line id, an invalid custom id, or an id
    /// that matches no broker.
    pub async fn custom_broker(&self, check_type: &str) -> Result<Option<BrokerId>> {
        let Some(id) = self.requested_broker()? else {
            return Ok(None);
        };

        let brokers = self.cache.brokers().await?;
        let broker = lookup(brokers, &id)?;

        if broker.is_valid_for(check_type) {
            return Ok(Some(id));
        }

        warn!(
            broker = %id,
            name = broker.name(),
            check_type,
            "Custom broker is not valid for check type, checking next option"
        );
        Ok(None)
    }

    /// A reachable enterprise broker supporting `check_type`, picked at
    /// random.
    ///
    /// # Errors
    ///
    /// When the broker type is forced to `enterprise` and nothing usable was
    /// found, returns [`BrokerError::EnterpriseUnreachable`] if valid brokers
    /// exist, otherwise [`BrokerError::NoEnterpriseBrokers`].
    pub async fn enterprise_broker(&self, check_type: &str) -> Result<Option<BrokerId>> {
        debug!(check_type, "Checking for enterprise brokers");

        let brokers = self.cache.brokers().await?;
        let mut reachable: Vec<&Broker> = Vec::new();
        let mut valid = 0usize;

        for broker in brokers
            .iter()
            .filter(|b| b.kind() == BrokerKind::Enterprise && b.is_valid_for(check_type))
        {
            valid += 1;
            if self.is_reachable(broker).await {
                reachable.push(broker);
            }
        }

        if reachable.is_empty() {
            if self.options.force_enterprise() {
                let check_type = check_type.to_string();
                return Err(if valid > 0 {
                    BrokerError::EnterpriseUnreachable { check_type, valid }
                } else {
                    BrokerError::NoEnterpriseBrokers { check_type }
                }
                .into());
            }
            debug!(check_type, valid, "No reachable enterprise broker");
            return Ok(None);
        }

        let idx = {
            let mut rng = self.rng.lock();
            rng.gen_range(0..reachable.len())
        };
        let broker = reachable[idx];
        let id = broker.id()?;

        info!(
            broker = %id,
            name = broker.name(),
            candidates = reachable.len(),
            "Found enterprise broker"
        );
        Ok(Some(id))
    }

    /// Broker named by the default mapping for `check_type`.
    ///
    /// # Errors
    ///
    /// Fails when the mapping cannot be loaded or names a non-numeric id.
    pub async fn platform_broker(&self, check_type: &str) -> Result<Option<BrokerId>> {
        let defaults = self.cache.default_brokers().await?;

        let raw = match defaults.get(check_type) {
            None => None,
            Some(DefaultEntry::Single(id)) => Some(id.as_str()),
            Some(DefaultEntry::List { ids, index }) => {
                let choice = {
                    let mut rng = self.rng.lock();
                    choose_index(ids.len(), *index, &mut *rng)
                };
                match choice {
                    ListChoice::At(i) => Some(ids[i].as_str()),
                    ListChoice::Empty | ListChoice::OutOfBounds => {
                        warn!(
                            check_type,
                            index,
                            len = ids.len(),
                            "Default broker index is not in bounds of the list, ignoring"
                        );
                        None
                    }
                }
            }
        };

        let id = raw.map(BrokerId::parse).transpose()?;
        info!(check_type, broker = ?id.as_ref().map(BrokerId::as_str), "COSI default broker");
        Ok(id)
    }

    /// Broker id requested through the command line or custom options.
    fn requested_broker(&self) -> Result<Option<BrokerId>> {
        if let Some(raw) = self.options.broker_id.as_deref() {
            info!(broker = raw, "Using broker from command line");
            let id = BrokerId::parse(raw).map_err(|_| ConfigError::InvalidValue {
                field: "broker.id",
                reason: format!("'{raw}' should be a number"),
            })?;
            return Ok(Some(id));
        }

        let custom = &self.options.custom;

        if let Some(id) = custom.explicit_id() {
            info!(broker = %id, "Custom broker id found");
            return Ok(Some(id.to_broker_id()?));
        }

        let Some(list) = custom.list.as_ref() else {
            return Ok(None);
        };
        let index = match &custom.default {
            Some(CustomDefault::Index(index)) => *index,
            Some(CustomDefault::Other(value)) => {
                warn!(
                    default = %value,
                    "custom options, broker.default is not an index into broker.list, ignoring"
                );
                return Ok(None);
            }
            Some(CustomDefault::Map(_)) | None => return Ok(None),
        };

        debug!("Custom broker list found");

        let Some(ids) = id_list(list) else {
            warn!("custom options, broker.list is not an array of broker ids, ignoring");
            return Ok(None);
        };

        let choice = {
            let mut rng = self.rng.lock();
            choose_index(ids.len(), index, &mut *rng)
        };

        match choice {
            ListChoice::At(i) => {
                info!(broker = %ids[i], "Custom broker id from supplied list");
                Ok(Some(ids[i].to_broker_id()?))
            }
            ListChoice::Empty => {
                warn!("custom options, broker.list has no elements, ignoring");
                Ok(None)
            }
            ListChoice::OutOfBounds => {
                warn!(
                    index,
                    len = ids.len(),
                    "custom options, broker.default is not in bounds of broker.list, ignoring"
                );
                Ok(None)
            }
        }
    }

    /// Whether any active member of `broker` accepts connections.
    async fn is_reachable(&self, broker: &Broker) -> bool {
        for detail in broker.active_details() {
            let Some((host, port)) = detail.endpoint() else {
                debug!(broker = broker.id_str(), "Broker member has no address, skipping");
                continue;
            };

            let outcome = self
                .probe
                .test(&host, port, self.options.probe_timeout)
                .await;

            if outcome.success {
                debug!(%host, port, elapsed_ms = outcome.elapsed.as_millis() as u64, "OK");
                return true;
            }
            debug!(%host, port, error = outcome.error.as_deref().unwrap_or("unknown"), "Unreachable");
        }
        false
    }
}

fn id_list(list: &Value) -> Option<Vec<IdValue>> {
    serde_json::from_value(list.clone()).ok()
}
