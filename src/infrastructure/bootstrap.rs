//! Composition root: wires adapters into the broker selector.

use std::sync::Arc;

use tracing::debug;

use crate::adapter::outbound::{CirconusApi, CosiDefaults, TcpProbe};
use crate::application::broker::{BrokerListCache, BrokerSelector};
use crate::error::Result;
use crate::infrastructure::config::settings::Config;

/// Build a selector backed by the Circonus API, the COSI defaults service
/// and TCP probing.
///
/// # Errors
///
/// Fails when the custom options file cannot be loaded or a configured URL
/// is invalid.
pub fn build_selector(config: &Config) -> Result<BrokerSelector> {
    let custom = config.custom_options()?;
    let options = config.selection_options(custom.broker.unwrap_or_default());

    let api = Arc::new(CirconusApi::new(
        &config.api.url,
        config.api.key.clone(),
        config.api.app.clone(),
    )?);
    let defaults = Arc::new(CosiDefaults::new(&config.cosi.url)?);
    debug!(api = %config.api.url, defaults = %defaults.url(), "Broker sources configured");

    let cache = Arc::new(BrokerListCache::new(
        api,
        defaults,
        options.custom.default_map().cloned(),
    ));

    Ok(BrokerSelector::new(cache, Arc::new(TcpProbe::new()), options))
}
