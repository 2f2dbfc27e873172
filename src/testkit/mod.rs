//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`domain`] - Builders for brokers, broker members and API payloads.
//! - [`logs`] - Captures `tracing` output so tests can assert on warnings.
//! - [`ports`] - In-memory [`BrokerApi`](crate::port::outbound::BrokerApi),
//!   [`DefaultsSource`](crate::port::outbound::DefaultsSource) and
//!   [`ReachabilityProbe`](crate::port::outbound::ReachabilityProbe)
//!   implementations with call counters.

pub mod domain;
pub mod logs;
pub mod ports;

use std::sync::Arc;

use crate::application::broker::{BrokerListCache, BrokerSelector, SelectionOptions};
use ports::{FakeApi, FakeDefaults, FakeProbe};

/// Seed used by [`selector`] so random picks repeat between runs.
pub const TEST_SEED: u64 = 0x00c0_5100;

/// Fakes wired into a selector, kept around for call-count assertions.
pub struct Harness {
    pub api: Arc<FakeApi>,
    pub defaults: Arc<FakeDefaults>,
    pub probe: Arc<FakeProbe>,
    pub selector: BrokerSelector,
}

/// Build a seeded selector over the given fakes.
///
/// The custom `broker.default` mapping, when `options.custom` carries one,
/// is handed to the cache the same way the binary does it.
pub fn selector(
    api: FakeApi,
    defaults: FakeDefaults,
    probe: FakeProbe,
    options: SelectionOptions,
) -> Harness {
    let api = Arc::new(api);
    let defaults = Arc::new(defaults);
    let probe = Arc::new(probe);

    let cache = Arc::new(BrokerListCache::new(
        api.clone(),
        defaults.clone(),
        options.custom.default_map().cloned(),
    ));
    let selector = BrokerSelector::new(cache, probe.clone(), options).with_seed(TEST_SEED);

    Harness {
        api,
        defaults,
        probe,
        selector,
    }
}
