//! Broker list caching and default broker selection.

pub mod cache;
pub mod options;
pub mod selector;

pub use cache::{lookup, BrokerListCache, BROKER_PATH};
pub use options::{CustomBrokerOptions, CustomDefault, SelectionOptions, DEFAULT_PROBE_TIMEOUT};
pub use selector::BrokerSelector;
