//! Broker domain: records, identifiers and the default mapping.
//!
//! Nothing in here performs I/O. The validity predicate lives on
//! [`Broker::is_valid_for`].

pub mod broker;
pub mod defaults;
pub mod id;

pub use broker::{
    Broker, BrokerDetail, BrokerKind, DetailStatus, COMPOSITE, DEFAULT_BROKER_PORT,
};
pub use defaults::{choose_index, DefaultBrokerMap, DefaultEntry, ListChoice, RANDOM_INDEX};
pub use id::{BrokerId, IdValue};
