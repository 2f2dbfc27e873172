//! Outbound ports (driven side): interfaces implemented by outbound adapters.

pub mod api;
pub mod defaults;
pub mod probe;

pub use api::{ApiResponse, BrokerApi};
pub use defaults::DefaultsSource;
pub use probe::{ProbeOutcome, ReachabilityProbe};
