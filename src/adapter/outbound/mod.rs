//! Outbound adapters (driven side).

pub mod circonus;
pub mod cosi;
pub mod http;
pub mod tcp;

pub use circonus::CirconusApi;
pub use cosi::CosiDefaults;
pub use tcp::TcpProbe;
