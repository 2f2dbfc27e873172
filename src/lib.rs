//! cosi-broker - default broker selection for Circonus host registration.
//!
//! Registering a host means creating checks, and every check runs on a
//! broker. This crate decides which broker a check type should use.
//!
//! # Architecture
//!
//! - **`domain`** - Broker records, ids, the default mapping and the
//!   validity predicate
//! - **`port`** - Traits for the monitoring API, the default broker service
//!   and reachability probing
//! - **`application`** - The broker list cache and the selection policy chain
//! - **`adapter`** - reqwest/TCP implementations of the ports and the CLI
//! - **`infrastructure`** - Configuration, logging and wiring
//!
//! # Selection order
//!
//! 1. Broker requested on the command line or in custom options
//! 2. A reachable enterprise broker
//! 3. The COSI platform default for the check type
//!
//! # Example
//!
//! ```no_run
//! use cosi_broker::infrastructure::bootstrap::build_selector;
//! use cosi_broker::infrastructure::config::settings::Config;
//!
//! # async fn run() -> cosi_broker::error::Result<()> {
//! let config = Config::load("config.toml")?;
//! let selector = build_selector(&config)?;
//! let broker = selector.default_broker("json").await?;
//! println!("{} {}", broker.id_str(), broker.name());
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
