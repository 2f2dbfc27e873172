//! Builders for domain values used across tests.
//!
//! Keeps test setup to one line per broker so assertions stay readable.

use serde_json::Value;

use crate::domain::{Broker, BrokerDetail, BrokerId, BrokerKind, DetailStatus};

/// Active member at `host` running `modules`.
pub fn active_detail(host: &str, modules: &[&str]) -> BrokerDetail {
    detail(DetailStatus::Active, host, modules)
}

/// Member in a non-active state; never counts toward validity.
pub fn inactive_detail(status: DetailStatus, host: &str, modules: &[&str]) -> BrokerDetail {
    detail(status, host, modules)
}

fn detail(status: DetailStatus, host: &str, modules: &[&str]) -> BrokerDetail {
    BrokerDetail {
        status,
        modules: modules.iter().map(|m| (*m).to_string()).collect(),
        external_host: Some(host.to_string()),
        external_ip: None,
        external_port: None,
    }
}

/// Broker with arbitrary members.
pub fn broker(id: u64, name: &str, kind: BrokerKind, details: Vec<BrokerDetail>) -> Broker {
    Broker::new(&BrokerId::from(id), name, kind, details)
}

/// Public broker with one active member.
pub fn circonus_broker(id: u64, modules: &[&str]) -> Broker {
    broker(
        id,
        &format!("circonus-{id}"),
        BrokerKind::Circonus,
        vec![active_detail(&format!("circonus-{id}.example.net"), modules)],
    )
}

/// Enterprise broker with one active member at `host`.
pub fn enterprise_broker(id: u64, host: &str, modules: &[&str]) -> Broker {
    broker(
        id,
        &format!("enterprise-{id}"),
        BrokerKind::Enterprise,
        vec![active_detail(host, modules)],
    )
}

/// Broker list as the API returns it.
pub fn broker_list_json(brokers: &[Broker]) -> Value {
    serde_json::to_value(brokers).unwrap_or(Value::Array(Vec::new()))
}
