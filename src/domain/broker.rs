//! Broker records as returned by the Circonus `/broker` endpoint.
//!
//! A broker is a group of one or more members ("details"). Each member
//! reports its own status and the set of check modules it can run. Only
//! members in the `active` state count toward what a broker supports.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::id::BrokerId;
use crate::error::BrokerError;

/// Port brokers listen on when the API does not report one.
pub const DEFAULT_BROKER_PORT: u16 = 43191;

/// Check type only composite brokers may serve, and only they may serve.
pub const COMPOSITE: &str = "composite";

const SELFCHECK_MODULE: &str = "selfcheck";
const HIDDEN_MODULE_PREFIX: &str = "hidden:";

/// Kind of broker group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrokerKind {
    /// Public broker operated by Circonus.
    Circonus,
    /// Customer-operated broker.
    Enterprise,
    /// Virtual broker evaluating composite checks.
    Composite,
    #[serde(other)]
    Other,
}

impl fmt::Display for BrokerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BrokerKind::Circonus => "circonus",
            BrokerKind::Enterprise => "enterprise",
            BrokerKind::Composite => "composite",
            BrokerKind::Other => "other",
        };
        f.write_str(name)
    }
}

/// Status of a single broker group member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailStatus {
    Active,
    Provisioned,
    Unprovisioned,
    Removed,
    #[serde(other)]
    Other,
}

/// One member of a broker group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokerDetail {
    pub status: DetailStatus,
    #[serde(default)]
    pub modules: Vec<String>,
    #[serde(default)]
    pub external_host: Option<String>,
    #[serde(default, rename = "ipaddress")]
    pub external_ip: Option<String>,
    #[serde(default)]
    pub external_port: Option<u16>,
}

impl BrokerDetail {
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == DetailStatus::Active
    }

    /// Exact-match module lookup; `hidden:` and `selfcheck` entries are
    /// ordinary strings here.
    #[must_use]
    pub fn supports(&self, check_type: &str) -> bool {
        self.modules.iter().any(|m| m == check_type)
    }

    /// Host and port to reach this member on.
    ///
    /// Prefers the external host name over the member's IP address. Returns
    /// `None` when neither is known.
    #[must_use]
    pub fn endpoint(&self) -> Option<(String, u16)> {
        let host = self
            .external_host
            .as_deref()
            .filter(|h| !h.is_empty())
            .or_else(|| self.external_ip.as_deref().filter(|ip| !ip.is_empty()))?;
        let port = self
            .external_port
            .filter(|p| *p != 0)
            .unwrap_or(DEFAULT_BROKER_PORT);
        Some((host.to_string(), port))
    }
}

/// A broker group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Broker {
    #[serde(rename = "_cid")]
    cid: String,
    #[serde(rename = "_name")]
    name: String,
    #[serde(rename = "_type")]
    kind: BrokerKind,
    #[serde(rename = "_details", default)]
    details: Vec<BrokerDetail>,
}

impl Broker {
    #[must_use]
    pub fn new(
        id: &BrokerId,
        name: impl Into<String>,
        kind: BrokerKind,
        details: Vec<BrokerDetail>,
    ) -> Self {
        Self {
            cid: id.cid(),
            name: name.into(),
            kind,
            details,
        }
    }

    /// Composed identifier, e.g. `/broker/1234`.
    #[must_use]
    pub fn cid(&self) -> &str {
        &self.cid
    }

    /// Numeric id extracted from the composed identifier.
    pub fn id(&self) -> Result<BrokerId, BrokerError> {
        BrokerId::from_cid(&self.cid)
    }

    /// Id text for display, without validation.
    #[must_use]
    pub fn id_str(&self) -> &str {
        self.cid
            .strip_prefix(super::id::BROKER_CID_PREFIX)
            .unwrap_or(&self.cid)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn kind(&self) -> BrokerKind {
        self.kind
    }

    #[must_use]
    pub fn details(&self) -> &[BrokerDetail] {
        &self.details
    }

    pub fn active_details(&self) -> impl Iterator<Item = &BrokerDetail> {
        self.details.iter().filter(|d| d.is_active())
    }

    #[must_use]
    pub fn has_active_detail(&self) -> bool {
        self.active_details().next().is_some()
    }

    /// Whether this broker can run checks of `check_type`.
    ///
    /// A broker named `composite` only serves the `composite` check type.
    /// Otherwise at least one active member must list the check type among
    /// its modules.
    #[must_use]
    pub fn is_valid_for(&self, check_type: &str) -> bool {
        if self.name == COMPOSITE && check_type != COMPOSITE {
            return false;
        }
        self.active_details().any(|d| d.supports(check_type))
    }

    /// Check types offered by active members, for display.
    ///
    /// Drops `selfcheck` and `hidden:` modules.
    #[must_use]
    pub fn supported_check_types(&self) -> BTreeSet<&str> {
        self.active_details()
            .flat_map(|d| d.modules.iter())
            .map(String::as_str)
            .filter(|m| *m != SELFCHECK_MODULE && !m.starts_with(HIDDEN_MODULE_PREFIX))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail(status: DetailStatus, modules: &[&str]) -> BrokerDetail {
        BrokerDetail {
            status,
            modules: modules.iter().map(|m| m.to_string()).collect(),
            external_host: None,
            external_ip: Some("10.0.0.1".into()),
            external_port: None,
        }
    }

    fn broker(name: &str, details: Vec<BrokerDetail>) -> Broker {
        Broker::new(&BrokerId::from(1), name, BrokerKind::Circonus, details)
    }

    #[test]
    fn inactive_members_never_make_a_broker_valid() {
        let b = broker(
            "b1",
            vec![
                detail(DetailStatus::Provisioned, &["json", "httptrap"]),
                detail(DetailStatus::Unprovisioned, &["json"]),
            ],
        );
        assert!(!b.is_valid_for("json"));
        assert!(!b.is_valid_for("httptrap"));
    }

    #[test]
    fn composite_broker_only_serves_composite() {
        let b = broker(
            COMPOSITE,
            vec![detail(DetailStatus::Active, &["composite", "json"])],
        );
        assert!(b.is_valid_for("composite"));
        assert!(!b.is_valid_for("json"));
    }

    #[test]
    fn hidden_and_selfcheck_modules_match_exactly() {
        let b = broker(
            "b1",
            vec![detail(DetailStatus::Active, &["selfcheck", "hidden:ping"])],
        );
        assert!(b.is_valid_for("selfcheck"));
        assert!(b.is_valid_for("hidden:ping"));
        assert!(!b.is_valid_for("ping"));
    }

    #[test]
    fn supported_check_types_filters_display_modules() {
        let b = broker(
            "b1",
            vec![
                detail(DetailStatus::Active, &["json", "selfcheck", "hidden:x"]),
                detail(DetailStatus::Active, &["json", "httptrap"]),
                detail(DetailStatus::Removed, &["snmp"]),
            ],
        );
        let types: Vec<&str> = b.supported_check_types().into_iter().collect();
        assert_eq!(types, vec!["httptrap", "json"]);
    }

    #[test]
    fn endpoint_prefers_external_host_and_defaults_port() {
        let mut d = detail(DetailStatus::Active, &[]);
        assert_eq!(d.endpoint(), Some(("10.0.0.1".to_string(), DEFAULT_BROKER_PORT)));

        d.external_host = Some("broker.example.com".into());
        d.external_port = Some(443);
        assert_eq!(d.endpoint(), Some(("broker.example.com".to_string(), 443)));

        d.external_host = None;
        d.external_ip = None;
        assert_eq!(d.endpoint(), None);
    }

    #[test]
    fn deserializes_api_shape() {
        let raw = r#"{
            "_cid": "/broker/1490",
            "_name": "Ashburn, VA, US",
            "_type": "circonus",
            "_details": [{
                "status": "active",
                "modules": ["json", "httptrap"],
                "external_host": null,
                "ipaddress": "192.0.2.10",
                "external_port": 43191,
                "cn": "ashburn.example"
            }]
        }"#;
        let b: Broker = serde_json::from_str(raw).unwrap();
        assert_eq!(b.id().unwrap().as_str(), "1490");
        assert_eq!(b.kind(), BrokerKind::Circonus);
        assert!(b.is_valid_for("httptrap"));
        assert_eq!(
            b.details()[0].endpoint(),
            Some(("192.0.2.10".to_string(), 43191))
        );
    }

    #[test]
    fn unknown_kind_and_status_are_tolerated() {
        let raw = r#"{
            "_cid": "/broker/2",
            "_name": "x",
            "_type": "mystery",
            "_details": [{"status": "decommissioned", "modules": []}]
        }"#;
        let b: Broker = serde_json::from_str(raw).unwrap();
        assert_eq!(b.kind(), BrokerKind::Other);
        assert!(!b.has_active_detail());
    }
}
