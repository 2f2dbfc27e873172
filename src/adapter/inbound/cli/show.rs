//! `cosi-broker show`: one broker and the check types it supports.

use serde_json::json;

use crate::adapter::inbound::cli::output;
use crate::application::broker::BrokerListCache;
use crate::error::Result;

/// Show the broker with id `broker_id`.
pub async fn execute(cache: &BrokerListCache, broker_id: &str) -> Result<()> {
    let pb = output::spinner("Fetching broker list...");
    let broker = match cache.broker_by_id(broker_id).await {
        Ok(broker) => {
            pb.finish_and_clear();
            broker
        }
        Err(e) => {
            output::failed(&pb, "Broker lookup failed");
            return Err(e);
        }
    };

    if !broker.has_active_detail() {
        output::error(&format!("Broker {broker_id} is not active."));
        return Ok(());
    }

    let checks: Vec<&str> = broker.supported_check_types().into_iter().collect();

    if output::is_json() {
        let mut doc = output::broker_json(&broker);
        doc["command"] = json!("show");
        doc["check_types"] = json!(checks);
        output::document(doc);
        return Ok(());
    }

    output::header();
    output::section(&format!("Broker {}", broker.id_str()));
    output::broker(&broker);
    output::check_types(&checks);

    Ok(())
}
