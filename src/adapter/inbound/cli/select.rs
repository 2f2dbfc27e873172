//! `cosi-broker default`: determine the default broker per check type.

use serde_json::json;

use crate::adapter::inbound::cli::output;
use crate::application::broker::BrokerSelector;
use crate::error::Result;

/// Select and print the default broker for each check type, in order.
pub async fn execute(selector: &BrokerSelector, check_types: &[String]) -> Result<()> {
    output::header();

    let mut selected = Vec::with_capacity(check_types.len());

    for check_type in check_types {
        output::section(&format!("Check type '{check_type}'"));

        let pb = output::spinner(&format!("Determining default broker for {check_type}..."));
        let broker = match selector.default_broker(check_type).await {
            Ok(broker) => broker,
            Err(e) => {
                output::failed(&pb, &format!("No default broker for {check_type}"));
                return Err(e);
            }
        };
        output::done(&pb, "Default broker");
        output::broker(&broker);

        let mut entry = output::broker_json(&broker);
        entry["check_type"] = json!(check_type);
        selected.push(entry);
    }

    if output::is_json() {
        output::document(json!({
            "command": "default",
            "brokers": selected,
        }));
    }

    Ok(())
}
