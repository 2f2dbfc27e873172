//! `cosi-broker list`: brokers available to the API token.

use serde_json::json;

use crate::adapter::inbound::cli::output;
use crate::application::broker::BrokerListCache;
use crate::error::Result;

/// List cached brokers.
pub async fn execute(cache: &BrokerListCache) -> Result<()> {
    let pb = output::spinner("Fetching broker list...");
    let brokers = match cache.brokers().await {
        Ok(brokers) => {
            pb.finish_and_clear();
            brokers
        }
        Err(e) => {
            output::failed(&pb, "Unable to fetch broker list");
            return Err(e);
        }
    };

    if output::is_json() {
        let rows: Vec<_> = brokers
            .iter()
            .map(|b| {
                let mut row = output::broker_json(b);
                row["active_members"] = json!(b.active_details().count());
                row["members"] = json!(b.details().len());
                row
            })
            .collect();
        output::document(json!({ "command": "list", "brokers": rows }));
        return Ok(());
    }

    output::header();
    output::section("Brokers");

    if brokers.is_empty() {
        output::warning("No active brokers available to this API token");
        return Ok(());
    }

    output::broker_table(brokers);
    output::hint("cosi-broker show <ID> for supported check types");

    Ok(())
}
