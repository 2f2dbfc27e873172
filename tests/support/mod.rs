#![allow(dead_code)]

use std::io::Write;

use serde_json::Value;
use tempfile::NamedTempFile;

use cosi_broker::application::broker::{CustomBrokerOptions, SelectionOptions};

/// Minimal valid configuration pointing at unroutable services.
pub const BASE_CONFIG: &str = r#"
[api]
key = "00000000-0000-0000-0000-000000000000"
url = "http://127.0.0.1:9/v2/"

[cosi]
url = "http://127.0.0.1:9/"

[logging]
level = "info"
format = "pretty"
"#;

pub fn write_temp(contents: &str, suffix: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .prefix("cosi-broker-test-")
        .suffix(suffix)
        .tempfile()
        .expect("create temp file");
    file.write_all(contents.as_bytes()).expect("write temp file");
    file.flush().expect("flush temp file");
    file
}

pub fn write_temp_config(contents: &str) -> NamedTempFile {
    write_temp(contents, ".toml")
}

/// Selection options carrying a custom `broker` section.
pub fn custom_options(broker: Value) -> SelectionOptions {
    let custom: CustomBrokerOptions =
        serde_json::from_value(broker).expect("custom broker section");
    SelectionOptions {
        custom,
        ..SelectionOptions::default()
    }
}

/// Selection options with command line overrides.
pub fn cli_options(broker_id: Option<&str>, broker_type: Option<&str>) -> SelectionOptions {
    SelectionOptions {
        broker_id: broker_id.map(str::to_string),
        broker_type: broker_type.map(str::to_string),
        ..SelectionOptions::default()
    }
}
