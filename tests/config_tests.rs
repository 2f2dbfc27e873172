mod support;

use std::time::Duration;

use cosi_broker::error::{ConfigError, Error};
use cosi_broker::infrastructure::config::settings::Config;

use support::{write_temp, write_temp_config, BASE_CONFIG};

#[test]
fn config_loads_with_defaults() {
    let file = write_temp_config(BASE_CONFIG);
    let config = Config::load(file.path()).unwrap();

    assert_eq!(config.api.app, "cosi");
    assert_eq!(config.broker.probe_timeout_ms, 500);
    assert!(config.broker_id().is_none());

    let options = config.selection_options(Default::default());
    assert_eq!(options.probe_timeout, Duration::from_millis(500));
    assert!(!options.force_enterprise());
}

#[test]
fn config_rejects_missing_api_key() {
    if std::env::var(cosi_broker::infrastructure::config::settings::API_KEY_ENV).is_ok() {
        return;
    }

    let toml = r#"
[api]
url = "https://api.circonus.com/v2/"
"#;
    let file = write_temp_config(toml);

    match Config::load(file.path()) {
        Err(Error::Config(ConfigError::MissingField { field: "api.key" })) => {}
        Err(err) => panic!("Expected missing api.key, got {err}"),
        Ok(_) => panic!("Expected missing api.key to be rejected"),
    }
}

#[test]
fn config_rejects_empty_cosi_url() {
    let toml = BASE_CONFIG.replace("url = \"http://127.0.0.1:9/\"", "url = \"\"");
    let file = write_temp_config(&toml);

    assert!(matches!(
        Config::load(file.path()),
        Err(Error::Config(ConfigError::MissingField { field: "cosi.url" }))
    ));
}

#[test]
fn config_rejects_non_numeric_broker_id() {
    let toml = format!("{BASE_CONFIG}\n[broker]\nid = \"12b\"\n");
    let file = write_temp_config(&toml);

    assert!(matches!(
        Config::load(file.path()),
        Err(Error::Config(ConfigError::InvalidValue {
            field: "broker.id",
            ..
        }))
    ));
}

#[test]
fn config_rejects_zero_probe_timeout() {
    let toml = format!("{BASE_CONFIG}\n[broker]\nprobe_timeout_ms = 0\n");
    let file = write_temp_config(&toml);

    assert!(matches!(
        Config::load(file.path()),
        Err(Error::Config(ConfigError::InvalidValue {
            field: "broker.probe_timeout_ms",
            ..
        }))
    ));
}

#[test]
fn config_accepts_numeric_broker_id_and_type() {
    let toml = format!(
        "{BASE_CONFIG}\n[broker]\nid = 1234\ntype = \"enterprise\"\nprobe_timeout_ms = 250\n"
    );
    let file = write_temp_config(&toml);
    let config = Config::load(file.path()).unwrap();

    assert_eq!(config.broker_id().as_deref(), Some("1234"));
    let options = config.selection_options(Default::default());
    assert_eq!(options.broker_id.as_deref(), Some("1234"));
    assert!(options.force_enterprise());
    assert_eq!(options.probe_timeout, Duration::from_millis(250));
}

#[test]
fn zero_broker_id_counts_as_unset() {
    let toml = format!("{BASE_CONFIG}\n[broker]\nid = 0\n");
    let file = write_temp_config(&toml);
    let config = Config::load(file.path()).unwrap();

    assert!(config.broker_id().is_none());
}

#[test]
fn command_line_overrides_replace_file_values() {
    let toml = format!("{BASE_CONFIG}\n[broker]\nid = \"10\"\n");
    let file = write_temp_config(&toml);
    let config = Config::load(file.path())
        .unwrap()
        .with_overrides(Some("12".into()), Some("enterprise".into()))
        .unwrap();

    assert_eq!(config.broker_id().as_deref(), Some("12"));
    assert_eq!(config.broker.kind.as_deref(), Some("enterprise"));
}

#[test]
fn command_line_override_is_validated() {
    let file = write_temp_config(BASE_CONFIG);
    let result = Config::load(file.path())
        .unwrap()
        .with_overrides(Some("twelve".into()), None);

    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::InvalidValue {
            field: "broker.id",
            ..
        }))
    ));
}

#[test]
fn empty_command_line_broker_is_rejected() {
    let file = write_temp_config(BASE_CONFIG);

    for blank in ["", "  "] {
        let result = Config::load(file.path())
            .unwrap()
            .with_overrides(Some(blank.into()), None);

        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidValue {
                field: "broker.id",
                ..
            }))
        ));
    }
}

#[test]
fn non_integer_list_index_still_loads() {
    let custom = write_temp(
        r#"{ "broker": { "list": ["10", "11"], "default": "1" } }"#,
        ".json",
    );
    let toml = format!(
        "custom_options_file = {:?}\n{BASE_CONFIG}",
        custom.path().display().to_string()
    );
    let file = write_temp_config(&toml);
    let config = Config::load(file.path()).unwrap();

    let broker = config.custom_options().unwrap().broker.unwrap();
    assert_eq!(broker.list_index(), None);
    assert!(broker.default_map().is_none());
}

#[test]
fn custom_options_file_is_loaded() {
    let custom = write_temp(
        r#"{
            "broker": { "list": ["10", "11"], "default": 1 },
            "host_tags": ["role:db"]
        }"#,
        ".json",
    );
    let toml = format!(
        "custom_options_file = {:?}\n{BASE_CONFIG}",
        custom.path().display().to_string()
    );
    let file = write_temp_config(&toml);
    let config = Config::load(file.path()).unwrap();

    let broker = config.custom_options().unwrap().broker.unwrap();
    assert_eq!(broker.list_index(), Some(1));
    assert!(broker.default_map().is_none());
}

#[test]
fn missing_custom_options_file_is_an_error() {
    let toml = format!("custom_options_file = \"/nonexistent/cosi-custom.json\"\n{BASE_CONFIG}");
    let file = write_temp_config(&toml);
    let config = Config::load(file.path()).unwrap();

    assert!(matches!(
        config.custom_options(),
        Err(Error::Config(ConfigError::ReadFile(_)))
    ));
}

#[test]
fn malformed_custom_options_file_is_an_error() {
    let custom = write_temp("{ broker: ", ".json");
    let toml = format!(
        "custom_options_file = {:?}\n{BASE_CONFIG}",
        custom.path().display().to_string()
    );
    let file = write_temp_config(&toml);
    let config = Config::load(file.path()).unwrap();

    assert!(matches!(
        config.custom_options(),
        Err(Error::Config(ConfigError::ParseCustomOptions(_)))
    ));
}

#[test]
fn config_rejects_unknown_log_format() {
    let toml = BASE_CONFIG.replace("format = \"pretty\"", "format = \"xml\"");
    let file = write_temp_config(&toml);

    assert!(matches!(
        Config::load(file.path()),
        Err(Error::Config(ConfigError::InvalidValue {
            field: "logging.format",
            ..
        }))
    ));
}
