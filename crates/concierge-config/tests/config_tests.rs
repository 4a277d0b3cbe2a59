// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Concierge configuration system.

use concierge_config::diagnostic::suggest_key;
use concierge_config::model::ConciergeConfig;
use concierge_config::{load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_concierge_config() {
    let toml = r#"
[agent]
name = "test-concierge"
log_level = "debug"

[gateway]
bind_address = "0.0.0.0"
port = 9090

[storage]
database_path = "/tmp/test.db"

[dialog]
locations = ["manhattan", "brooklyn"]
cuisines = ["thai", "mexican"]
max_party_size = 10

[worker]
poll_interval_secs = 2
suggestion_limit = 3

[smtp]
relay = "smtp.example.com"
port = 2525
from_address = "dining@example.com"
username = "mailer"
password = "hunter2"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.agent.name, "test-concierge");
    assert_eq!(config.agent.log_level, "debug");
    assert_eq!(config.gateway.bind_address, "0.0.0.0");
    assert_eq!(config.gateway.port, 9090);
    assert_eq!(config.storage.database_path, "/tmp/test.db");
    assert_eq!(config.dialog.locations, vec!["manhattan", "brooklyn"]);
    assert_eq!(config.dialog.cuisines, vec!["thai", "mexican"]);
    assert_eq!(config.dialog.max_party_size, 10);
    assert_eq!(config.worker.poll_interval_secs, 2);
    assert_eq!(config.worker.suggestion_limit, 3);
    assert_eq!(config.smtp.relay, "smtp.example.com");
    assert_eq!(config.smtp.port, 2525);
    assert_eq!(config.smtp.from_address, "dining@example.com");
    assert_eq!(config.smtp.username.as_deref(), Some("mailer"));
    assert_eq!(config.smtp.password.as_deref(), Some("hunter2"));
}

/// Unknown field in [agent] section produces an error.
#[test]
fn unknown_field_in_agent_produces_error() {
    let toml = r#"
[agent]
naem = "test"
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    // Figment wraps serde's deny_unknown_fields error
    assert!(
        err_str.contains("unknown field") || err_str.contains("naem"),
        "error should mention unknown field or the bad key, got: {err_str}"
    );
}

/// Unknown field in [dialog] section produces an error.
#[test]
fn unknown_field_in_dialog_produces_error() {
    let toml = r#"
[dialog]
cuisnes = ["thai"]
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("cuisnes"),
        "error should mention unknown field, got: {err_str}"
    );
}

/// Missing optional sections use defaults without error.
#[test]
fn missing_optional_sections_use_defaults() {
    let toml = "";
    let config = load_config_from_str(toml).expect("empty TOML should use defaults");

    assert_eq!(config.agent.name, "concierge");
    assert_eq!(config.agent.log_level, "info");
    assert_eq!(config.gateway.bind_address, "127.0.0.1");
    assert_eq!(config.gateway.port, 8080);
    assert!(config.storage.database_path.ends_with("concierge.db"));
    assert_eq!(config.dialog.locations.len(), 8);
    assert_eq!(config.dialog.cuisines.len(), 12);
    assert_eq!(config.dialog.max_party_size, 20);
    assert_eq!(config.worker.poll_interval_secs, 5);
    assert_eq!(config.worker.suggestion_limit, 5);
    assert_eq!(config.smtp.relay, "localhost");
    assert!(config.smtp.username.is_none());
}

/// Later merge layers override earlier ones.
#[test]
fn merge_layer_overrides_toml_value() {
    use figment::{
        providers::{Format, Serialized, Toml},
        Figment,
    };

    let toml_content = r#"
[agent]
name = "from-toml"
"#;

    // Simulate CONCIERGE_AGENT_NAME env var by merging a dotted pair on top
    let config: ConciergeConfig = Figment::new()
        .merge(Serialized::defaults(ConciergeConfig::default()))
        .merge(Toml::string(toml_content))
        .merge(("agent.name", "envtest"))
        .extract()
        .expect("should merge env override");

    assert_eq!(config.agent.name, "envtest");
}

/// Dotted key smtp.from_address maps into the nested section
/// (NOT smtp.from.address, which is what a naive underscore split would do).
#[test]
fn dotted_key_maps_to_smtp_from_address() {
    use figment::{providers::Serialized, Figment};

    let config: ConciergeConfig = Figment::new()
        .merge(Serialized::defaults(ConciergeConfig::default()))
        .merge(("smtp.from_address", "env@example.com"))
        .extract()
        .expect("should set from_address via dot notation");

    assert_eq!(config.smtp.from_address, "env@example.com");
}

/// Missing config files are silently skipped (Figment's Toml::file() behavior).
#[test]
fn missing_config_files_silently_skipped() {
    use figment::{
        providers::{Format, Serialized, Toml},
        Figment,
    };

    let config: ConciergeConfig = Figment::new()
        .merge(Serialized::defaults(ConciergeConfig::default()))
        .merge(Toml::file("/nonexistent/path/concierge.toml"))
        .extract()
        .expect("missing file should be silently skipped");

    // Should just get defaults
    assert_eq!(config.agent.name, "concierge");
}

/// Unexpected top-level section is rejected by deny_unknown_fields.
#[test]
fn deny_unknown_fields_at_top_level() {
    let toml = r#"
[logging]
level = "debug"
"#;

    let err =
        load_config_from_str(toml).expect_err("unknown top-level section should be rejected");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("logging"),
        "error should mention unknown field, got: {err_str}"
    );
}

/// load_and_validate_str surfaces semantic validation failures.
#[test]
fn validate_str_rejects_empty_cuisine_list() {
    let toml = r#"
[dialog]
cuisines = []
"#;

    let errors = load_and_validate_str(toml).expect_err("empty cuisine list should be rejected");
    assert!(!errors.is_empty());
}

/// Unknown key "cuisnes" in [dialog] produces suggestion "did you mean `cuisines`?"
#[test]
fn diagnostic_cuisnes_suggests_cuisines() {
    let valid_keys = &["locations", "cuisines", "max_party_size"];
    let suggestion = suggest_key("cuisnes", valid_keys);
    assert_eq!(suggestion, Some("cuisines".to_string()));
}

/// Unknown key "relai" in [smtp] produces suggestion "did you mean `relay`?"
#[test]
fn diagnostic_relai_suggests_relay() {
    let valid_keys = &["relay", "port", "from_address", "username", "password"];
    let suggestion = suggest_key("relai", valid_keys);
    assert_eq!(suggestion, Some("relay".to_string()));
}

/// Unknown key "zzzzzz" with no close match does NOT produce a suggestion.
#[test]
fn diagnostic_no_suggestion_for_distant_typo() {
    let valid_keys = &["locations", "cuisines", "max_party_size"];
    let suggestion = suggest_key("zzzzzz", valid_keys);
    assert!(suggestion.is_none(), "should not suggest for distant typo");
}
