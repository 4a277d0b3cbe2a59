// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Concierge service.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Concierge configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ConciergeConfig {
    /// Service identity and behavior settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// HTTP gateway settings.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Dialog slot policy settings.
    #[serde(default)]
    pub dialog: DialogConfig,

    /// Fulfillment worker settings.
    #[serde(default)]
    pub worker: WorkerConfig,

    /// SMTP delivery settings.
    #[serde(default)]
    pub smtp: SmtpConfig,
}

/// Service identity and behavior configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the service.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "concierge".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// HTTP gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Address to bind the HTTP server to.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Port to listen on.
    #[serde(default = "default_gateway_port")]
    pub port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_gateway_port(),
        }
    }
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_gateway_port() -> u16 {
    8080
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("concierge").join("concierge.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("concierge.db"))
        .to_string_lossy()
        .into_owned()
}

/// Dialog slot policy configuration.
///
/// The allow-lists bound what the service will accept for the location and
/// cuisine slots; everything else is rejected with a re-prompt.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DialogConfig {
    /// Areas the service has restaurant coverage for.
    #[serde(default = "default_locations")]
    pub locations: Vec<String>,

    /// Cuisines the service has restaurant coverage for.
    #[serde(default = "default_cuisines")]
    pub cuisines: Vec<String>,

    /// Largest party size the service will accept.
    #[serde(default = "default_max_party_size")]
    pub max_party_size: u32,
}

impl Default for DialogConfig {
    fn default() -> Self {
        Self {
            locations: default_locations(),
            cuisines: default_cuisines(),
            max_party_size: default_max_party_size(),
        }
    }
}

fn default_locations() -> Vec<String> {
    [
        "manhattan",
        "brooklyn",
        "queens",
        "bronx",
        "staten island",
        "jersey city",
        "hoboken",
        "long island city",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_cuisines() -> Vec<String> {
    [
        "japanese",
        "italian",
        "chinese",
        "mexican",
        "indian",
        "thai",
        "korean",
        "french",
        "mediterranean",
        "american",
        "vietnamese",
        "spanish",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_max_party_size() -> u32 {
    20
}

/// Fulfillment worker configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WorkerConfig {
    /// Seconds between queue polls when the queue is empty.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Maximum queue messages drained per poll tick.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Maximum number of restaurant suggestions per email.
    #[serde(default = "default_suggestion_limit")]
    pub suggestion_limit: usize,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval_secs(),
            batch_size: default_batch_size(),
            suggestion_limit: default_suggestion_limit(),
        }
    }
}

fn default_poll_interval_secs() -> u64 {
    30
}

fn default_batch_size() -> usize {
    10
}

fn default_suggestion_limit() -> usize {
    5
}

/// SMTP delivery configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SmtpConfig {
    /// Hostname of the SMTP relay.
    #[serde(default = "default_smtp_relay")]
    pub relay: String,

    /// Port on the relay to connect to.
    #[serde(default = "default_smtp_port")]
    pub port: u16,

    /// Address suggestions are sent from.
    #[serde(default = "default_from_address")]
    pub from_address: String,

    /// Relay username, when the relay requires authentication.
    #[serde(default)]
    pub username: Option<String>,

    /// Relay password, when the relay requires authentication.
    #[serde(default)]
    pub password: Option<String>,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            relay: default_smtp_relay(),
            port: default_smtp_port(),
            from_address: default_from_address(),
            username: None,
            password: None,
        }
    }
}

fn default_smtp_relay() -> String {
    "localhost".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

fn default_from_address() -> String {
    "suggestions@concierge.local".to_string()
}
