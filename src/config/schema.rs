//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML config files.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Real IP filter settings.
    pub filter: RealIpConfig,

    /// Logging and metrics settings.
    pub observability: ObservabilityConfig,

    /// Stream pipeline settings.
    pub pipeline: PipelineConfig,
}

/// Real IP filter configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct RealIpConfig {
    /// Field holding the directly observed peer address.
    /// Required unless `check_remote_address` is disabled.
    pub remote_address_field: String,

    /// Field holding the forwarded-for chain.
    pub x_forwarded_for_field: String,

    /// The forwarded-for field is one comma-delimited string.
    pub x_forwarded_for_is_string: bool,

    /// Trusted proxy networks (CIDR or bare address).
    pub trusted_networks: Vec<String>,

    /// Field the resolved address is written to.
    pub target_field: String,

    /// If set, every valid chain address is written to this field.
    pub x_forwarded_for_target: String,

    /// Tags added when no address could be resolved.
    pub tags_on_failure: Vec<String>,

    /// Tags added when the chain contains an invalid address.
    pub tags_on_invalid_ip: Vec<String>,

    /// Use the peer address as the trust gate.
    pub check_remote_address: bool,

    /// Tags added when an address was resolved.
    pub add_tag: Vec<String>,

    /// Tags removed when an address was resolved.
    pub remove_tag: Vec<String>,
}

impl Default for RealIpConfig {
    fn default() -> Self {
        Self {
            remote_address_field: String::new(),
            x_forwarded_for_field: String::new(),
            x_forwarded_for_is_string: false,
            trusted_networks: Vec::new(),
            target_field: "real_ip".to_string(),
            x_forwarded_for_target: String::new(),
            tags_on_failure: vec!["_real_ip_lookup_failure".to_string()],
            tags_on_invalid_ip: vec!["_real_ip_invalid_ip".to_string()],
            check_remote_address: true,
            add_tag: Vec::new(),
            remove_tag: Vec::new(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable, for development.
    #[default]
    Pretty,
    /// One JSON object per line, for production.
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Stream pipeline configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    /// Reload the filter when the config file changes.
    pub watch_config: bool,
}
