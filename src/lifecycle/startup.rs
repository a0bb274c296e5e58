//! Startup orchestration.
//!
//! # Responsibilities
//! - Initialize metrics before any event is counted
//! - Build the filter from a validated configuration
//!
//! # Design Decisions
//! - Fail fast: an invalid trusted network aborts startup
//! - Logging is initialized by the binary, before the config is loaded

use std::net::SocketAddr;

use crate::config::loader::ConfigError;
use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ValidationError};
use crate::filter::RealIpFilter;
use crate::observability::metrics;

/// Validate `config`, start the metrics exporter if enabled and build the filter.
pub fn start(config: &AppConfig) -> Result<RealIpFilter, ConfigError> {
    validate_config(config).map_err(ConfigError::Validation)?;

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse().map_err(|_| {
            ConfigError::Validation(vec![ValidationError::InvalidMetricsAddress(
                config.observability.metrics_address.clone(),
            )])
        })?;
        metrics::init_metrics(addr);
    }

    let filter = RealIpFilter::from_config(&config.filter)?;
    metrics::record_trusted_networks(filter.trusted_networks().len());

    tracing::info!(
        trusted_networks = %filter.trusted_networks(),
        check_remote_address = config.filter.check_remote_address,
        x_forwarded_for_is_string = config.filter.x_forwarded_for_is_string,
        target_field = %config.filter.target_field,
        "Real IP filter configured"
    );

    Ok(filter)
}
