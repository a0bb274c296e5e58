//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Required field references present and well formed
//! - Trusted networks parse
//! - Metrics address is a socket address when metrics are enabled
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::{AppConfig, ObservabilityConfig, RealIpConfig};
use crate::filter::field_ref::{FieldRef, FieldRefError};
use crate::net::trust_set::{parse_network, NetworkConfigError};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("filter.{0} is required")]
    MissingField(&'static str),

    #[error("filter.{field}: {source}")]
    InvalidFieldReference {
        field: &'static str,
        source: FieldRefError,
    },

    #[error(transparent)]
    InvalidNetwork(#[from] NetworkConfigError),

    #[error("observability.metrics_address '{0}' is not a socket address")]
    InvalidMetricsAddress(String),
}

/// Validate the whole configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = filter_errors(&config.filter);
    errors.extend(observability_errors(&config.observability));

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate the filter section only.
pub fn validate_filter(config: &RealIpConfig) -> Result<(), Vec<ValidationError>> {
    let errors = filter_errors(config);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn filter_errors(config: &RealIpConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    check_field(&mut errors, "x_forwarded_for_field", &config.x_forwarded_for_field, true);
    check_field(
        &mut errors,
        "remote_address_field",
        &config.remote_address_field,
        config.check_remote_address,
    );
    check_field(&mut errors, "target_field", &config.target_field, true);
    check_field(
        &mut errors,
        "x_forwarded_for_target",
        &config.x_forwarded_for_target,
        false,
    );

    errors.extend(
        config
            .trusted_networks
            .iter()
            .filter_map(|entry| parse_network(entry).err())
            .map(ValidationError::from),
    );

    errors
}

/// Check a field reference. Optional fields are only checked when set.
fn check_field(
    errors: &mut Vec<ValidationError>,
    name: &'static str,
    value: &str,
    required: bool,
) {
    if value.trim().is_empty() {
        if required {
            errors.push(ValidationError::MissingField(name));
        }
        return;
    }

    if let Err(source) = FieldRef::parse(value) {
        errors.push(ValidationError::InvalidFieldReference { field: name, source });
    }
}

fn observability_errors(config: &ObservabilityConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if config.metrics_enabled && config.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.metrics_address.clone(),
        ));
    }
    errors
}
