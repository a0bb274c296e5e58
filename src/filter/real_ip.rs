//! The real IP filter.
//!
//! # Responsibilities
//! - Read the peer and forwarded-for fields from an event
//! - Evaluate them against the trusted networks
//! - Write the resolved address, the collected chain and the outcome tags
//!
//! # Tagging
//! ```text
//! Resolved                        → target_field, add_tag/remove_tag
//! Resolved + invalid tokens       → ... + tags_on_invalid_ip
//! Failed(InvalidAddressInChain)   → tags_on_failure + tags_on_invalid_ip
//! Failed(other)                   → tags_on_failure
//! ```

use serde_json::Value;

use crate::config::loader::ConfigError;
use crate::config::schema::RealIpConfig;
use crate::config::validation::{validate_filter, ValidationError};
use crate::filter::event::EventRecord;
use crate::filter::field_ref::FieldRef;
use crate::net::TrustedNetworks;
use crate::observability::metrics;
use crate::resolver::{Evaluation, Evaluator, EvaluatorOptions, FieldValue, Outcome};

/// A configured real IP filter. Immutable; share it via `Arc`.
#[derive(Debug, Clone)]
pub struct RealIpFilter {
    evaluator: Evaluator,
    remote_address: Option<FieldRef>,
    x_forwarded_for: FieldRef,
    target: FieldRef,
    chain_target: Option<FieldRef>,
    tags_on_failure: Vec<String>,
    tags_on_invalid_ip: Vec<String>,
    add_tag: Vec<String>,
    remove_tag: Vec<String>,
}

impl RealIpFilter {
    /// Build a filter, rejecting the config with every validation error found.
    pub fn from_config(config: &RealIpConfig) -> Result<Self, ConfigError> {
        validate_filter(config).map_err(ConfigError::Validation)?;
        let invalid = |e: ValidationError| ConfigError::Validation(vec![e]);

        let trusted = TrustedNetworks::parse(&config.trusted_networks)
            .map_err(|e| invalid(e.into()))?;
        let remote_address = optional_field("remote_address_field", &config.remote_address_field)
            .map_err(invalid)?;
        let x_forwarded_for = parse_field("x_forwarded_for_field", &config.x_forwarded_for_field)
            .map_err(invalid)?;
        let target = parse_field("target_field", &config.target_field).map_err(invalid)?;
        let chain_target = optional_field("x_forwarded_for_target", &config.x_forwarded_for_target)
            .map_err(invalid)?;

        let options = EvaluatorOptions {
            require_peer_trust_check: config.check_remote_address,
            chain_is_delimited_string: config.x_forwarded_for_is_string,
            collect_all_valid_addresses: chain_target.is_some(),
        };

        Ok(Self {
            evaluator: Evaluator::new(trusted, options),
            remote_address,
            x_forwarded_for,
            target,
            chain_target,
            tags_on_failure: config.tags_on_failure.clone(),
            tags_on_invalid_ip: config.tags_on_invalid_ip.clone(),
            add_tag: config.add_tag.clone(),
            remove_tag: config.remove_tag.clone(),
        })
    }

    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    pub fn trusted_networks(&self) -> &TrustedNetworks {
        self.evaluator.trusted_networks()
    }

    /// Resolve the real IP of one event and apply the result to it.
    pub fn filter<E: EventRecord>(&self, event: &mut E) -> Evaluation {
        let peer = match &self.remote_address {
            Some(field) => event.get_field(field),
            None => FieldValue::Absent,
        };
        let chain = event.get_field(&self.x_forwarded_for);

        let evaluation = self.evaluator.evaluate(&peer, &chain);
        self.apply(&evaluation, event);
        metrics::record_evaluation(&evaluation);
        evaluation
    }

    fn apply<E: EventRecord>(&self, evaluation: &Evaluation, event: &mut E) {
        if let (Some(field), Some(chain)) = (&self.chain_target, &evaluation.valid_chain) {
            let addresses = chain.iter().map(|ip| Value::String(ip.to_string())).collect();
            event.set_field(field, Value::Array(addresses));
        }

        if evaluation.has_invalid_addresses() {
            tracing::debug!(invalid = ?evaluation.invalid_tokens, "forwarded-for chain has invalid addresses");
            add_tags(event, &self.tags_on_invalid_ip);
        }

        match evaluation.outcome {
            Outcome::Resolved(ip) => {
                event.set_field(&self.target, Value::String(ip.to_string()));
                add_tags(event, &self.add_tag);
                for tag in &self.remove_tag {
                    event.remove_tag(tag);
                }
            }
            Outcome::Failed(kind) => {
                tracing::debug!(reason = kind.as_str(), "real ip lookup failed");
                add_tags(event, &self.tags_on_failure);
            }
        }
    }
}

fn add_tags<E: EventRecord>(event: &mut E, tags: &[String]) {
    for tag in tags {
        event.add_tag(tag);
    }
}

fn parse_field(name: &'static str, raw: &str) -> Result<FieldRef, ValidationError> {
    FieldRef::parse(raw).map_err(|source| ValidationError::InvalidFieldReference { field: name, source })
}

fn optional_field(name: &'static str, raw: &str) -> Result<Option<FieldRef>, ValidationError> {
    if raw.trim().is_empty() {
        Ok(None)
    } else {
        parse_field(name, raw).map(Some)
    }
}
