//! Metrics collection and exposition.
//!
//! # Metrics
//! - `real_ip_events_total` (counter): evaluations by `outcome` (resolved, failed)
//! - `real_ip_failures_total` (counter): failed evaluations by `reason`
//! - `real_ip_invalid_addresses_total` (counter): unparsable chain entries
//! - `real_ip_malformed_events_total` (counter): input lines that were not JSON objects
//! - `real_ip_config_reloads_total` (counter): reload attempts by `result`
//! - `real_ip_trusted_networks` (gauge): size of the active trusted set

use std::net::SocketAddr;

use metrics::{counter, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::resolver::{Evaluation, Outcome};

/// Install the Prometheus recorder and its HTTP scrape listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_evaluation(evaluation: &Evaluation) {
    match evaluation.outcome {
        Outcome::Resolved(_) => {
            counter!("real_ip_events_total", "outcome" => "resolved").increment(1);
        }
        Outcome::Failed(kind) => {
            counter!("real_ip_events_total", "outcome" => "failed").increment(1);
            counter!("real_ip_failures_total", "reason" => kind.as_str()).increment(1);
        }
    }

    if evaluation.has_invalid_addresses() {
        counter!("real_ip_invalid_addresses_total").increment(evaluation.invalid_tokens.len() as u64);
    }
}

pub fn record_malformed_event() {
    counter!("real_ip_malformed_events_total").increment(1);
}

pub fn record_config_reload(success: bool) {
    let result = if success { "success" } else { "error" };
    counter!("real_ip_config_reloads_total", "result" => result).increment(1);
}

pub fn record_trusted_networks(count: usize) {
    gauge!("real_ip_trusted_networks").set(count as f64);
}
