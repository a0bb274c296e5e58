//! Shared utilities for integration tests.

use real_ip::config::RealIpConfig;
use real_ip::filter::{Event, FieldRef};
use real_ip::RealIpFilter;
use serde_json::Value;

#[allow(dead_code)]
pub const FAILURE_TAG: &str = "_real_ip_lookup_failure";
#[allow(dead_code)]
pub const INVALID_TAG: &str = "_real_ip_invalid_ip";

/// Filter config trusting the two private ranges used throughout the scenarios.
pub fn base_config() -> RealIpConfig {
    RealIpConfig {
        remote_address_field: "remote_addr".into(),
        x_forwarded_for_field: "x_forwarded_for".into(),
        trusted_networks: vec!["10.0.0.0/8".into(), "192.168.0.0/16".into()],
        ..Default::default()
    }
}

/// Build a filter from the base config after applying `tweak`.
pub fn filter_with(tweak: impl FnOnce(&mut RealIpConfig)) -> RealIpFilter {
    let mut config = base_config();
    tweak(&mut config);
    RealIpFilter::from_config(&config).expect("test config must be valid")
}

pub fn event(value: Value) -> Event {
    serde_json::from_value(value).expect("test event must be a JSON object")
}

/// Read a field by reference, cloned for easy comparison.
#[allow(dead_code)]
pub fn field(event: &Event, reference: &str) -> Option<Value> {
    event.get(&FieldRef::parse(reference).unwrap()).cloned()
}

/// Sorted tags, so assertions do not depend on tagging order.
#[allow(dead_code)]
pub fn sorted_tags(event: &Event) -> Vec<String> {
    let mut tags: Vec<String> = event.tags().into_iter().map(String::from).collect();
    tags.sort();
    tags
}
