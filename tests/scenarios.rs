//! Table-driven resolution scenarios, pinning the exact result and tag
//! combination of every branch of the trust-chain walk.

use std::net::{IpAddr, Ipv4Addr};

use real_ip::filter::EventRecord;
use real_ip::{FailureKind, TrustedNetworks};
use serde_json::{json, Value};

mod common;
use common::{event, field, filter_with, sorted_tags, FAILURE_TAG, INVALID_TAG};

struct Case {
    name: &'static str,
    peer: Option<&'static str>,
    /// `Value::Null` leaves the field out of the event.
    chain: Value,
    string_mode: bool,
    check_peer: bool,
    collect: bool,
    expected_ip: Option<&'static str>,
    expected_tags: &'static [&'static str],
    /// Only checked when collecting.
    expected_chain: Option<Value>,
}

impl Case {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            peer: Some("10.2.3.4"),
            chain: Value::Null,
            string_mode: false,
            check_peer: true,
            collect: false,
            expected_ip: None,
            expected_tags: &[],
            expected_chain: None,
        }
    }
}

fn cases() -> Vec<Case> {
    vec![
        Case {
            chain: json!(["1.2.3.4", "192.168.3.4"]),
            expected_ip: Some("1.2.3.4"),
            ..Case::new("nearest untrusted entry wins")
        },
        Case {
            peer: Some("1.2.3.4"),
            chain: json!(["9.9.9.9"]),
            expected_ip: Some("1.2.3.4"),
            ..Case::new("untrusted peer ignores chain")
        },
        Case {
            peer: Some("1.2.3.4"),
            chain: json!(["not-an-ip"]),
            expected_ip: Some("1.2.3.4"),
            ..Case::new("untrusted peer never inspects invalid chain")
        },
        Case {
            chain: json!(["10.5", "1.2.3.4", "192.168.3.4"]),
            collect: true,
            expected_ip: Some("1.2.3.4"),
            expected_tags: &[INVALID_TAG],
            expected_chain: Some(json!(["1.2.3.4", "192.168.3.4"])),
            ..Case::new("invalid entry after decision is a diagnostic")
        },
        Case {
            chain: json!(["10.5", "1.2.3.4", "192.168.3.4"]),
            expected_ip: Some("1.2.3.4"),
            ..Case::new("invalid entry after decision is never reached without collection")
        },
        Case {
            chain: json!(["10.5", "192.168.3.4"]),
            expected_tags: &[FAILURE_TAG, INVALID_TAG],
            ..Case::new("invalid entry before decision fails")
        },
        Case {
            chain: json!(["8.8.8.8", "10.5", "192.168.3.4"]),
            collect: true,
            expected_tags: &[FAILURE_TAG, INVALID_TAG],
            expected_chain: Some(json!(["8.8.8.8", "192.168.3.4"])),
            ..Case::new("collection continues past a fatal entry")
        },
        Case {
            chain: json!("1.2.3.4, 192.168.3.4,+ 192.168.4.5"),
            string_mode: true,
            collect: true,
            expected_ip: Some("1.2.3.4"),
            expected_chain: Some(json!(["1.2.3.4", "192.168.3.4", "192.168.4.5"])),
            ..Case::new("string mode splits and strips")
        },
        Case {
            chain: json!(["192.168.9.9", "10.1.1.1"]),
            expected_ip: Some("192.168.9.9"),
            ..Case::new("all trusted resolves to left-most")
        },
        Case {
            peer: Some("8.8.8.8"),
            expected_ip: Some("8.8.8.8"),
            ..Case::new("absent chain resolves to untrusted peer")
        },
        Case {
            expected_ip: Some("10.2.3.4"),
            ..Case::new("absent chain resolves to trusted peer")
        },
        Case {
            chain: json!(""),
            expected_ip: Some("10.2.3.4"),
            ..Case::new("blank chain string resolves to peer")
        },
        Case {
            chain: json!([""]),
            expected_ip: Some("10.2.3.4"),
            ..Case::new("single blank entry resolves to peer")
        },
        Case {
            chain: json!([]),
            expected_ip: Some("10.2.3.4"),
            ..Case::new("empty list resolves to peer")
        },
        Case {
            chain: json!("  "),
            string_mode: true,
            expected_ip: Some("10.2.3.4"),
            ..Case::new("blank delimited string resolves to peer")
        },
        Case {
            peer: None,
            chain: json!(["1.2.3.4"]),
            expected_tags: &[FAILURE_TAG],
            ..Case::new("missing peer fails")
        },
        Case {
            peer: Some("localhost"),
            chain: json!(["1.2.3.4"]),
            expected_tags: &[FAILURE_TAG],
            ..Case::new("invalid peer fails")
        },
        Case {
            chain: json!(["1.2.3.4"]),
            string_mode: true,
            expected_tags: &[FAILURE_TAG],
            ..Case::new("string mode rejects a list")
        },
        Case {
            chain: json!("1.2.3.4"),
            expected_ip: Some("1.2.3.4"),
            ..Case::new("bare string is a one-element chain")
        },
        Case {
            peer: None,
            check_peer: false,
            expected_tags: &[FAILURE_TAG],
            ..Case::new("legacy mode requires a chain")
        },
        Case {
            peer: None,
            check_peer: false,
            chain: json!(["8.8.8.8", "10.0.0.1"]),
            expected_ip: Some("8.8.8.8"),
            ..Case::new("legacy mode evaluates chain without peer")
        },
        Case {
            peer: Some("1.1.1.1"),
            check_peer: false,
            chain: json!(["8.8.8.8", "10.0.0.1"]),
            expected_ip: Some("8.8.8.8"),
            ..Case::new("legacy mode ignores untrusted peer")
        },
        Case {
            peer: Some("192.168.0.1"),
            chain: json!(["2001:db8::1", "10.0.0.1"]),
            expected_ip: Some("2001:db8::1"),
            ..Case::new("mixed families")
        },
    ]
}

fn build_event(case: &Case) -> real_ip::Event {
    let mut value = json!({});
    if let Some(peer) = case.peer {
        value["remote_addr"] = json!(peer);
    }
    if !case.chain.is_null() {
        value["x_forwarded_for"] = case.chain.clone();
    }
    event(value)
}

#[test]
fn test_resolution_scenarios() {
    for case in cases() {
        let filter = filter_with(|config| {
            config.x_forwarded_for_is_string = case.string_mode;
            config.check_remote_address = case.check_peer;
            if case.collect {
                config.x_forwarded_for_target = "xff_chain".into();
            }
        });

        let mut e = build_event(&case);
        let evaluation = filter.filter(&mut e);

        assert_eq!(
            evaluation.resolved_address().map(|ip| ip.to_string()).as_deref(),
            case.expected_ip,
            "{}: resolved address",
            case.name
        );
        assert_eq!(
            field(&e, "real_ip"),
            case.expected_ip.map(|ip| json!(ip)),
            "{}: target field",
            case.name
        );

        let mut expected_tags: Vec<String> = case.expected_tags.iter().map(|t| t.to_string()).collect();
        expected_tags.sort();
        assert_eq!(sorted_tags(&e), expected_tags, "{}: tags", case.name);

        if let Some(expected_chain) = &case.expected_chain {
            assert_eq!(field(&e, "xff_chain").as_ref(), Some(expected_chain), "{}: chain", case.name);
        }
    }
}

#[test]
fn test_scenarios_are_idempotent() {
    for case in cases() {
        let filter = filter_with(|config| {
            config.x_forwarded_for_is_string = case.string_mode;
            config.check_remote_address = case.check_peer;
            config.x_forwarded_for_target = if case.collect { "xff_chain".into() } else { String::new() };
        });
        let evaluator = filter.evaluator();

        let e = build_event(&case);
        let peer = e.get_field(&"remote_addr".parse().unwrap());
        let chain = e.get_field(&"x_forwarded_for".parse().unwrap());
        assert_eq!(evaluator.evaluate(&peer, &chain), evaluator.evaluate(&peer, &chain), "{}", case.name);
    }
}

#[test]
fn test_failure_reasons() {
    let filter = filter_with(|config| config.x_forwarded_for_is_string = true);
    let cases = [
        (json!({"x_forwarded_for": "1.2.3.4"}), FailureKind::MissingPeerAddress),
        (json!({"remote_addr": "10.2.3", "x_forwarded_for": "1.2.3.4"}), FailureKind::InvalidPeerAddress),
        (json!({"remote_addr": 42, "x_forwarded_for": "1.2.3.4"}), FailureKind::InvalidPeerAddress),
        (json!({"remote_addr": "10.2.3.4", "x_forwarded_for": ["1.2.3.4"]}), FailureKind::ChainNotString),
        (json!({"remote_addr": "10.2.3.4", "x_forwarded_for": 1234}), FailureKind::ChainNotString),
        (json!({"remote_addr": "10.2.3.4", "x_forwarded_for": "1.2.3.4,"}), FailureKind::InvalidAddressInChain),
    ];

    for (value, expected) in cases {
        let mut e = event(value.clone());
        assert_eq!(filter.filter(&mut e).failure(), Some(expected), "{}", value);
    }

    // Sequence mode: a scalar is a one-element chain that fails to parse
    let sequence = filter_with(|_| {});
    let mut e = event(json!({"remote_addr": "10.2.3.4", "x_forwarded_for": 1234}));
    assert_eq!(sequence.filter(&mut e).failure(), Some(FailureKind::InvalidAddressInChain));
    assert_eq!(sorted_tags(&e), vec![INVALID_TAG, FAILURE_TAG]);
    assert_eq!(field(&e, "real_ip"), None);

    let legacy = filter_with(|config| config.check_remote_address = false);
    let mut e = event(json!({"remote_addr": "10.2.3.4"}));
    assert_eq!(legacy.filter(&mut e).failure(), Some(FailureKind::MissingChain));
}

/// Reference coverage check: same family and equal high-order prefix bits.
fn covered_v4(addr: Ipv4Addr, net: Ipv4Addr, prefix: u8) -> bool {
    if prefix == 0 {
        return true;
    }
    let shift = 32 - u32::from(prefix);
    (u32::from(addr) >> shift) == (u32::from(net) >> shift)
}

#[test]
fn test_contains_matches_prefix_bits() {
    let networks = [("10.0.0.0", 8), ("172.16.0.0", 12), ("192.168.1.0", 24), ("203.0.113.7", 32)];
    let entries: Vec<String> = networks.iter().map(|(a, p)| format!("{}/{}", a, p)).collect();
    let set = TrustedNetworks::parse(&entries).unwrap();

    let samples = [
        "10.0.0.0", "10.255.255.255", "11.0.0.0", "172.15.255.255", "172.16.0.1", "172.31.255.255",
        "172.32.0.0", "192.168.1.77", "192.168.2.1", "203.0.113.7", "203.0.113.8", "8.8.8.8",
    ];

    for sample in samples {
        let addr: Ipv4Addr = sample.parse().unwrap();
        let expected = networks
            .iter()
            .any(|(net, prefix)| covered_v4(addr, net.parse().unwrap(), *prefix));
        assert_eq!(set.contains(&IpAddr::V4(addr)), expected, "{}", sample);
        // Same bits, other family: never covered
        assert!(!set.contains(&IpAddr::V6(addr.to_ipv6_mapped())), "{}", sample);
    }
}
