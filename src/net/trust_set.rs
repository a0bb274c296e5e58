//! Trusted network set.
//!
//! # Responsibilities
//! - Parse configured network prefixes (CIDR or bare address)
//! - Answer whether an address belongs to any trusted network
//!
//! # Design Decisions
//! - Construction is all-or-nothing: one bad entry rejects the whole set
//! - A bare address is a host prefix (/32 or /128)
//! - Linear scan; trusted sets are small (single digits to low tens)

use std::fmt;
use std::net::IpAddr;

use ipnet::IpNet;
use thiserror::Error;

/// A trusted network entry failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid trusted network '{entry}': {reason}")]
pub struct NetworkConfigError {
    /// The offending configuration entry, as given.
    pub entry: String,
    /// Parser message.
    pub reason: String,
}

/// An immutable, ordered set of trusted IPv4/IPv6 networks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrustedNetworks {
    networks: Vec<IpNet>,
}

impl TrustedNetworks {
    /// Parse every entry into a network, preserving configuration order.
    pub fn parse<I, S>(entries: I) -> Result<Self, NetworkConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let networks = entries
            .into_iter()
            .map(|entry| parse_network(entry.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { networks })
    }

    /// Returns true if any network of the same family covers `addr`.
    pub fn contains(&self, addr: &IpAddr) -> bool {
        self.networks.iter().any(|net| net.contains(addr))
    }

    /// Number of configured networks.
    pub fn len(&self) -> usize {
        self.networks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }
}

impl fmt::Display for TrustedNetworks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, net) in self.networks.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", net)?;
        }
        Ok(())
    }
}

/// Parse a single network entry.
///
/// Accepts `addr/len` in either family, or a bare address which becomes a
/// host-only network.
pub fn parse_network(entry: &str) -> Result<IpNet, NetworkConfigError> {
    let trimmed = entry.trim();
    let error = |reason: String| NetworkConfigError {
        entry: entry.to_string(),
        reason,
    };

    if trimmed.contains('/') {
        trimmed.parse::<IpNet>().map_err(|e| error(e.to_string()))
    } else {
        trimmed
            .parse::<IpAddr>()
            .map(IpNet::from)
            .map_err(|e| error(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    #[test]
    fn test_cidr_match() {
        let set = TrustedNetworks::parse(["10.0.0.0/8", "192.168.0.0/16"]).unwrap();
        assert!(set.contains(&ip("10.2.3.4")));
        assert!(set.contains(&ip("192.168.3.4")));
        assert!(!set.contains(&ip("1.2.3.4")));
        assert!(!set.contains(&ip("192.169.0.1")));
    }

    #[test]
    fn test_bare_address_is_host_prefix() {
        let set = TrustedNetworks::parse(["10.0.0.1", "::1"]).unwrap();
        assert!(set.contains(&ip("10.0.0.1")));
        assert!(!set.contains(&ip("10.0.0.2")));
        assert!(set.contains(&ip("::1")));
        assert!(!set.contains(&ip("::2")));
        assert_eq!(set.to_string(), "10.0.0.1/32, ::1/128");
    }

    #[test]
    fn test_families_never_mix() {
        let set = TrustedNetworks::parse(["0.0.0.0/0"]).unwrap();
        assert!(set.contains(&ip("8.8.8.8")));
        assert!(!set.contains(&ip("2001:db8::1")));
        // IPv4-mapped addresses stay IPv6
        assert!(!set.contains(&ip("::ffff:8.8.8.8")));

        let set = TrustedNetworks::parse(["::/0"]).unwrap();
        assert!(set.contains(&ip("2001:db8::1")));
        assert!(!set.contains(&ip("8.8.8.8")));
    }

    #[test]
    fn test_ipv6_prefix() {
        let set = TrustedNetworks::parse(["fd00::/8", "2001:db8:abcd::/48"]).unwrap();
        assert!(set.contains(&ip("fd12:3456::1")));
        assert!(set.contains(&ip("2001:db8:abcd:12::1")));
        assert!(!set.contains(&ip("2001:db8:abce::1")));
    }

    #[test]
    fn test_host_bits_in_network_are_masked() {
        let set = TrustedNetworks::parse(["10.1.2.3/8"]).unwrap();
        assert!(set.contains(&ip("10.200.0.1")));
    }

    #[test]
    fn test_whitespace_trimmed() {
        let set = TrustedNetworks::parse([" 172.16.0.0/12 "]).unwrap();
        assert!(set.contains(&ip("172.20.5.10")));
    }

    #[test]
    fn test_invalid_entry_rejects_whole_set() {
        let err = TrustedNetworks::parse(["10.0.0.0/8", "10.0.0.0/33"]).unwrap_err();
        assert_eq!(err.entry, "10.0.0.0/33");

        assert!(TrustedNetworks::parse(["not-a-network"]).is_err());
        assert!(TrustedNetworks::parse(["999.999.999.999/32"]).is_err());
        assert!(TrustedNetworks::parse([""]).is_err());
        assert!(TrustedNetworks::parse(["10.5/8"]).is_err());
    }

    #[test]
    fn test_parse_is_idempotent() {
        let entries = vec!["10.0.0.0/8".to_string(), "fd00::/8".to_string()];
        let a = TrustedNetworks::parse(&entries).unwrap();
        let b = TrustedNetworks::parse(&entries).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn test_empty_set_trusts_nothing() {
        let set = TrustedNetworks::parse(Vec::<String>::new()).unwrap();
        assert!(set.is_empty());
        assert!(!set.contains(&ip("10.0.0.1")));
    }
}
