//! Address token parsing.

use std::net::IpAddr;

/// Parse a single address token.
///
/// Surrounding whitespace is ignored. Anything the standard library does not
/// accept as a canonical IPv4 or IPv6 literal (e.g. `10.5`, `010.0.0.1`,
/// `host.example`) yields `None`.
pub fn parse_address(token: &str) -> Option<IpAddr> {
    token.trim().parse().ok()
}
