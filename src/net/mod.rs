//! Network primitives subsystem.
//!
//! # Data Flow
//! ```text
//! trusted_networks (config strings)
//!     → trust_set.rs (parse CIDR / bare address, all-or-nothing)
//!     → TrustedNetworks (immutable, shared via Arc)
//!
//! raw address token (peer or forwarded-for entry)
//!     → address.rs (strict parse to IpAddr)
//!     → TrustedNetworks::contains
//! ```
//!
//! # Design Decisions
//! - Address families never mix: an IPv4 address is only covered by IPv4 networks
//! - IPv4-mapped IPv6 addresses are not unmapped
//! - Parsing is strict: no abbreviated IPv4 forms, no leading-zero octets

pub mod address;
pub mod trust_set;

pub use address::parse_address;
pub use trust_set::{NetworkConfigError, TrustedNetworks};
