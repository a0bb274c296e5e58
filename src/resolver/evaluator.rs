//! Trust-chain evaluator.
//!
//! # Responsibilities
//! - Gate on the peer address (optional legacy mode skips the gate)
//! - Walk the forwarded-for chain right to left
//! - Pick the first untrusted address, or the left-most if all are trusted
//! - Collect valid addresses and invalid-token diagnostics
//!
//! # Scan States
//! ```text
//! Scanning ──untrusted──▶ Resolved(ip)
//!    │
//!    └──invalid──▶ Failed                     (not collecting, stops)
//!               └▶ FailedPendingCollection     (collecting, keeps scanning)
//! ```
//! Once out of `Scanning` the outcome is fixed; further tokens only feed the
//! collected chain and the diagnostics.

use std::collections::VecDeque;
use std::net::IpAddr;

use crate::net::{parse_address, TrustedNetworks};
use crate::resolver::chain::{self, FieldValue};
use crate::resolver::outcome::{Evaluation, FailureKind, Outcome};

/// Evaluation options, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluatorOptions {
    /// Use the peer address as a trust gate. When disabled the chain is
    /// evaluated on its own and an absent chain is a failure.
    pub require_peer_trust_check: bool,

    /// The chain arrives as one comma-delimited string.
    pub chain_is_delimited_string: bool,

    /// Keep scanning after the decision to collect every valid address.
    pub collect_all_valid_addresses: bool,
}

impl Default for EvaluatorOptions {
    fn default() -> Self {
        Self {
            require_peer_trust_check: true,
            chain_is_delimited_string: false,
            collect_all_valid_addresses: false,
        }
    }
}

/// Scan state of the right-to-left walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Scanning,
    Resolved(IpAddr),
    FailedPendingCollection,
    Failed,
}

impl ScanState {
    fn on_invalid(self, collect: bool) -> Self {
        match self {
            ScanState::Scanning if collect => ScanState::FailedPendingCollection,
            ScanState::Scanning => ScanState::Failed,
            decided => decided,
        }
    }

    fn on_valid(self, ip: IpAddr, trusted: bool) -> Self {
        match self {
            ScanState::Scanning if !trusted => ScanState::Resolved(ip),
            other => other,
        }
    }

    /// Whether the walk can stop.
    fn is_done(self, collect: bool) -> bool {
        match self {
            ScanState::Scanning => false,
            ScanState::Failed => true,
            ScanState::Resolved(_) | ScanState::FailedPendingCollection => !collect,
        }
    }
}

/// Resolves the real client address from a peer and forwarded-for chain.
///
/// Immutable after construction; share it freely across threads.
#[derive(Debug, Clone)]
pub struct Evaluator {
    trusted: TrustedNetworks,
    options: EvaluatorOptions,
}

impl Evaluator {
    pub fn new(trusted: TrustedNetworks, options: EvaluatorOptions) -> Self {
        Self { trusted, options }
    }

    pub fn trusted_networks(&self) -> &TrustedNetworks {
        &self.trusted
    }

    /// Evaluate one peer/chain pair.
    pub fn evaluate(&self, peer: &FieldValue, chain_input: &FieldValue) -> Evaluation {
        let peer_ip = if self.options.require_peer_trust_check {
            match peer {
                FieldValue::Absent => return Evaluation::failed(FailureKind::MissingPeerAddress),
                FieldValue::Single(raw) => match parse_address(raw) {
                    Some(ip) => Some(ip),
                    None => {
                        tracing::debug!(peer = %raw, "peer address is not a valid IP");
                        return Evaluation::failed(FailureKind::InvalidPeerAddress);
                    }
                },
                FieldValue::Sequence(_) | FieldValue::Other(_) => {
                    tracing::debug!(peer = ?peer, "peer address is not a string");
                    return Evaluation::failed(FailureKind::InvalidPeerAddress);
                }
            }
        } else {
            None
        };

        if chain_input.is_absent() {
            return Self::fall_back_to_peer(peer_ip);
        }

        let tokens = match chain::normalize(chain_input, self.options.chain_is_delimited_string) {
            Ok(tokens) => tokens,
            Err(kind) => return Evaluation::failed(kind),
        };

        if chain::is_blank(&tokens) {
            return Self::fall_back_to_peer(peer_ip);
        }

        if let Some(ip) = peer_ip {
            if !self.trusted.contains(&ip) {
                tracing::trace!(peer = %ip, "peer not trusted, ignoring forwarded-for chain");
                return Evaluation::resolved(ip);
            }
        }

        self.scan(&tokens)
    }

    /// No usable chain: the verified peer is the client. Without a peer gate
    /// there is nothing to fall back to.
    fn fall_back_to_peer(peer_ip: Option<IpAddr>) -> Evaluation {
        match peer_ip {
            Some(ip) => Evaluation::resolved(ip),
            None => Evaluation::failed(FailureKind::MissingChain),
        }
    }

    fn scan(&self, tokens: &[&str]) -> Evaluation {
        let collect = self.options.collect_all_valid_addresses;
        let mut state = ScanState::Scanning;
        let mut valid_chain = VecDeque::with_capacity(tokens.len());
        let mut invalid_tokens = Vec::new();

        for (index, token) in tokens.iter().enumerate().rev() {
            match parse_address(token) {
                Some(ip) => {
                    valid_chain.push_front(ip);
                    let trusted = self.trusted.contains(&ip);
                    tracing::trace!(index, address = %ip, trusted, "forwarded-for entry");
                    state = state.on_valid(ip, trusted);
                }
                None => {
                    tracing::debug!(index, token = %token, decided = state != ScanState::Scanning, "invalid address in forwarded-for chain");
                    invalid_tokens.push(token.to_string());
                    state = state.on_invalid(collect);
                }
            }

            if state.is_done(collect) {
                break;
            }
        }
        invalid_tokens.reverse();

        let outcome = match state {
            ScanState::Resolved(ip) => Outcome::Resolved(ip),
            // Every entry was valid and trusted: the left-most one is the client
            ScanState::Scanning => match valid_chain.front() {
                Some(ip) => Outcome::Resolved(*ip),
                None => Outcome::Failed(FailureKind::MissingChain),
            },
            ScanState::FailedPendingCollection | ScanState::Failed => {
                Outcome::Failed(FailureKind::InvalidAddressInChain)
            }
        };

        Evaluation {
            outcome,
            valid_chain: collect.then(|| valid_chain.into()),
            invalid_tokens,
        }
    }
}
