//! Evaluation results.

use std::net::IpAddr;

use serde::Serialize;
use thiserror::Error;

/// Why an evaluation could not produce a real address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    #[error("peer address is missing")]
    MissingPeerAddress,

    #[error("peer address is not a valid IP address")]
    InvalidPeerAddress,

    #[error("forwarded-for chain is missing")]
    MissingChain,

    #[error("forwarded-for chain is not a string")]
    ChainNotString,

    #[error("forwarded-for chain contains an invalid address")]
    InvalidAddressInChain,
}

impl FailureKind {
    /// Stable label used for metrics and structured logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::MissingPeerAddress => "missing_peer_address",
            FailureKind::InvalidPeerAddress => "invalid_peer_address",
            FailureKind::MissingChain => "missing_chain",
            FailureKind::ChainNotString => "chain_not_string",
            FailureKind::InvalidAddressInChain => "invalid_address_in_chain",
        }
    }
}

/// Final decision of one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Resolved(IpAddr),
    Failed(FailureKind),
}

/// The result of evaluating a peer address and forwarded-for chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Evaluation {
    pub outcome: Outcome,

    /// Every valid chain address in original left-to-right order.
    /// Only populated when the evaluator collects addresses and the chain was scanned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_chain: Option<Vec<IpAddr>>,

    /// Raw chain tokens that failed to parse, in original order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub invalid_tokens: Vec<String>,
}

impl Evaluation {
    pub(crate) fn resolved(ip: IpAddr) -> Self {
        Self {
            outcome: Outcome::Resolved(ip),
            valid_chain: None,
            invalid_tokens: Vec::new(),
        }
    }

    pub(crate) fn failed(kind: FailureKind) -> Self {
        Self {
            outcome: Outcome::Failed(kind),
            valid_chain: None,
            invalid_tokens: Vec::new(),
        }
    }

    /// The resolved real address, if any.
    pub fn resolved_address(&self) -> Option<IpAddr> {
        match self.outcome {
            Outcome::Resolved(ip) => Some(ip),
            Outcome::Failed(_) => None,
        }
    }

    pub fn failure(&self) -> Option<FailureKind> {
        match self.outcome {
            Outcome::Resolved(_) => None,
            Outcome::Failed(kind) => Some(kind),
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self.outcome, Outcome::Resolved(_))
    }

    /// True if any chain token failed to parse, whatever the outcome.
    pub fn has_invalid_addresses(&self) -> bool {
        !self.invalid_tokens.is_empty()
    }
}
