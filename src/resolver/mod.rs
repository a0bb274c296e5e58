//! Trust-chain resolution subsystem.
//!
//! # Data Flow
//! ```text
//! peer field + forwarded-for field (FieldValue)
//!     → chain.rs (normalize: split delimited string or take sequence)
//!     → evaluator.rs (peer gate, right-to-left scan state machine)
//!     → outcome.rs (Evaluation: resolved address or failure + diagnostics)
//!     → caller applies the Evaluation to its own record
//! ```
//!
//! # Design Decisions
//! - Evaluation is a pure function of (peer, chain, trusted networks)
//! - Right-most entry is the nearest hop; trust is checked right to left
//! - An invalid token only fails the evaluation if no decision was made yet
//! - Diagnostics go to `tracing`; they never change the outcome

pub mod chain;
pub mod evaluator;
pub mod outcome;

pub use chain::FieldValue;
pub use evaluator::{Evaluator, EvaluatorOptions};
pub use outcome::{Evaluation, FailureKind, Outcome};
