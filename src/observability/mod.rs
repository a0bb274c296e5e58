//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Evaluator / filter / pipeline produce:
//!     → logging.rs (structured log events on stderr)
//!     → metrics.rs (counters, gauges)
//!
//! Consumers:
//!     → Log aggregation (stderr, JSON lines in production)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - stdout carries events, so logs always go to stderr
//! - Metrics are cheap (atomic increments); without a recorder they are no-ops
//! - The core resolver only emits trace/debug events and never needs a subscriber

pub mod logging;
pub mod metrics;
