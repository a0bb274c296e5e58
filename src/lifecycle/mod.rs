//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Validate → Init metrics → Build filter
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop reading input → Flush output → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The filter is fully built before the first event is read

pub mod shutdown;
pub mod signals;
pub mod startup;
