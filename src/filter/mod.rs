//! Event filtering subsystem.
//!
//! # Data Flow
//! ```text
//! Event (JSON object)
//!     → field_ref.rs (resolve configured field paths)
//!     → event.rs (read peer / forwarded-for as FieldValue)
//!     → real_ip.rs (evaluate, write target field and tags)
//!     → Event handed back to the pipeline
//! ```
//!
//! # Design Decisions
//! - Per-event failures become tags; they never abort the stream
//! - The host record model is a trait, so non-JSON hosts can reuse the filter

pub mod event;
pub mod field_ref;
pub mod real_ip;

pub use event::{Event, EventRecord};
pub use field_ref::{FieldRef, FieldRefError};
pub use real_ip::RealIpFilter;
