//! Event stream pipeline.
//!
//! # Data Flow
//! ```text
//! input (newline-delimited JSON)
//!     → stream.rs (decode line → Event)
//!     → handle.rs (current RealIpFilter snapshot)
//!     → RealIpFilter::filter
//!     → stream.rs (encode Event → output line)
//!
//! Config updates (watcher channel):
//!     → handle.rs rebuilds the filter and swaps the snapshot
//! ```
//!
//! # Design Decisions
//! - One bad line never stops the stream; it is passed through tagged
//! - Each event sees exactly one filter snapshot
//! - A rejected reload keeps the previous filter

pub mod handle;
pub mod stream;

pub use handle::FilterHandle;
pub use stream::{run, PipelineStats, JSON_PARSE_FAILURE_TAG};
