//! Real client IP resolution behind trusted proxies.
//!
//! Given the directly observed peer address and the forwarded-for chain
//! asserted by upstream proxies, pick the address of the real client: walk the
//! chain from the nearest hop backward while entries come from trusted
//! networks, and take the first untrusted one (or the left-most if all are
//! trusted).
//!
//! ```
//! use real_ip::{Evaluator, EvaluatorOptions, FieldValue, TrustedNetworks};
//!
//! let trusted = TrustedNetworks::parse(["10.0.0.0/8", "192.168.0.0/16"]).unwrap();
//! let evaluator = Evaluator::new(trusted, EvaluatorOptions::default());
//!
//! let evaluation = evaluator.evaluate(
//!     &FieldValue::from("10.2.3.4"),
//!     &FieldValue::from(vec!["1.2.3.4", "192.168.3.4"]),
//! );
//! assert_eq!(evaluation.resolved_address(), Some("1.2.3.4".parse().unwrap()));
//! ```

// Core
pub mod net;
pub mod resolver;

// Host integration
pub mod config;
pub mod filter;
pub mod pipeline;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::schema::AppConfig;
pub use filter::{Event, EventRecord, RealIpFilter};
pub use net::TrustedNetworks;
pub use resolver::{Evaluation, Evaluator, EvaluatorOptions, FailureKind, FieldValue, Outcome};
