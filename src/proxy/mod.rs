//! Forwarding subsystem.
//!
//! # Data Flow
//! ```text
//! InboundRequest
//!     → forwarder.rs (fixed headers, target URL, one scoped client)
//!     → upstream call bounded by the configured timeout
//!     → UpstreamResponse { Structured(json) | Raw(stream) }
//!       or ProxyError (error.rs)
//! ```
//!
//! # Design Decisions
//! - Exactly one outbound call per inbound request; no retries
//! - Non-2xx statuses are errors unless pass-through is configured
//! - Translation into HTTP responses happens only in `http::response`

pub mod error;
pub mod forwarder;

pub use error::{ProxyError, ProxyResult};
pub use forwarder::{Forwarder, UpstreamBody, UpstreamResponse};
