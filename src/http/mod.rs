//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, routes, middleware)
//!     → request.rs (verb check, path/query capture, body decoding)
//!     → [proxy::Forwarder issues the upstream call]
//!     → response.rs (JSON re-encode or byte stream, error envelope)
//!     → Send to client with cross-origin headers
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{InboundRequest, ProxyMethod, RequestBody};
pub use server::HttpServer;
