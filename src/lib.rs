//! HTTP relay that forwards every request to one fixed upstream API.
//!
//! Clients talk to the relay's hostname instead of the upstream's; the
//! relay rebuilds each request with a fixed header set, forwards it and
//! hands back the upstream's status and body.

pub mod config;
pub mod http;
pub mod proxy;
pub mod lifecycle;
pub mod observability;

pub use config::schema::RelayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
