//! Error taxonomy for a single relayed request.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur while relaying one request.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// Inbound body could not be read.
    #[error("could not read request body: {0}")]
    Decode(String),

    /// Network, DNS, TLS or timeout failure while talking to upstream.
    #[error("{0}")]
    UpstreamTransport(#[from] reqwest::Error),

    /// Upstream answered with a non-2xx status.
    #[error("upstream responded with {status}: {body}")]
    UpstreamStatus { status: StatusCode, body: String },

    /// Upstream declared JSON but the body did not parse.
    #[error("invalid JSON from upstream: {0}")]
    ResponseDecode(#[from] serde_json::Error),
}

/// Result type for relay operations.
pub type ProxyResult<T> = Result<T, ProxyError>;

impl ProxyError {
    /// Whether the failure happened during the forwarding call itself.
    pub fn is_forwarding(&self) -> bool {
        !matches!(self, ProxyError::Decode(_))
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ProxyError::UpstreamTransport(e) if e.is_timeout())
    }

    /// Caller-facing message placed in the error envelope.
    pub fn envelope_message(&self) -> String {
        if self.is_forwarding() {
            format!("Error forwarding request: {}", self)
        } else {
            format!("Unexpected error: {}", self)
        }
    }
}
