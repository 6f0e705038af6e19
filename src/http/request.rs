//! Inbound request decoding.
//!
//! # Responsibilities
//! - Restrict the relay to the seven supported verbs
//! - Capture the path and raw query string verbatim
//! - Decode the body as JSON, falling back to raw bytes
//!
//! # Design Decisions
//! - Only POST, PUT and PATCH carry a body; anything a client sends with
//!   other verbs is dropped
//! - The path comes from the request URI, not axum's `Path` extractor,
//!   so percent-encoding is left untouched

use axum::body::{Body, Bytes};
use axum::http::{Method, Request};
use serde_json::Value;

use crate::proxy::{ProxyError, ProxyResult};

/// The verbs the relay forwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl ProxyMethod {
    /// Whether an inbound body is read and forwarded for this verb.
    pub fn carries_body(self) -> bool {
        matches!(self, ProxyMethod::Post | ProxyMethod::Put | ProxyMethod::Patch)
    }

    pub fn as_method(self) -> Method {
        match self {
            ProxyMethod::Get => Method::GET,
            ProxyMethod::Post => Method::POST,
            ProxyMethod::Put => Method::PUT,
            ProxyMethod::Delete => Method::DELETE,
            ProxyMethod::Patch => Method::PATCH,
            ProxyMethod::Head => Method::HEAD,
            ProxyMethod::Options => Method::OPTIONS,
        }
    }
}

/// A verb outside the supported set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedMethod(pub Method);

impl TryFrom<&Method> for ProxyMethod {
    type Error = UnsupportedMethod;

    fn try_from(method: &Method) -> Result<Self, Self::Error> {
        match *method {
            Method::GET => Ok(ProxyMethod::Get),
            Method::POST => Ok(ProxyMethod::Post),
            Method::PUT => Ok(ProxyMethod::Put),
            Method::DELETE => Ok(ProxyMethod::Delete),
            Method::PATCH => Ok(ProxyMethod::Patch),
            Method::HEAD => Ok(ProxyMethod::Head),
            Method::OPTIONS => Ok(ProxyMethod::Options),
            _ => Err(UnsupportedMethod(method.clone())),
        }
    }
}

/// Body of a relayed request, decided once at decode time.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(Value),
    Raw(Bytes),
}

impl RequestBody {
    /// Classify raw inbound bytes.
    pub fn from_bytes(bytes: Bytes) -> Self {
        if bytes.is_empty() {
            return RequestBody::Empty;
        }
        match serde_json::from_slice::<Value>(&bytes) {
            Ok(value) => RequestBody::Json(value),
            Err(_) => RequestBody::Raw(bytes),
        }
    }

    /// Content type announced upstream for this body shape.
    pub fn content_type(&self) -> Option<&'static str> {
        match self {
            RequestBody::Empty => None,
            RequestBody::Json(_) => Some("application/json"),
            RequestBody::Raw(_) => Some("application/x-www-form-urlencoded"),
        }
    }

    /// Short label for logs.
    pub fn shape(&self) -> &'static str {
        match self {
            RequestBody::Empty => "empty",
            RequestBody::Json(_) => "json",
            RequestBody::Raw(_) => "raw",
        }
    }
}

/// Everything the forwarder needs from an inbound request.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub method: ProxyMethod,
    /// Path without its leading slash, exactly as received.
    pub path: String,
    /// Raw query string, if any.
    pub query: Option<String>,
    pub body: RequestBody,
}

impl InboundRequest {
    /// Decode an axum request. Bodies larger than `max_body_size` fail.
    pub async fn decode(
        method: ProxyMethod,
        request: Request<Body>,
        max_body_size: usize,
    ) -> ProxyResult<Self> {
        let (parts, body) = request.into_parts();
        let path = parts.uri.path();
        let path = path.strip_prefix('/').unwrap_or(path).to_string();
        let query = parts.uri.query().map(str::to_string);

        let body = if method.carries_body() {
            let bytes = axum::body::to_bytes(body, max_body_size)
                .await
                .map_err(|e| ProxyError::Decode(e.to_string()))?;
            RequestBody::from_bytes(bytes)
        } else {
            RequestBody::Empty
        };

        Ok(Self {
            method,
            path,
            query,
            body,
        })
    }
}
