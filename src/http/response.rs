//! Response handling and transformation.
//!
//! # Responsibilities
//! - Turn an `UpstreamResponse` into the caller's response
//! - Keep only the upstream content type; every other upstream header is dropped
//! - Stream raw upstream bodies without buffering them
//! - Map every `ProxyError` to `500 {"error": ...}`
//!
//! Cross-origin headers are added to every response by the router layers.

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use futures_util::TryStreamExt;
use serde::Serialize;
use serde_json::json;

use crate::http::request::UnsupportedMethod;
use crate::proxy::{ProxyError, UpstreamBody, UpstreamResponse};

const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// Fixed payload served on `GET /`.
#[derive(Debug, Clone, Serialize)]
pub struct WelcomePayload {
    pub message: String,
    pub usage: String,
    pub example: String,
}

impl WelcomePayload {
    pub fn for_upstream(upstream_host: &str) -> Self {
        Self {
            message: "API relay is running".to_string(),
            usage: format!("Use this URL in place of {}", upstream_host),
            example: "https://relay.example.org/bot<token>/sendMessage".to_string(),
        }
    }
}

impl IntoResponse for UpstreamResponse {
    fn into_response(self) -> Response {
        let content_type = self
            .content_type
            .as_deref()
            .and_then(|ct| HeaderValue::from_str(ct).ok())
            .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_CONTENT_TYPE));
        let headers = [(header::CONTENT_TYPE, content_type)];

        match self.body {
            UpstreamBody::Structured(value) => (self.status, headers, Json(value)).into_response(),
            UpstreamBody::Raw(stream) => {
                let stream = stream.inspect_err(|e| {
                    tracing::error!(error = %e, "Upstream body stream failed");
                });
                (self.status, headers, Body::from_stream(stream)).into_response()
            }
        }
    }
}

/// The single error envelope shape.
pub fn error_envelope(status: StatusCode, message: String) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        error_envelope(StatusCode::INTERNAL_SERVER_ERROR, self.envelope_message())
    }
}

impl IntoResponse for UnsupportedMethod {
    fn into_response(self) -> Response {
        error_envelope(
            StatusCode::METHOD_NOT_ALLOWED,
            format!("Method {} is not allowed", self.0),
        )
    }
}
