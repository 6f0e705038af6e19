//! Outbound request synthesis and execution.

use std::time::Duration;

use axum::body::Bytes;
use futures_util::stream::{BoxStream, StreamExt};
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::StatusCode;
use serde_json::Value;

use crate::config::UpstreamConfig;
use crate::http::request::{InboundRequest, ProxyMethod, RequestBody};
use crate::proxy::error::{ProxyError, ProxyResult};

/// Browser-like agent announced to the upstream.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/136.0.0.0 Safari/537.36";

/// Upstream body relayed chunk by chunk.
pub type ByteStream = BoxStream<'static, reqwest::Result<Bytes>>;

/// Upstream body, decided once from the upstream content type.
pub enum UpstreamBody {
    Structured(Value),
    Raw(ByteStream),
}

impl std::fmt::Debug for UpstreamBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UpstreamBody::Structured(v) => f.debug_tuple("Structured").field(v).finish(),
            UpstreamBody::Raw(_) => f.write_str("Raw(..)"),
        }
    }
}

/// What came back from the upstream.
#[derive(Debug)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: UpstreamBody,
}

/// `<base>/<path>[?<query>]`
pub fn target_url(base: &str, path: &str, query: Option<&str>) -> String {
    match query {
        Some(q) if !q.is_empty() => format!("{}/{}?{}", base, path, q),
        _ => format!("{}/{}", base, path),
    }
}

/// The fixed header set sent upstream. Inbound headers are never copied.
pub fn outbound_headers(body: &RequestBody) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::USER_AGENT, HeaderValue::from_static(USER_AGENT));
    headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(
        header::ACCEPT_LANGUAGE,
        HeaderValue::from_static("en-US,en;q=0.9"),
    );
    headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
    if let Some(content_type) = body.content_type() {
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    }
    headers
}

fn is_json(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|ct| ct.starts_with("application/json"))
}

/// Issues exactly one outbound call per inbound request.
#[derive(Debug, Clone)]
pub struct Forwarder {
    upstream: UpstreamConfig,
}

impl Forwarder {
    pub fn new(upstream: UpstreamConfig) -> Self {
        Self { upstream }
    }

    /// Total budget for connect, send and receive.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.upstream.timeout_secs)
    }

    /// Forward `request` upstream and classify what comes back.
    pub async fn forward(&self, request: InboundRequest) -> ProxyResult<UpstreamResponse> {
        let url = target_url(
            self.upstream.normalized_base(),
            &request.path,
            request.query.as_deref(),
        );
        let headers = outbound_headers(&request.body);

        tracing::info!(
            method = %request.method.as_method(),
            path = %request.path,
            "Forwarding request"
        );
        tracing::debug!(
            headers = ?headers,
            body = request.body.shape(),
            "Outbound request prepared"
        );

        // One client per call; dropped once the call returns.
        let mut client = reqwest::Client::builder()
            .timeout(self.timeout())
            .pool_max_idle_per_host(0);
        if !self.upstream.use_system_proxy {
            client = client.no_proxy();
        }
        let client = client.build()?;

        let builder = client
            .request(request.method.as_method(), url)
            .headers(headers);
        let builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Raw(bytes) => builder.body(bytes),
        };

        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() && !self.upstream.pass_through_error_status {
            let body = response.text().await.unwrap_or_default();
            return Err(ProxyError::UpstreamStatus { status, body });
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = if request.method != ProxyMethod::Head && is_json(content_type.as_deref()) {
            let bytes = response.bytes().await?;
            UpstreamBody::Structured(serde_json::from_slice(&bytes)?)
        } else {
            UpstreamBody::Raw(response.bytes_stream().boxed())
        };

        tracing::debug!(status = %status, content_type = ?content_type, "Upstream responded");

        Ok(UpstreamResponse {
            status,
            content_type,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_target_url() {
        assert_eq!(
            target_url("https://api.telegram.org", "bot1:x/getMe", None),
            "https://api.telegram.org/bot1:x/getMe"
        );
        assert_eq!(
            target_url("http://up", "a/b", Some("x=1&x=2")),
            "http://up/a/b?x=1&x=2"
        );
        assert_eq!(target_url("http://up", "", Some("")), "http://up/");
    }

    #[test]
    fn test_fixed_headers_without_body() {
        let headers = outbound_headers(&RequestBody::Empty);
        assert_eq!(headers.len(), 4);
        assert_eq!(headers[header::USER_AGENT], USER_AGENT);
        assert_eq!(headers[header::ACCEPT], "application/json");
        assert_eq!(headers[header::ACCEPT_LANGUAGE], "en-US,en;q=0.9");
        assert_eq!(headers[header::CONNECTION], "keep-alive");
        assert!(headers.get(header::CONTENT_TYPE).is_none());
    }

    #[test]
    fn test_content_type_for_body_shapes() {
        let json_headers = outbound_headers(&RequestBody::Json(json!({"a": 1})));
        assert_eq!(json_headers[header::CONTENT_TYPE], "application/json");

        let raw_headers = outbound_headers(&RequestBody::Raw(Bytes::from_static(b"a=1")));
        assert_eq!(
            raw_headers[header::CONTENT_TYPE],
            "application/x-www-form-urlencoded"
        );
    }

    #[test]
    fn test_json_detection() {
        assert!(is_json(Some("application/json")));
        assert!(is_json(Some("application/json; charset=utf-8")));
        assert!(!is_json(Some("image/png")));
        assert!(!is_json(None));
    }

    #[test]
    fn test_timeout_from_config() {
        let forwarder = Forwarder::new(UpstreamConfig::default());
        assert_eq!(forwarder.timeout(), Duration::from_secs(30));
    }
}
