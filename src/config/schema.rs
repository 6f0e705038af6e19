//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the relay.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the relay.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// The single upstream every request is forwarded to.
    pub upstream: UpstreamConfig,

    /// Inbound request limits.
    pub limits: LimitsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:2552").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:2552".to_string(),
        }
    }
}

/// Upstream configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Upstream origin, e.g. "https://api.telegram.org".
    pub base_url: String,

    /// Total time budget for one outbound call in seconds.
    pub timeout_secs: u64,

    /// Relay non-2xx upstream responses as-is instead of collapsing them
    /// into a 500 error envelope.
    pub pass_through_error_status: bool,

    /// Honour HTTP_PROXY/HTTPS_PROXY/NO_PROXY for the outbound call.
    pub use_system_proxy: bool,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.telegram.org".to_string(),
            timeout_secs: 30,
            pass_through_error_status: false,
            use_system_proxy: true,
        }
    }
}

impl UpstreamConfig {
    /// Base URL without a trailing slash, ready for `<base>/<path>` joins.
    pub fn normalized_base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    /// Host part of the base URL, used by the welcome payload.
    pub fn host(&self) -> String {
        url::Url::parse(&self.base_url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_else(|| self.base_url.clone())
    }
}

/// Inbound request limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum inbound body size in bytes.
    pub max_body_size: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_size: 50 * 1024 * 1024, // 50MB
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RelayConfig::default();
        assert_eq!(config.listener.bind_address, "0.0.0.0:2552");
        assert_eq!(config.upstream.base_url, "https://api.telegram.org");
        assert_eq!(config.upstream.timeout_secs, 30);
        assert!(!config.upstream.pass_through_error_status);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: RelayConfig = toml::from_str(
            r#"
            [upstream]
            base_url = "http://127.0.0.1:9000/"
            "#,
        )
        .unwrap();

        assert_eq!(config.upstream.normalized_base(), "http://127.0.0.1:9000");
        assert_eq!(config.upstream.timeout_secs, 30);
        assert_eq!(config.listener.bind_address, "0.0.0.0:2552");
    }

    #[test]
    fn test_upstream_host() {
        let upstream = UpstreamConfig::default();
        assert_eq!(upstream.host(), "api.telegram.org");
    }
}
