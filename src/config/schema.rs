//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the router.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the asset router.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Upstream origins the router forwards to.
    pub upstreams: UpstreamConfig,

    /// Cache-Control directives set on relayed responses.
    pub cache: CacheConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Desktop browser agent sent to the font stylesheet API.
///
/// The API picks the font container format from the User-Agent; this one
/// gets TrueType/OpenType sources instead of WOFF2.
pub const DEFAULT_FONT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; U; Intel Mac OS X 10_6_8; de-at) AppleWebKit/533.21.1 (KHTML, like Gecko) Version/5.0.5 Safari/533.21.1";

/// Upstream origins.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Raw file origin; requests go to `<asset_origin>/<branch><path>`.
    pub asset_origin: String,

    /// Branch used when the request has no `branch` query parameter.
    pub default_branch: String,

    /// Image endpoint served for `/favicon.ico`.
    pub favicon_url: String,

    /// Font stylesheet API (CSS2 endpoint).
    pub font_stylesheet_url: String,

    /// Redirect target of `/view-source`.
    pub source_url: String,

    /// User-Agent sent on stylesheet requests.
    pub font_user_agent: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            asset_origin: "https://raw.githubusercontent.com/luxass/assets".to_string(),
            default_branch: "main".to_string(),
            favicon_url: "https://image.luxass.dev/api/image/emoji".to_string(),
            font_stylesheet_url: "https://fonts.googleapis.com/css2".to_string(),
            source_url: "https://github.com/luxass/assets".to_string(),
            font_user_agent: DEFAULT_FONT_USER_AGENT.to_string(),
        }
    }
}

/// Cache lifetimes advertised to clients.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// max-age for proxied assets and the favicon.
    pub content_max_age_secs: u64,

    /// max-age for resolved font files.
    pub font_max_age_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            content_max_age_secs: 3600,
            font_max_age_secs: 86400,
        }
    }
}

impl CacheConfig {
    /// `Cache-Control` value for relayed content.
    pub fn content_directive(&self) -> String {
        public_max_age(self.content_max_age_secs)
    }

    /// `Cache-Control` value for font bytes.
    pub fn font_directive(&self) -> String {
        public_max_age(self.font_max_age_secs)
    }
}

fn public_max_age(secs: u64) -> String {
    format!("public, max-age={}", secs)
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Upstream connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Total time allowed for a single upstream fetch, body included.
    pub upstream_secs: u64,

    /// Inbound request timeout in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            upstream_secs: 30,
            request_secs: 60,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
