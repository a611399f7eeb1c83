//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files, and
//! every field has a default so an empty file is a valid configuration.

use std::fmt;
use std::net::{AddrParseError, IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Root configuration for the console proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind host, port, TLS).
    pub listener: ListenerConfig,

    /// The controller that API traffic is forwarded to.
    pub upstream: UpstreamConfig,

    /// API prefix, mounts and path rewrites.
    pub api: ApiConfig,

    /// Built single-page application.
    pub static_files: StaticFilesConfig,

    /// Liveness endpoint.
    pub health: HealthConfig,

    /// Inbound deadlines.
    pub timeouts: TimeoutConfig,

    /// Logging and metrics.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// IP address to bind (e.g., "0.0.0.0").
    pub host: String,

    /// Local port.
    pub port: u16,

    /// Optional TLS configuration. Plain HTTP when absent.
    pub tls: Option<TlsConfig>,
}

impl ListenerConfig {
    /// Socket address built from `host` and `port`.
    pub fn socket_addr(&self) -> Result<SocketAddr, AddrParseError> {
        let ip: IpAddr = self.host.parse()?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            tls: None,
        }
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: PathBuf,

    /// Path to private key file (PEM).
    pub key_path: PathBuf,
}

/// Upstream controller configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Controller origin, e.g. "https://controller.example.net:5825".
    pub base_url: String,

    /// Accept any certificate presented by the upstream.
    ///
    /// SECURITY: only for controllers with self-signed certificates on a
    /// network path that is already trusted.
    pub insecure_skip_tls_verify: bool,

    /// Honour `HTTP_PROXY`/`HTTPS_PROXY` for upstream calls.
    pub use_system_proxy: bool,

    /// TCP/TLS connect timeout in seconds.
    pub connect_timeout_secs: u64,

    /// Total upstream request timeout (headers and body) in seconds.
    pub request_timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://localhost:5825".to_string(),
            insecure_skip_tls_verify: false,
            use_system_proxy: false,
            connect_timeout_secs: 5,
            request_timeout_secs: 30,
        }
    }
}

/// API proxying rules.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Path prefix routed to the upstream.
    pub prefix: String,

    /// Remove the prefix before forwarding.
    pub strip_prefix: bool,

    /// Upstream path roots the console may reach. Empty allows every path.
    pub mounts: Vec<String>,

    /// Prefix rewrites, first match wins.
    pub rewrites: Vec<RewriteConfig>,

    /// Maximum inbound request body in bytes.
    pub max_body_bytes: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            prefix: "/api".to_string(),
            strip_prefix: true,
            mounts: vec!["/management".to_string(), "/platformmanager".to_string()],
            rewrites: vec![RewriteConfig {
                from: "/management/platformmanager".to_string(),
                to: "/platformmanager".to_string(),
            }],
            max_body_bytes: 10 * 1024 * 1024,
        }
    }
}

/// A single segment-bounded prefix rewrite.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RewriteConfig {
    pub from: String,
    pub to: String,
}

/// Static asset hosting.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StaticFilesConfig {
    /// Directory holding the built application.
    pub root: PathBuf,

    /// Entry document, relative to `root`.
    pub index: String,

    /// Cache-Control for HTML documents.
    pub html_cache_control: String,

    /// Cache-Control for content-hashed JS/CSS bundles.
    pub immutable_cache_control: String,

    /// Cache-Control for images and fonts.
    pub media_cache_control: String,
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("dist"),
            index: "index.html".to_string(),
            html_cache_control: "no-cache, no-store, must-revalidate".to_string(),
            immutable_cache_control: "public, max-age=31536000, immutable".to_string(),
            media_cache_control: "public, max-age=86400".to_string(),
        }
    }
}

/// Liveness endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HealthConfig {
    pub path: String,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            path: "/health".to_string(),
        }
    }
}

/// Inbound timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Deadline for a whole inbound request in seconds.
    pub request_secs: u64,

    /// How long in-flight requests may drain after a shutdown signal.
    pub shutdown_grace_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 35,
            shutdown_grace_secs: 10,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{other}' (expected 'pretty' or 'json')")),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Pretty => write!(f, "pretty"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    pub log_level: String,

    pub log_format: LogFormat,

    /// Enable the Prometheus exporter.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
