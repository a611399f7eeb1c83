//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Classify every request as liveness, API or static traffic
//! - Resolve API paths to the upstream path they are forwarded to
//! - Return an explicit no-match for API paths outside the proxy rules
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) prefix scans (acceptable for a handful of mounts and rewrites)
//! - Explicit no-match rather than silent default

use axum::http::{Method, Uri};

use crate::config::{ApiConfig, HealthConfig};
use crate::routing::matcher::PathPrefix;
use crate::routing::rewrite::Rewriter;

/// Destination class of an inbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    Health,
    Api,
    Static,
}

impl RouteKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteKind::Health => "health",
            RouteKind::Api => "api",
            RouteKind::Static => "static",
        }
    }
}

/// Where an API request goes on the upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiTarget {
    /// Upstream path, relative to the upstream base URL.
    pub path: String,
    /// Query string, carried unchanged.
    pub query: Option<String>,
}

/// Compiled routing rules.
#[derive(Debug, Clone)]
pub struct RouteTable {
    health_path: String,
    api_prefix: PathPrefix,
    strip_prefix: bool,
    mounts: Vec<PathPrefix>,
    rewriter: Rewriter,
}

impl RouteTable {
    pub fn from_config(api: &ApiConfig, health: &HealthConfig) -> Self {
        Self {
            health_path: health.path.clone(),
            api_prefix: PathPrefix::new(api.prefix.as_str()),
            strip_prefix: api.strip_prefix,
            mounts: api.mounts.iter().map(|m| PathPrefix::new(m.as_str())).collect(),
            rewriter: Rewriter::from_config(&api.rewrites),
        }
    }

    /// Classify a request. Only `GET` on the health path is liveness traffic.
    pub fn classify(&self, method: &Method, path: &str) -> RouteKind {
        if *method == Method::GET && path == self.health_path {
            RouteKind::Health
        } else if self.api_prefix.matches(path) {
            RouteKind::Api
        } else {
            RouteKind::Static
        }
    }

    /// Resolve an API-prefixed URI to its upstream target.
    ///
    /// Returns `None` when the path is not API-prefixed, names nothing after
    /// the prefix, carries a dot segment, or falls outside the configured
    /// mounts.
    pub fn api_target(&self, uri: &Uri) -> Option<ApiTarget> {
        let rest = self.api_prefix.strip(uri.path())?;
        if rest.is_empty() || rest == "/" || has_dot_segment(rest) {
            return None;
        }

        let rewritten = self.rewriter.rewrite(rest);
        if !self.mounts.is_empty() && !self.mounts.iter().any(|m| m.matches(&rewritten)) {
            return None;
        }

        let path = if self.strip_prefix {
            rewritten.into_owned()
        } else {
            format!("{}{}", self.api_prefix.as_str(), rewritten)
        };

        Some(ApiTarget {
            path,
            query: uri.query().map(str::to_owned),
        })
    }
}

/// True if any segment is `.` or `..`, including `%2e` spellings.
///
/// The upstream URL resolves such segments, which would move the request
/// outside the mount it was checked against.
fn has_dot_segment(path: &str) -> bool {
    path.split('/').any(|segment| {
        let decoded = segment.to_ascii_lowercase().replace("%2e", ".");
        decoded == "." || decoded == ".."
    })
}
