//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, ports valid)
//! - Check path shapes (prefixes, mounts, rewrites)
//! - Reject upstream URLs the proxy cannot forward to
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use axum::http::HeaderValue;
use thiserror::Error;
use url::Url;

use crate::config::schema::ProxyConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Validate a fully layered configuration.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.host.parse::<std::net::IpAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.host",
            format!("'{}' is not an IP address", config.listener.host),
        ));
    }
    if config.listener.port == 0 {
        errors.push(ValidationError::new("listener.port", "must be greater than 0"));
    }
    if let Some(tls) = &config.listener.tls {
        if tls.cert_path.as_os_str().is_empty() {
            errors.push(ValidationError::new("listener.tls.cert_path", "must not be empty"));
        }
        if tls.key_path.as_os_str().is_empty() {
            errors.push(ValidationError::new("listener.tls.key_path", "must not be empty"));
        }
    }

    validate_upstream_url(&config.upstream.base_url, &mut errors);
    if config.upstream.connect_timeout_secs == 0 {
        errors.push(ValidationError::new("upstream.connect_timeout_secs", "must be greater than 0"));
    }
    if config.upstream.request_timeout_secs == 0 {
        errors.push(ValidationError::new("upstream.request_timeout_secs", "must be greater than 0"));
    }

    let prefix = config.api.prefix.as_str();
    if !prefix.starts_with('/') || prefix.len() < 2 || prefix.ends_with('/') {
        errors.push(ValidationError::new(
            "api.prefix",
            format!("'{prefix}' must start with '/', not end with '/' and not be the root"),
        ));
    }
    for (i, mount) in config.api.mounts.iter().enumerate() {
        if !is_rooted_non_root(mount) {
            errors.push(ValidationError::new(
                format!("api.mounts[{i}]"),
                format!("'{mount}' must start with '/' and not be the root"),
            ));
        }
    }
    for (i, rule) in config.api.rewrites.iter().enumerate() {
        if !is_rooted_non_root(&rule.from) {
            errors.push(ValidationError::new(
                format!("api.rewrites[{i}].from"),
                format!("'{}' must start with '/' and not be the root", rule.from),
            ));
        }
        if !rule.to.starts_with('/') {
            errors.push(ValidationError::new(
                format!("api.rewrites[{i}].to"),
                format!("'{}' must start with '/'", rule.to),
            ));
        }
    }
    if config.api.max_body_bytes == 0 {
        errors.push(ValidationError::new("api.max_body_bytes", "must be greater than 0"));
    }

    let health = config.health.path.as_str();
    if !health.starts_with('/') {
        errors.push(ValidationError::new("health.path", format!("'{health}' must start with '/'")));
    } else if health == prefix || health.starts_with(&format!("{prefix}/")) {
        errors.push(ValidationError::new(
            "health.path",
            format!("'{health}' must not lie under the API prefix '{prefix}'"),
        ));
    }

    if config.static_files.index.trim().is_empty() {
        errors.push(ValidationError::new("static_files.index", "must not be empty"));
    }
    for (field, value) in [
        ("static_files.html_cache_control", &config.static_files.html_cache_control),
        ("static_files.immutable_cache_control", &config.static_files.immutable_cache_control),
        ("static_files.media_cache_control", &config.static_files.media_cache_control),
    ] {
        if HeaderValue::from_str(value).is_err() {
            errors.push(ValidationError::new(field, "is not a valid header value"));
        }
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than 0"));
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<std::net::SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_upstream_url(raw: &str, errors: &mut Vec<ValidationError>) {
    let url = match Url::parse(raw) {
        Ok(url) => url,
        Err(e) => {
            errors.push(ValidationError::new("upstream.base_url", format!("'{raw}': {e}")));
            return;
        }
    };
    if !matches!(url.scheme(), "http" | "https") {
        errors.push(ValidationError::new(
            "upstream.base_url",
            format!("scheme '{}' is not http or https", url.scheme()),
        ));
    }
    if url.host_str().is_none() {
        errors.push(ValidationError::new("upstream.base_url", "has no host"));
    }
    if url.query().is_some() || url.fragment().is_some() {
        errors.push(ValidationError::new(
            "upstream.base_url",
            "must not carry a query string or fragment",
        ));
    }
}

fn is_rooted_non_root(path: &str) -> bool {
    path.starts_with('/') && path.len() > 1
}
