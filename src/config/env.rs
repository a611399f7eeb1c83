//! Environment variable overrides.
//!
//! Read once at startup. Empty values count as unset; unparsable values are
//! configuration errors rather than being silently ignored.

use std::path::PathBuf;

use crate::config::loader::ConfigError;
use crate::config::schema::ProxyConfig;

pub const PORT: &str = "PORT";
pub const UPSTREAM_URL: &str = "UPSTREAM_URL";
pub const STATIC_ROOT: &str = "STATIC_ROOT";
pub const UPSTREAM_INSECURE_TLS: &str = "UPSTREAM_INSECURE_TLS";
pub const API_PREFIX: &str = "API_PREFIX";
pub const LOG_FORMAT: &str = "LOG_FORMAT";

/// Apply overrides from `lookup` (usually `std::env::var`).
pub fn apply_env_overrides<F>(config: &mut ProxyConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

    if let Some(value) = get(PORT) {
        config.listener.port = value.trim().parse().map_err(|e: std::num::ParseIntError| {
            env_error(PORT, &value, e.to_string())
        })?;
    }
    if let Some(value) = get(UPSTREAM_URL) {
        config.upstream.base_url = value.trim().to_string();
    }
    if let Some(value) = get(STATIC_ROOT) {
        config.static_files.root = PathBuf::from(value);
    }
    if let Some(value) = get(UPSTREAM_INSECURE_TLS) {
        config.upstream.insecure_skip_tls_verify = parse_bool(&value)
            .ok_or_else(|| env_error(UPSTREAM_INSECURE_TLS, &value, "expected a boolean".into()))?;
    }
    if let Some(value) = get(API_PREFIX) {
        config.api.prefix = value.trim().to_string();
    }
    if let Some(value) = get(LOG_FORMAT) {
        config.observability.log_format = value
            .parse()
            .map_err(|reason| env_error(LOG_FORMAT, &value, reason))?;
    }

    Ok(())
}

fn env_error(name: &'static str, value: &str, reason: String) -> ConfigError {
    ConfigError::Env {
        name,
        value: value.to_string(),
        reason,
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
