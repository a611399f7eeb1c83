//! Configuration loading from disk and environment.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::env::apply_env_overrides;
use crate::config::schema::ProxyConfig;
use crate::config::validation::ValidationError;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value {value:?} for {name}: {reason}")]
    Env {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("invalid configuration: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Parse a TOML configuration file. Missing sections take their defaults.
pub fn read_config_file(path: &Path) -> Result<ProxyConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the file (if any) and layer environment overrides on top.
///
/// The result is not validated yet; callers apply their own overrides first
/// and then run [`validate_config`](crate::config::validate_config).
pub fn load_config<F>(path: Option<&Path>, lookup: F) -> Result<ProxyConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => read_config_file(path)?,
        None => ProxyConfig::default(),
    };
    apply_env_overrides(&mut config, lookup)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogFormat;
    use std::io::Write;

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[listener]
port = 8443

[upstream]
base_url = "https://10.0.0.5:5825"
insecure_skip_tls_verify = true

[[api.rewrites]]
from = "/mgmt"
to = "/management"
"#
        )
        .unwrap();

        let config = read_config_file(file.path()).unwrap();
        assert_eq!(config.listener.port, 8443);
        assert_eq!(config.listener.host, "0.0.0.0");
        assert!(config.upstream.insecure_skip_tls_verify);
        assert_eq!(config.api.prefix, "/api");
        assert_eq!(config.api.rewrites.len(), 1);
        assert_eq!(config.api.rewrites[0].from, "/mgmt");
        assert_eq!(config.health.path, "/health");
    }

    #[test]
    fn parse_error_names_the_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[listener\nport = 1").unwrap();

        let err = read_config_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains(&file.path().display().to_string()));
    }

    #[test]
    fn env_overrides_file_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[listener]\nport = 8080").unwrap();

        let config = load_config(Some(file.path()), |key| match key {
            "PORT" => Some("9000".to_string()),
            "LOG_FORMAT" => Some("json".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(config.listener.port, 9000);
        assert_eq!(config.observability.log_format, LogFormat::Json);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_config(Some(Path::new("/nonexistent/console-proxy.toml")), |_| None)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
