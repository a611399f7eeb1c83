//! Startup orchestration.
//!
//! # Responsibilities
//! - Name every failure that is fatal before the first request is accepted
//! - Install the process-wide TLS crypto provider exactly once
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Subsystems initialize in order, not concurrently
//! - Listeners start last (traffic only when ready)

use std::net::AddrParseError;
use std::path::PathBuf;

use thiserror::Error;

/// Error raised while assembling the server.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid upstream URL '{url}': {source}")]
    UpstreamUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to build upstream client: {0}")]
    UpstreamClient(#[source] reqwest::Error),

    #[error("invalid Cache-Control value for {field}: {value:?}")]
    CacheControl { field: &'static str, value: String },

    #[error("invalid listen address: {0}")]
    ListenAddress(#[from] AddrParseError),

    #[error("failed to load TLS material from {}: {source}", path.display())]
    Tls {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Install `ring` as the rustls provider for inbound and upstream TLS.
///
/// Later calls are no-ops.
pub fn install_crypto_provider() {
    let _ = rustls::crypto::ring::default_provider().install_default();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ListenerConfig;

    #[test]
    fn bad_listen_host_is_a_startup_error() {
        let listener = ListenerConfig {
            host: "not-an-ip".to_string(),
            ..ListenerConfig::default()
        };

        let err = listener.socket_addr().map_err(StartupError::ListenAddress).unwrap_err();
        assert!(err.to_string().starts_with("invalid listen address"));
    }
}
