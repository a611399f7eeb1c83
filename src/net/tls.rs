//! TLS configuration and certificate loading.

use axum_server::tls_rustls::RustlsConfig;

use crate::config::TlsConfig;
use crate::lifecycle::startup::{install_crypto_provider, StartupError};

/// Load the listener certificate chain and private key (PEM).
pub async fn load_tls_config(config: &TlsConfig) -> Result<RustlsConfig, StartupError> {
    for path in [&config.cert_path, &config.key_path] {
        if !path.exists() {
            return Err(StartupError::Tls {
                path: path.clone(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
            });
        }
    }

    install_crypto_provider();

    RustlsConfig::from_pem_file(&config.cert_path, &config.key_path)
        .await
        .map_err(|source| StartupError::Tls {
            path: config.cert_path.clone(),
            source,
        })
}
