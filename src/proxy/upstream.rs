//! Upstream controller client.
//!
//! One pooled `reqwest::Client` per process. Redirects are relayed to the
//! browser rather than followed, and TLS verification stays on unless the
//! named `insecure_skip_tls_verify` option is set.

use std::time::Duration;

use reqwest::redirect::Policy;
use url::Url;

use crate::config::UpstreamConfig;
use crate::lifecycle::startup::{install_crypto_provider, StartupError};
use crate::routing::ApiTarget;

/// The controller API traffic is forwarded to.
#[derive(Debug, Clone)]
pub struct Upstream {
    client: reqwest::Client,
    base: Url,
}

impl Upstream {
    pub fn from_config(config: &UpstreamConfig) -> Result<Self, StartupError> {
        let base = Url::parse(&config.base_url).map_err(|source| StartupError::UpstreamUrl {
            url: config.base_url.clone(),
            source,
        })?;

        install_crypto_provider();

        let mut builder = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .pool_idle_timeout(Duration::from_secs(90))
            .redirect(Policy::none())
            .danger_accept_invalid_certs(config.insecure_skip_tls_verify);
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }
        let client = builder.build().map_err(StartupError::UpstreamClient)?;

        if config.insecure_skip_tls_verify {
            tracing::warn!(
                upstream = %base,
                "Upstream TLS certificate verification is DISABLED"
            );
        }

        Ok(Self { client, base })
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Absolute upstream URL for a resolved API target.
    pub fn url_for(&self, target: &ApiTarget) -> Url {
        let mut url = self.base.clone();
        let base_path = self.base.path().trim_end_matches('/');
        url.set_path(&format!("{base_path}{}", target.path));
        url.set_query(target.query.as_deref());
        url
    }
}
