//! Console proxy (v1)
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌─────────────────────────────────────────────┐
//!                     │                CONSOLE PROXY                │
//!   Browser request   │  ┌──────────┐   ┌──────────┐   ┌─────────┐  │
//!  ───────────────────┼─▶│   net    │──▶│   http   │──▶│ routing │  │
//!                     │  │ listener │   │  server  │   │classify │  │
//!                     │  └──────────┘   └──────────┘   └────┬────┘  │
//!                     │          ┌──────────────┬───────────┤       │
//!                     │          ▼              ▼           ▼       │
//!                     │   ┌────────────┐ ┌────────────┐ ┌────────┐  │
//!                     │   │   proxy    │ │   static   │ │ health │  │
//!   Controller API ◀──┼───│  upstream  │ │   files    │ │        │  │
//!                     │   └────────────┘ └────────────┘ └────────┘  │
//!                     │                                             │
//!                     │  config  lifecycle  observability resilience│
//!                     └─────────────────────────────────────────────┘
//! ```

mod cli;

use clap::Parser;

use console_proxy::config::{load_config, validate_config, ConfigError};
use console_proxy::lifecycle::StartupError;
use console_proxy::net::{listener, tls};
use console_proxy::observability::{logging, metrics};
use console_proxy::{HttpServer, Shutdown};

use crate::cli::Cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref(), |key| std::env::var(key).ok())?;
    cli.apply_overrides(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;

    logging::init(&config.observability)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "console-proxy starting");
    tracing::info!(
        upstream = %config.upstream.base_url,
        api_prefix = %config.api.prefix,
        static_root = %config.static_files.root.display(),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let shutdown = Shutdown::new();
    tokio::spawn(shutdown.clone().trigger_on_signal());

    let tls_config = config.listener.tls.clone();
    let server = HttpServer::new(config)?;

    match tls_config {
        Some(tls_files) => {
            let addr = server
                .config()
                .listener
                .socket_addr()
                .map_err(StartupError::ListenAddress)?;
            let rustls = tls::load_tls_config(&tls_files).await?;
            server.run_tls(addr, rustls, shutdown.subscribe()).await?;
        }
        None => {
            let tcp = listener::bind(&server.config().listener).await?;
            server.run(tcp, shutdown.subscribe()).await?;
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
