//! Command-line interface.

use std::path::PathBuf;

use clap::Parser;
use console_proxy::config::{LogFormat, ProxyConfig};

#[derive(Debug, Parser)]
#[command(name = "console-proxy")]
#[command(version, about = "Reverse proxy and static host for the wireless controller console", long_about = None)]
pub struct Cli {
    /// TOML configuration file
    #[arg(short, long, env = "CONSOLE_PROXY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address to bind
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Upstream controller base URL
    #[arg(short, long)]
    pub upstream: Option<String>,

    /// Directory holding the built console
    #[arg(long)]
    pub static_root: Option<PathBuf>,

    /// Accept self-signed controller certificates
    #[arg(long)]
    pub insecure_upstream_tls: bool,

    /// Log output format (pretty or json)
    #[arg(long)]
    pub log_format: Option<LogFormat>,
}

impl Cli {
    /// Flags win over the file and the environment.
    pub fn apply_overrides(&self, config: &mut ProxyConfig) {
        if let Some(host) = &self.host {
            config.listener.host = host.clone();
        }
        if let Some(port) = self.port {
            config.listener.port = port;
        }
        if let Some(upstream) = &self.upstream {
            config.upstream.base_url = upstream.clone();
        }
        if let Some(root) = &self.static_root {
            config.static_files.root = root.clone();
        }
        if self.insecure_upstream_tls {
            config.upstream.insecure_skip_tls_verify = true;
        }
        if let Some(format) = self.log_format {
            config.observability.log_format = format;
        }
    }
}
