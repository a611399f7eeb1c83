//! Shared utilities for integration and load testing.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    Json, Router,
};
use axum_server::tls_rustls::RustlsConfig;
use console_proxy::config::{ProxyConfig, TlsConfig};
use console_proxy::lifecycle::startup::install_crypto_provider;
use console_proxy::{HttpServer, Shutdown};
use serde::{Deserialize, Serialize};
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

/// What the echo upstream saw.
#[derive(Debug, Serialize, Deserialize)]
pub struct Echo {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

/// Echo handler.
///
/// `delay_ms=N` in the query delays the answer; a path ending in
/// `/status/<code>` answers with that status.
async fn echo(request: Request<Body>) -> Response {
    let (parts, body) = request.into_parts();
    let query = parts.uri.query().map(str::to_owned);

    if let Some(delay) = query
        .as_deref()
        .and_then(|q| q.split('&').find_map(|kv| kv.strip_prefix("delay_ms=")))
        .and_then(|ms| ms.parse::<u64>().ok())
    {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }

    let status = parts
        .uri
        .path()
        .rsplit_once("/status/")
        .and_then(|(_, code)| code.parse::<u16>().ok())
        .and_then(|code| StatusCode::from_u16(code).ok())
        .unwrap_or(StatusCode::OK);

    let headers = parts
        .headers
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or_default().to_string()))
        .collect();
    let body = axum::body::to_bytes(body, usize::MAX).await.unwrap();

    let echo = Echo {
        method: parts.method.to_string(),
        path: parts.uri.path().to_string(),
        query,
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    };
    (status, [("x-upstream", "echo")], Json(echo)).into_response()
}

/// Start the echo upstream on an ephemeral port.
pub async fn start_echo_upstream() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, Router::new().fallback(echo)).await;
    });
    addr
}

/// Self-signed certificate for `localhost` and `127.0.0.1`, as PEM.
pub struct SelfSigned {
    pub cert_pem: String,
    pub key_pem: String,
}

pub fn self_signed() -> SelfSigned {
    let certified =
        rcgen::generate_simple_self_signed(vec!["localhost".to_string(), "127.0.0.1".to_string()])
            .unwrap();
    SelfSigned {
        cert_pem: certified.cert.pem(),
        key_pem: certified.key_pair.serialize_pem(),
    }
}

impl SelfSigned {
    /// Write the pair into `dir` as a listener TLS section.
    pub fn write_to(&self, dir: &Path) -> TlsConfig {
        let cert_path = dir.join("cert.pem");
        let key_path = dir.join("key.pem");
        std::fs::write(&cert_path, &self.cert_pem).unwrap();
        std::fs::write(&key_path, &self.key_pem).unwrap();
        TlsConfig { cert_path, key_path }
    }
}

/// Start the echo upstream behind a self-signed certificate.
pub async fn start_tls_echo_upstream() -> SocketAddr {
    install_crypto_provider();
    let cert = self_signed();
    let tls = RustlsConfig::from_pem(cert.cert_pem.into_bytes(), cert.key_pem.into_bytes())
        .await
        .unwrap();

    let handle = axum_server::Handle::new();
    let server = axum_server::bind_rustls("127.0.0.1:0".parse().unwrap(), tls)
        .handle(handle.clone())
        .serve(Router::new().fallback(echo).into_make_service());
    tokio::spawn(async move {
        let _ = server.await;
    });
    handle.listening().await.unwrap()
}

/// An address nothing listens on.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// A built console: entry document, hashed bundles, media, nested docs.
pub fn spa_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("dist");
    std::fs::create_dir_all(root.join("assets")).unwrap();
    std::fs::create_dir_all(root.join("docs")).unwrap();
    std::fs::write(root.join("index.html"), INDEX_HTML).unwrap();
    std::fs::write(root.join("assets/index-4f9c1e.js"), "console.log('console');").unwrap();
    std::fs::write(root.join("assets/index-4f9c1e.css"), "body{margin:0}").unwrap();
    std::fs::write(root.join("assets/logo.png"), [0x89, b'P', b'N', b'G']).unwrap();
    std::fs::write(root.join("docs/index.html"), "<h1>docs</h1>").unwrap();
    std::fs::write(dir.path().join("secret.txt"), "do not serve").unwrap();
    dir
}

pub const INDEX_HTML: &str = "<!doctype html><div id=\"app\"></div>";

/// Defaults pointed at `upstream`, serving `spa`'s `dist` directory.
pub fn base_config(upstream: SocketAddr, spa: &Path) -> ProxyConfig {
    let mut config = ProxyConfig::default();
    config.listener.host = "127.0.0.1".to_string();
    config.upstream.base_url = format!("http://{upstream}");
    config.static_files.root = spa.join("dist");
    config.timeouts.shutdown_grace_secs = 2;
    config
}

/// A proxy running on an ephemeral port.
pub struct TestProxy {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub task: JoinHandle<std::io::Result<()>>,
}

impl TestProxy {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

pub async fn spawn_proxy(config: ProxyConfig) -> TestProxy {
    let server = HttpServer::new(config).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    let task = tokio::spawn(async move { server.run(listener, rx).await });

    TestProxy {
        addr,
        shutdown,
        task,
    }
}

/// Non-pooled client that ignores proxy environment variables.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .pool_max_idle_per_host(0)
        .build()
        .unwrap()
}

/// Send `GET <target>` exactly as written and return the whole response.
///
/// HTTP clients normalise dot segments before sending, so this writes the
/// request line by hand.
pub async fn raw_get(addr: SocketAddr, target: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let request = format!("GET {target} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n");
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    String::from_utf8_lossy(&response).into_owned()
}
