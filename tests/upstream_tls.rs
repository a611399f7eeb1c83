//! TLS on both legs: a self-signed controller and an HTTPS listener.

use reqwest::StatusCode;

use console_proxy::http::ErrorBody;
use console_proxy::net::tls::load_tls_config;
use console_proxy::{HttpServer, Shutdown};

mod common;

use common::Echo;

#[tokio::test]
async fn self_signed_upstream_is_rejected_by_default() {
    let spa = common::spa_dir();
    let upstream = common::start_tls_echo_upstream().await;
    let mut config = common::base_config(upstream, spa.path());
    config.upstream.base_url = format!("https://{upstream}");
    let proxy = common::spawn_proxy(config).await;

    let res = common::client()
        .get(proxy.url("/api/management/v1/aps"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    assert!(res.headers().get("x-upstream").is_none());
    let body: ErrorBody = res.json().await.unwrap();
    assert!(
        matches!(body.error.as_str(), "upstream_unreachable" | "upstream_error"),
        "{}",
        body.error
    );
    assert_eq!(body.path, "/api/management/v1/aps");
}

#[tokio::test]
async fn self_signed_upstream_is_accepted_when_verification_is_off() {
    let spa = common::spa_dir();
    let upstream = common::start_tls_echo_upstream().await;
    let mut config = common::base_config(upstream, spa.path());
    config.upstream.base_url = format!("https://{upstream}");
    config.upstream.insecure_skip_tls_verify = true;
    let proxy = common::spawn_proxy(config).await;

    let res = common::client()
        .get(proxy.url("/api/management/v1/aps?limit=5"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["x-upstream"], "echo");
    let echo: Echo = res.json().await.unwrap();
    assert_eq!(echo.path, "/management/v1/aps");
    assert_eq!(echo.query.as_deref(), Some("limit=5"));
}

#[tokio::test]
async fn https_listener_serves_and_forwards() {
    let spa = common::spa_dir();
    let certs = tempfile::tempdir().unwrap();
    let upstream = common::start_echo_upstream().await;

    let mut config = common::base_config(upstream, spa.path());
    let tls_section = common::self_signed().write_to(certs.path());
    let tls = load_tls_config(&tls_section).await.unwrap();
    config.listener.tls = Some(tls_section);

    let addr = common::closed_port().await;
    let server = HttpServer::new(config).unwrap();
    let shutdown = Shutdown::new();
    let task = tokio::spawn(server.run_tls(addr, tls, shutdown.subscribe()));

    let client = reqwest::Client::builder()
        .no_proxy()
        .danger_accept_invalid_certs(true)
        .build()
        .unwrap();
    let base = format!("https://{addr}");

    let mut health = None;
    for _ in 0..50 {
        if let Ok(res) = client.get(format!("{base}/health")).send().await {
            health = Some(res);
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }
    assert_eq!(health.expect("HTTPS listener never came up").status(), StatusCode::OK);

    let echo: Echo = client
        .get(format!("{base}/api/management/v1/sites"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(echo.path, "/management/v1/sites");
    assert_eq!(echo.headers["x-forwarded-proto"], "https");

    shutdown.trigger();
    task.await.unwrap().unwrap();
}
