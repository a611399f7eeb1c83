//! API forwarding.
//!
//! # Data Flow
//! ```text
//! /api/... request
//!     → RouteTable::api_target (prefix, rewrite, mount check)
//!     → headers.rs (hop-by-hop removal, X-Forwarded-*)
//!     → upstream.rs (pooled reqwest client)
//!     → relay status, headers and streamed body
//!     → CORS headers on every outcome
//! ```
//!
//! # Design Decisions
//! - Authorization and cookies pass through untouched; the proxy never
//!   inspects or refreshes tokens
//! - Request bodies are buffered up to `api.max_body_bytes` so the upstream
//!   always sees a Content-Length; responses stream back
//! - Failures become JSON errors, never the SPA document

pub mod headers;
pub mod upstream;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::Request,
    response::Response,
};

use crate::config::ProxyConfig;
use crate::http::cors::CorsContext;
use crate::http::response::ProxyError;
use crate::lifecycle::startup::StartupError;
use crate::observability::metrics;
use crate::resilience::Deadline;
use crate::routing::{ApiTarget, RouteTable};

use headers::{forward_request_headers, strip_hop_by_hop};
pub use upstream::Upstream;

/// Forwards API-prefixed requests to the controller.
#[derive(Debug, Clone)]
pub struct ApiProxy {
    routes: Arc<RouteTable>,
    upstream: Upstream,
    deadline: Deadline,
    max_body_bytes: usize,
    inbound_scheme: &'static str,
}

impl ApiProxy {
    pub fn new(
        routes: Arc<RouteTable>,
        upstream: Upstream,
        deadline: Deadline,
        max_body_bytes: usize,
        inbound_scheme: &'static str,
    ) -> Self {
        Self {
            routes,
            upstream,
            deadline,
            max_body_bytes,
            inbound_scheme,
        }
    }

    pub fn from_config(config: &ProxyConfig, routes: Arc<RouteTable>) -> Result<Self, StartupError> {
        let upstream = Upstream::from_config(&config.upstream)?;
        let scheme = if config.listener.tls.is_some() { "https" } else { "http" };
        Ok(Self::new(
            routes,
            upstream,
            Deadline::from_secs(config.timeouts.request_secs),
            config.api.max_body_bytes,
            scheme,
        ))
    }

    /// Proxy one request. Never fails: errors are rendered as JSON.
    pub async fn handle(&self, request: Request<Body>) -> Response {
        let path = request.uri().path().to_owned();
        let cors = CorsContext::from_request(request.method(), request.headers());

        if cors.is_preflight() {
            tracing::debug!(
                path = %path,
                requested_method = cors.requested_method().unwrap_or("-"),
                "Forwarding CORS preflight"
            );
        }

        let result = match self.routes.api_target(request.uri()) {
            Some(target) => self
                .deadline
                .run(self.forward(request, target))
                .await
                .and_then(|inner| inner),
            None => Err(ProxyError::NoRoute),
        };

        let mut response = match result {
            Ok(response) => response,
            Err(err) => {
                match &err {
                    ProxyError::NoRoute => {
                        tracing::debug!(path = %path, "No proxy route for API path");
                    }
                    ProxyError::PayloadTooLarge | ProxyError::RequestBody(_) => {
                        tracing::info!(path = %path, error = %err, "Rejected request body");
                    }
                    _ => {
                        metrics::record_upstream_error(err.kind());
                        tracing::warn!(
                            path = %path,
                            upstream = %self.upstream.base(),
                            kind = err.kind(),
                            error = %err,
                            "Upstream request failed"
                        );
                    }
                }
                err.into_response_for(&path)
            }
        };

        cors.apply(response.headers_mut());
        response
    }

    async fn forward(&self, request: Request<Body>, target: ApiTarget) -> Result<Response, ProxyError> {
        let (parts, body) = request.into_parts();

        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip());
        let headers = forward_request_headers(&parts.headers, peer, self.inbound_scheme);

        let body = axum::body::to_bytes(body, self.max_body_bytes)
            .await
            .map_err(ProxyError::from_body)?;

        let url = self.upstream.url_for(&target);
        tracing::debug!(method = %parts.method, upstream_url = %url, "Forwarding API request");

        let mut outbound = self
            .upstream
            .client()
            .request(parts.method, url)
            .headers(headers);
        if !body.is_empty() {
            outbound = outbound.body(body);
        }

        let upstream_response = outbound.send().await.map_err(ProxyError::from_upstream)?;
        Ok(relay(upstream_response))
    }
}

/// Convert the upstream response into ours, streaming the body.
fn relay(upstream: reqwest::Response) -> Response {
    let status = upstream.status();
    let mut headers = upstream.headers().clone();
    strip_hop_by_hop(&mut headers);

    let mut response = Response::new(Body::from_stream(upstream.bytes_stream()));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}
