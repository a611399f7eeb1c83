//! Access logging middleware.
//!
//! One event and one metrics sample per request, labelled with the route
//! kind. Liveness probes log at debug so they do not drown real traffic.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use tracing::Level;

use crate::observability::metrics;
use crate::routing::{RouteKind, RouteTable};

pub async fn access_log(
    State(routes): State<Arc<RouteTable>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let kind = routes.classify(&method, &path);

    let response = next.run(request).await;

    let status = response.status().as_u16();
    let latency_ms = start.elapsed().as_millis() as u64;
    metrics::record_request(kind.as_str(), method.as_str(), status, start);

    // Event levels must be constant at each callsite.
    macro_rules! completed {
        ($level:expr) => {
            tracing::event!(
                $level,
                kind = kind.as_str(),
                method = %method,
                path = %path,
                status,
                latency_ms,
                "Request completed"
            )
        };
    }

    if kind == RouteKind::Health {
        completed!(Level::DEBUG);
    } else if response.status().is_server_error() {
        completed!(Level::WARN);
    } else {
        completed!(Level::INFO);
    }

    response
}
