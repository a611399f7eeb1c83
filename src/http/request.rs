//! Request identification.
//!
//! # Responsibilities
//! - Name the request-ID header shared by the ID layers
//! - Build the per-request tracing span carrying that ID
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - An inbound `x-request-id` is kept so IDs correlate across hops

use axum::http::{header::HeaderName, HeaderMap, Request};
use tracing::Span;

pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// The request ID set by the request-ID layer, or `"-"`.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
}

/// Span for one inbound request.
pub fn request_span<B>(request: &Request<B>) -> Span {
    tracing::info_span!(
        "request",
        request_id = %request_id(request.headers()),
        method = %request.method(),
        path = %request.uri().path(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_request_id_header() {
        let request = Request::builder()
            .header("x-request-id", "4c1f2a9e")
            .body(())
            .unwrap();
        assert_eq!(request_id(request.headers()), "4c1f2a9e");
        assert_eq!(request_id(&HeaderMap::new()), "-");
    }
}
