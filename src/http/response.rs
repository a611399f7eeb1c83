//! Proxy-generated error responses.
//!
//! # Responsibilities
//! - Map transport and routing failures to HTTP status codes
//! - Render every failure as a structured JSON body `{ error, message, path }`
//!
//! # Design Decisions
//! - Upstream connect failures answer 502, upstream timeouts 504
//! - The inbound deadline answers 504 with its own error kind so callers can
//!   tell it apart from a slow upstream
//! - Unknown API paths answer 404 JSON, never the SPA entry document

use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use http_body_util::LengthLimitError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JSON body of every proxy-generated error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Machine-readable error kind.
    pub error: String,
    /// Human-readable description.
    pub message: String,
    /// Original inbound request path.
    pub path: String,
}

/// Failure while serving a request at the proxy boundary.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("no proxy route matches this API path")]
    NoRoute,

    #[error("upstream unreachable: {0}")]
    Unreachable(#[source] reqwest::Error),

    #[error("upstream timed out: {0}")]
    UpstreamTimeout(#[source] reqwest::Error),

    #[error("upstream request failed: {0}")]
    Upstream(#[source] reqwest::Error),

    #[error("request did not complete within {}s", .0.as_secs())]
    RequestTimeout(Duration),

    #[error("request body exceeds the configured limit")]
    PayloadTooLarge,

    #[error("failed to read request body: {0}")]
    RequestBody(#[source] axum::Error),
}

impl ProxyError {
    /// Classify a transport error from the upstream client.
    pub fn from_upstream(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProxyError::UpstreamTimeout(err)
        } else if err.is_connect() {
            ProxyError::Unreachable(err)
        } else {
            ProxyError::Upstream(err)
        }
    }

    /// Classify a failure to buffer the inbound body.
    pub fn from_body(err: axum::Error) -> Self {
        let mut source: Option<&(dyn std::error::Error + 'static)> = Some(&err);
        while let Some(e) = source {
            if e.is::<LengthLimitError>() {
                return ProxyError::PayloadTooLarge;
            }
            source = e.source();
        }
        ProxyError::RequestBody(err)
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::NoRoute => StatusCode::NOT_FOUND,
            ProxyError::Unreachable(_) | ProxyError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ProxyError::UpstreamTimeout(_) | ProxyError::RequestTimeout(_) => {
                StatusCode::GATEWAY_TIMEOUT
            }
            ProxyError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ProxyError::RequestBody(_) => StatusCode::BAD_REQUEST,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ProxyError::NoRoute => "not_found",
            ProxyError::Unreachable(_) => "upstream_unreachable",
            ProxyError::UpstreamTimeout(_) => "upstream_timeout",
            ProxyError::Upstream(_) => "upstream_error",
            ProxyError::RequestTimeout(_) => "request_timeout",
            ProxyError::PayloadTooLarge => "payload_too_large",
            ProxyError::RequestBody(_) => "invalid_request_body",
        }
    }

    /// Render the error for the request that hit `path`.
    pub fn into_response_for(self, path: &str) -> Response {
        let body = ErrorBody {
            error: self.kind().to_string(),
            message: self.to_string(),
            path: path.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
