//! Liveness reporting.
//!
//! The proxy answers its own liveness probe without touching the upstream,
//! so an unreachable controller never makes the process look dead.

use axum::{response::IntoResponse, Json};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Body of the liveness response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    /// RFC 3339, UTC, millisecond precision.
    pub timestamp: String,
    pub version: String,
}

impl HealthReport {
    pub fn now() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

pub async fn liveness() -> impl IntoResponse {
    Json(HealthReport::now())
}
