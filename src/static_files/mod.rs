//! Static hosting for the built console.
//!
//! # Responsibilities
//! - Serve files under the static root with guessed content types
//! - Answer unknown paths with the entry document so client-side routes
//!   survive a reload
//! - Attach Cache-Control by asset class
//!
//! # Design Decisions
//! - `ServeDir` owns traversal protection, conditional requests and ranges
//! - The SPA fallback keeps status 200

pub mod cache;

use axum::{
    body::Body,
    http::Request,
    response::{IntoResponse, Response},
};
use tower::ServiceExt;
use tower_http::services::{ServeDir, ServeFile};

use crate::config::StaticFilesConfig;
use crate::lifecycle::startup::StartupError;

pub use cache::{AssetClass, CachePolicy};

/// File service plus cache policy for the console bundle.
#[derive(Debug, Clone)]
pub struct StaticAssets {
    service: ServeDir<ServeFile>,
    policy: CachePolicy,
}

impl StaticAssets {
    pub fn new(config: &StaticFilesConfig) -> Result<Self, StartupError> {
        let policy = CachePolicy::from_config(config)?;
        let index = config.root.join(&config.index);

        if !config.root.is_dir() {
            tracing::warn!(root = %config.root.display(), "Static root does not exist");
        } else if !index.is_file() {
            tracing::warn!(index = %index.display(), "Entry document is missing");
        }

        let fallback = ServeFile::new(index)
            .precompressed_br()
            .precompressed_gzip();
        let service = ServeDir::new(&config.root)
            .append_index_html_on_directories(true)
            .precompressed_br()
            .precompressed_gzip()
            .fallback(fallback);

        Ok(Self { service, policy })
    }

    pub async fn serve(&self, request: Request<Body>) -> Response {
        let path = request.uri().path().to_owned();

        let mut response = match self.service.clone().oneshot(request).await {
            Ok(response) => response.map(Body::new),
            Err(never) => match never {},
        };

        let status = response.status();
        if status.is_success() || status.as_u16() == 304 {
            self.policy.apply(&path, response.headers_mut());
        }
        response.into_response()
    }
}
