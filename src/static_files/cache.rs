//! Cache-Control selection for static assets.
//!
//! Built bundles are content-hashed, so scripts and stylesheets may be cached
//! forever, while the entry document must always be revalidated so a new
//! deploy is picked up on the next navigation.

use axum::http::{header, HeaderMap, HeaderValue};

use crate::config::StaticFilesConfig;
use crate::lifecycle::startup::StartupError;

/// Caching class of a served asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetClass {
    /// HTML entry documents.
    Document,
    /// Content-hashed JavaScript and CSS.
    Immutable,
    /// Images and fonts.
    Media,
    Other,
}

impl AssetClass {
    /// Classify by media type, ignoring parameters such as `charset`.
    pub fn from_content_type(content_type: &str) -> Self {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match essence.as_str() {
            "text/html" => AssetClass::Document,
            "text/javascript" | "application/javascript" | "application/x-javascript"
            | "text/css" => AssetClass::Immutable,
            t if t.starts_with("image/") || t.starts_with("font/") => AssetClass::Media,
            t if t.starts_with("application/font-")
                || t.starts_with("application/x-font-")
                || t.contains("woff") =>
            {
                AssetClass::Media
            }
            _ => AssetClass::Other,
        }
    }

    /// Classify by the request path when the response carries no type.
    ///
    /// Extensionless paths are client-side routes answered with the entry
    /// document.
    pub fn from_path(path: &str) -> Self {
        let last = path.rsplit('/').next().unwrap_or_default();
        if last.is_empty() || !last.contains('.') {
            return AssetClass::Document;
        }
        match mime_guess::from_path(last).first() {
            Some(mime) => Self::from_content_type(mime.essence_str()),
            None => AssetClass::Other,
        }
    }
}

/// Configured Cache-Control value per asset class.
#[derive(Debug, Clone)]
pub struct CachePolicy {
    document: HeaderValue,
    immutable: HeaderValue,
    media: HeaderValue,
}

impl CachePolicy {
    pub fn from_config(config: &StaticFilesConfig) -> Result<Self, StartupError> {
        Ok(Self {
            document: parse("html_cache_control", &config.html_cache_control)?,
            immutable: parse("immutable_cache_control", &config.immutable_cache_control)?,
            media: parse("media_cache_control", &config.media_cache_control)?,
        })
    }

    pub fn value_for(&self, class: AssetClass) -> Option<&HeaderValue> {
        match class {
            AssetClass::Document => Some(&self.document),
            AssetClass::Immutable => Some(&self.immutable),
            AssetClass::Media => Some(&self.media),
            AssetClass::Other => None,
        }
    }

    /// Set Cache-Control on a static response for `request_path`.
    pub fn apply(&self, request_path: &str, headers: &mut HeaderMap) {
        let class = headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(AssetClass::from_content_type)
            .unwrap_or_else(|| AssetClass::from_path(request_path));

        if let Some(value) = self.value_for(class) {
            headers.insert(header::CACHE_CONTROL, value.clone());
        }
    }
}

fn parse(field: &'static str, value: &str) -> Result<HeaderValue, StartupError> {
    HeaderValue::from_str(value).map_err(|_| StartupError::CacheControl {
        field,
        value: value.to_string(),
    })
}
