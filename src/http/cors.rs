//! CORS headers for API responses.
//!
//! Browser callers send credentials (bearer tokens, cookies), so the allowed
//! origin is the inbound `Origin` itself rather than a wildcard whenever one
//! is present. Upstream CORS headers are overwritten.

use axum::http::{
    header::{
        ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS,
        ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
        ACCESS_CONTROL_REQUEST_HEADERS, ACCESS_CONTROL_REQUEST_METHOD, ORIGIN, VARY,
    },
    HeaderMap, HeaderValue, Method,
};

const ALLOWED_METHODS: &str = "GET, POST, PUT, DELETE, PATCH, OPTIONS";

/// CORS-relevant parts of an inbound request.
#[derive(Debug, Clone, Default)]
pub struct CorsContext {
    origin: Option<HeaderValue>,
    preflight: bool,
    request_method: Option<HeaderValue>,
    request_headers: Option<HeaderValue>,
}

impl CorsContext {
    pub fn from_request(method: &Method, headers: &HeaderMap) -> Self {
        let request_method = headers.get(ACCESS_CONTROL_REQUEST_METHOD).cloned();
        Self {
            origin: headers.get(ORIGIN).cloned(),
            preflight: *method == Method::OPTIONS && request_method.is_some(),
            request_method,
            request_headers: headers.get(ACCESS_CONTROL_REQUEST_HEADERS).cloned(),
        }
    }

    pub fn is_preflight(&self) -> bool {
        self.preflight
    }

    /// Set the CORS response headers.
    pub fn apply(&self, headers: &mut HeaderMap) {
        let origin = self
            .origin
            .clone()
            .unwrap_or_else(|| HeaderValue::from_static("*"));
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin);
        headers.insert(
            ACCESS_CONTROL_ALLOW_CREDENTIALS,
            HeaderValue::from_static("true"),
        );
        if !vary_contains_origin(headers) {
            headers.append(VARY, HeaderValue::from_static("Origin"));
        }

        if self.preflight {
            if !headers.contains_key(ACCESS_CONTROL_ALLOW_METHODS) {
                headers.insert(
                    ACCESS_CONTROL_ALLOW_METHODS,
                    HeaderValue::from_static(ALLOWED_METHODS),
                );
            }
            if let Some(requested) = &self.request_headers {
                if !headers.contains_key(ACCESS_CONTROL_ALLOW_HEADERS) {
                    headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, requested.clone());
                }
            }
        }
    }

    /// Method named by a preflight, for logging.
    pub fn requested_method(&self) -> Option<&str> {
        self.request_method.as_ref().and_then(|v| v.to_str().ok())
    }
}

fn vary_contains_origin(headers: &HeaderMap) -> bool {
    headers
        .get_all(VARY)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .any(|v| v.trim().eq_ignore_ascii_case("origin") || v.trim() == "*")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for (name, value) in pairs {
            headers.insert(*name, HeaderValue::from_static(value));
        }
        headers
    }

    #[test]
    fn reflects_origin_with_credentials() {
        let inbound = request_headers(&[("origin", "https://console.example.net")]);
        let cors = CorsContext::from_request(&Method::GET, &inbound);

        let mut response = HeaderMap::new();
        response.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("https://other"));
        cors.apply(&mut response);

        assert_eq!(response[ACCESS_CONTROL_ALLOW_ORIGIN], "https://console.example.net");
        assert_eq!(response[ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
        assert_eq!(response[VARY], "Origin");
        assert!(!response.contains_key(ACCESS_CONTROL_ALLOW_METHODS));
    }

    #[test]
    fn wildcard_without_origin() {
        let cors = CorsContext::from_request(&Method::GET, &HeaderMap::new());

        let mut response = HeaderMap::new();
        cors.apply(&mut response);

        assert_eq!(response[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(response[ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
    }

    #[test]
    fn preflight_fills_missing_allow_headers() {
        let inbound = request_headers(&[
            ("origin", "http://localhost:5173"),
            ("access-control-request-method", "PUT"),
            ("access-control-request-headers", "authorization, content-type"),
        ]);
        let cors = CorsContext::from_request(&Method::OPTIONS, &inbound);
        assert!(cors.is_preflight());
        assert_eq!(cors.requested_method(), Some("PUT"));

        let mut response = HeaderMap::new();
        cors.apply(&mut response);

        assert_eq!(response[ACCESS_CONTROL_ALLOW_METHODS], ALLOWED_METHODS);
        assert_eq!(response[ACCESS_CONTROL_ALLOW_HEADERS], "authorization, content-type");
    }

    #[test]
    fn preflight_keeps_upstream_allow_methods() {
        let inbound = request_headers(&[("access-control-request-method", "DELETE")]);
        let cors = CorsContext::from_request(&Method::OPTIONS, &inbound);

        let mut response = HeaderMap::new();
        response.insert(ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static("GET, DELETE"));
        response.insert(VARY, HeaderValue::from_static("Accept-Encoding, Origin"));
        cors.apply(&mut response);

        assert_eq!(response[ACCESS_CONTROL_ALLOW_METHODS], "GET, DELETE");
        assert_eq!(response.get_all(VARY).iter().count(), 1);
    }

    #[test]
    fn plain_options_is_not_preflight() {
        let cors = CorsContext::from_request(&Method::OPTIONS, &HeaderMap::new());
        assert!(!cors.is_preflight());
    }
}
