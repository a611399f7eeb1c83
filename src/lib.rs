//! Reverse proxy and static host for the wireless controller console.
//!
//! Serves the built single-page application and forwards `/api/...` calls
//! to the controller, so the browser sees a single origin.

// Core subsystems
pub mod config;
pub mod http;
pub mod net;
pub mod proxy;
pub mod routing;
pub mod static_files;

// Cross-cutting concerns
pub mod health;
pub mod lifecycle;
pub mod observability;
pub mod resilience;

pub use config::schema::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
