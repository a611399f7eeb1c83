//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, request ID, tracing, access log)
//!     → routing (health, API or static)
//!     → proxy / static_files / health handlers
//!     → cors.rs (API responses)
//!     → response.rs (structured error bodies)
//!     → Send to client
//! ```

pub mod cors;
pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use response::{ErrorBody, ProxyError};
pub use server::HttpServer;
