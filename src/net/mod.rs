//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → listener.rs (bind, plain HTTP)
//!     → tls.rs (optional rustls termination via axum-server)
//!     → Hand off to HTTP layer
//! ```
//!
//! # Design Decisions
//! - TLS is optional and handled transparently
//! - Connection draining is owned by the serving loop, not this layer

pub mod listener;
pub mod tls;
