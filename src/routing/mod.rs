//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path)
//!     → router.rs (classify: Health | Api | Static)
//!     → Api: matcher.rs strips the API prefix (segment-bounded)
//!            rewrite.rs applies the first matching rewrite
//!            router.rs checks mounts → ApiTarget or no match (JSON 404)
//!
//! Route Compilation (at startup):
//!     ApiConfig + HealthConfig
//!     → Compile prefix matchers and rewrite rules
//!     → Freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path (prefix matching only)
//! - Deterministic: same input always yields the same target
//! - Explicit no-match for API paths rather than the SPA fallback

pub mod matcher;
pub mod rewrite;
pub mod router;

pub use matcher::PathPrefix;
pub use rewrite::Rewriter;
pub use router::{ApiTarget, RouteKind, RouteTable};
