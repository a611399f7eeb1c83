//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request:
//!     → timeouts.rs (one deadline around dispatch)
//!     → upstream client (its own connect and request timeouts)
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every external call has a deadline
//! - No retries: console API calls are not all idempotent, and the browser
//!   owns the retry decision

pub mod timeouts;

pub use timeouts::Deadline;
