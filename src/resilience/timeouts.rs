//! Timeout enforcement.
//!
//! # Responsibilities
//! - Bound every inbound request with a single deadline
//! - Cancel the in-flight work cleanly when it expires
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - Timeout errors are distinct from upstream timeouts
//! - Timed-out requests return 504 Gateway Timeout

use std::future::Future;
use std::time::Duration;

use crate::http::response::ProxyError;

/// End-to-end deadline for one inbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline(Duration);

impl Deadline {
    pub fn new(duration: Duration) -> Self {
        Self(duration)
    }

    pub fn from_secs(secs: u64) -> Self {
        Self(Duration::from_secs(secs))
    }

    /// Run `fut` to completion or fail with [`ProxyError::RequestTimeout`].
    ///
    /// Dropping the future on expiry aborts any upstream call it owns.
    pub async fn run<F>(self, fut: F) -> Result<F::Output, ProxyError>
    where
        F: Future,
    {
        tokio::time::timeout(self.0, fut)
            .await
            .map_err(|_| ProxyError::RequestTimeout(self.0))
    }
}
