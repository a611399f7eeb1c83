//! Path prefix matching.
//!
//! # Design Decisions
//! - Matching is case-sensitive
//! - Prefixes are segment-bounded: `/api` matches `/api` and `/api/x` but not `/apix`
//! - No regex to guarantee O(n) matching

/// A segment-bounded path prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPrefix {
    prefix: String,
}

impl PathPrefix {
    /// Create a matcher. Trailing slashes are ignored, so `/api/` and `/api`
    /// behave the same.
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        let trimmed = prefix.trim_end_matches('/');
        Self {
            prefix: trimmed.to_string(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.prefix
    }

    /// Remainder of `path` after the prefix: empty or starting with `/`.
    pub fn strip<'a>(&self, path: &'a str) -> Option<&'a str> {
        let rest = path.strip_prefix(self.prefix.as_str())?;
        if rest.is_empty() || rest.starts_with('/') {
            Some(rest)
        } else {
            None
        }
    }

    pub fn matches(&self, path: &str) -> bool {
        self.strip(path).is_some()
    }
}
