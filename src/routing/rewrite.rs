//! Path prefix rewrites for proxied requests.

use std::borrow::Cow;

use crate::config::RewriteConfig;
use crate::routing::matcher::PathPrefix;

#[derive(Debug, Clone)]
struct RewriteRule {
    from: PathPrefix,
    to: String,
}

/// Ordered rewrite rules; the first rule whose `from` matches is applied once.
#[derive(Debug, Clone, Default)]
pub struct Rewriter {
    rules: Vec<RewriteRule>,
}

impl Rewriter {
    pub fn from_config(rules: &[RewriteConfig]) -> Self {
        Self {
            rules: rules
                .iter()
                .map(|rule| RewriteRule {
                    from: PathPrefix::new(rule.from.as_str()),
                    to: rule.to.trim_end_matches('/').to_string(),
                })
                .collect(),
        }
    }

    /// Rewrite `path`, borrowing it unchanged when no rule matches.
    pub fn rewrite<'a>(&self, path: &'a str) -> Cow<'a, str> {
        for rule in &self.rules {
            if let Some(rest) = rule.from.strip(path) {
                let rewritten = format!("{}{}", rule.to, rest);
                return if rewritten.is_empty() {
                    Cow::Borrowed("/")
                } else {
                    Cow::Owned(rewritten)
                };
            }
        }
        Cow::Borrowed(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(from: &str, to: &str) -> RewriteConfig {
        RewriteConfig {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    #[test]
    fn rewrites_management_platformmanager() {
        let rewriter = Rewriter::from_config(&[rule("/management/platformmanager", "/platformmanager")]);

        assert_eq!(
            rewriter.rewrite("/management/platformmanager/v1/jobs"),
            "/platformmanager/v1/jobs"
        );
        assert_eq!(
            rewriter.rewrite("/management/platformmanager"),
            "/platformmanager"
        );
    }

    #[test]
    fn leaves_other_paths_untouched() {
        let rewriter = Rewriter::from_config(&[rule("/management/platformmanager", "/platformmanager")]);

        assert!(matches!(rewriter.rewrite("/management/v1/aps"), Cow::Borrowed(_)));
        assert_eq!(
            rewriter.rewrite("/management/platformmanagerx/v1"),
            "/management/platformmanagerx/v1"
        );
        assert_eq!(
            rewriter.rewrite("/v1/management/platformmanager"),
            "/v1/management/platformmanager"
        );
    }

    #[test]
    fn first_matching_rule_wins_and_applies_once() {
        let rewriter = Rewriter::from_config(&[
            rule("/a", "/b"),
            rule("/b", "/c"),
        ]);

        assert_eq!(rewriter.rewrite("/a/x"), "/b/x");
        assert_eq!(rewriter.rewrite("/b/x"), "/c/x");
    }

    #[test]
    fn rewrite_to_root() {
        let rewriter = Rewriter::from_config(&[rule("/legacy", "/")]);

        assert_eq!(rewriter.rewrite("/legacy/v1/sites"), "/v1/sites");
        assert_eq!(rewriter.rewrite("/legacy"), "/");
    }
}
