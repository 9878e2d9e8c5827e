//! Exclusion policy evaluation
//!
//! The [`Blocklist`] is a pure function of (url, policy config) and is
//! always evaluated before any network activity. Robots exclusion is
//! optional and lives in [`robots`]; it requires one fetch per host and is
//! consulted by the coordinator after the seen-set gates.

pub mod robots;

pub use robots::{ParsedRobots, RobotsCache};

use crate::config::PolicyConfig;
use crate::url::matches_wildcard;
use url::Url;

/// Configurable block-list of URL substrings and host patterns
///
/// Built once at process start from [`PolicyConfig`]; no side effects,
/// no interior mutability.
#[derive(Debug, Clone, Default)]
pub struct Blocklist {
    substrings: Vec<String>,
    domains: Vec<String>,
}

impl Blocklist {
    /// Builds a blocklist from the policy configuration
    pub fn from_config(config: &PolicyConfig) -> Self {
        Self {
            substrings: config.blocked_substrings.clone(),
            domains: config.blocked_domains.clone(),
        }
    }

    /// Builds a blocklist from raw substring entries
    pub fn from_substrings<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            substrings: entries.into_iter().map(Into::into).collect(),
            domains: Vec::new(),
        }
    }

    /// Checks whether a URL passes the blocklist
    ///
    /// A URL is rejected if its string form contains any blocked substring
    /// or its host matches any blocked domain pattern.
    pub fn is_allowed(&self, url: &Url) -> bool {
        let url_str = url.as_str();

        if self.substrings.iter().any(|bad| url_str.contains(bad.as_str())) {
            return false;
        }

        if let Some(host) = url.host_str() {
            if self
                .domains
                .iter()
                .any(|pattern| matches_wildcard(pattern, host))
            {
                return false;
            }
        }

        true
    }

    /// Returns whether the blocklist has no entries
    pub fn is_empty(&self) -> bool {
        self.substrings.is_empty() && self.domains.is_empty()
    }
}
