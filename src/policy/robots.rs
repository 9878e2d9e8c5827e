//! Robots.txt handling
//!
//! Robots rules are fetched once per host and cached for the lifetime of
//! the crawl epoch. A host whose robots.txt cannot be fetched or parsed is
//! treated permissively.

use robotstxt::DefaultMatcher;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use url::Url;

/// Parsed robots.txt data
///
/// Wrapper around the robotstxt crate, matching on demand against the raw
/// content.
#[derive(Debug, Clone)]
pub struct ParsedRobots {
    /// Raw robots.txt content (empty means allow all)
    content: String,
    allow_all: bool,
}

impl ParsedRobots {
    /// Creates a ParsedRobots from raw robots.txt content
    pub fn from_content(content: &str) -> Self {
        Self {
            content: content.to_string(),
            allow_all: false,
        }
    }

    /// Creates a permissive ParsedRobots that allows everything
    ///
    /// Used as the fallback when robots.txt cannot be fetched.
    pub fn allow_all() -> Self {
        Self {
            content: String::new(),
            allow_all: true,
        }
    }

    /// Checks if a URL is allowed for the given user agent
    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        if self.allow_all || self.content.is_empty() {
            return true;
        }

        let mut matcher = DefaultMatcher::default();
        matcher.one_agent_allowed_by_robots(&self.content, user_agent, url)
    }
}

/// Per-host robots.txt cache backed by a shared HTTP client
pub struct RobotsCache {
    client: reqwest::Client,
    user_agent: String,
    cache: Mutex<HashMap<String, Arc<ParsedRobots>>>,
}

impl RobotsCache {
    /// Creates a cache that fetches robots.txt with the given client
    ///
    /// # Arguments
    ///
    /// * `client` - HTTP client (shares the fetcher's timeout settings)
    /// * `user_agent` - User agent string checked against robots rules
    pub fn new(client: reqwest::Client, user_agent: String) -> Self {
        Self {
            client,
            user_agent,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Checks whether a URL is allowed by its host's robots.txt
    ///
    /// Fetches and caches robots.txt on first contact with a host. Fetch
    /// failures fall back to allow-all so an unreachable robots.txt never
    /// stalls a crawl.
    pub async fn is_allowed(&self, url: &Url) -> bool {
        let Some(host_key) = host_key(url) else {
            return true;
        };

        let cached = {
            let cache = self.cache.lock().unwrap();
            cache.get(&host_key).cloned()
        };

        let robots = match cached {
            Some(robots) => robots,
            None => {
                let fetched = Arc::new(self.fetch_robots(url).await);
                self.cache
                    .lock()
                    .unwrap()
                    .entry(host_key)
                    .or_insert_with(|| fetched.clone())
                    .clone()
            }
        };

        robots.is_allowed(url.as_str(), &self.user_agent)
    }

    /// Fetches robots.txt for the host of the given URL
    async fn fetch_robots(&self, url: &Url) -> ParsedRobots {
        let mut robots_url = url.clone();
        robots_url.set_path("/robots.txt");
        robots_url.set_query(None);
        robots_url.set_fragment(None);

        match self.client.get(robots_url.as_str()).send().await {
            Ok(response) if response.status().is_success() => match response.text().await {
                Ok(body) => {
                    tracing::debug!("Fetched robots.txt for {}", robots_url);
                    ParsedRobots::from_content(&body)
                }
                Err(e) => {
                    tracing::debug!("Failed to read robots.txt body for {}: {}", robots_url, e);
                    ParsedRobots::allow_all()
                }
            },
            Ok(response) => {
                tracing::debug!(
                    "robots.txt for {} returned HTTP {}, allowing all",
                    robots_url,
                    response.status()
                );
                ParsedRobots::allow_all()
            }
            Err(e) => {
                tracing::debug!("Failed to fetch robots.txt for {}: {}", robots_url, e);
                ParsedRobots::allow_all()
            }
        }
    }
}

/// Cache key for a URL's host, including a non-default port
fn host_key(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    match url.port() {
        Some(port) => Some(format!("{}:{}", host, port)),
        None => Some(host.to_string()),
    }
}
