//! HTTP fetcher
//!
//! One reqwest client per crawler, built once: explicit request timeout,
//! capped redirect chain, identifying user agent. Every failure maps to a
//! typed [`FetchError`]; a bad URL never poisons a worker.

use crate::config::{CrawlerConfig, UserAgentConfig};
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// A successfully fetched page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// HTTP status code (always 2xx here)
    pub status: u16,
    /// Response body
    pub body: String,
}

/// Typed fetch failure
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request timeout")]
    Timeout,

    #[error("HTTP {0}")]
    Http(u16),

    #[error("Network error: {0}")]
    Network(String),
}

/// Bounded HTTP client wrapper
pub struct Fetcher {
    client: Client,
    user_agent: String,
}

impl Fetcher {
    /// Builds a fetcher from the crawler and user-agent configuration
    ///
    /// The redirect cap comes from `max_redirects`; reqwest turns an
    /// exceeded chain into an error, which surfaces as
    /// [`FetchError::Network`].
    pub fn new(
        crawler: &CrawlerConfig,
        user_agent: &UserAgentConfig,
    ) -> Result<Self, reqwest::Error> {
        let ua = format_user_agent(user_agent);

        let client = Client::builder()
            .user_agent(ua.clone())
            .timeout(Duration::from_millis(crawler.fetch_timeout_ms))
            .connect_timeout(Duration::from_millis(crawler.fetch_timeout_ms.min(10_000)))
            .redirect(Policy::limited(crawler.max_redirects as usize))
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self {
            client,
            user_agent: ua,
        })
    }

    /// Fetches a URL with GET
    ///
    /// # Returns
    ///
    /// * `Ok(FetchedPage)` - 2xx response with its body
    /// * `Err(FetchError)` - Timeout, non-2xx status, or transport failure
    pub async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(classify_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http(status.as_u16()));
        }

        let body = response.text().await.map_err(classify_error)?;

        Ok(FetchedPage {
            status: status.as_u16(),
            body,
        })
    }

    /// Returns a clone of the underlying client (shared with the robots cache)
    pub fn client(&self) -> Client {
        self.client.clone()
    }

    /// Returns the formatted user agent string
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

/// Maps a reqwest error to the fetch taxonomy
fn classify_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else if e.is_connect() {
        FetchError::Network("connection refused".to_string())
    } else {
        FetchError::Network(e.to_string())
    }
}

/// Formats the identifying user agent string
///
/// Format: CrawlerName/Version (+ContactURL; ContactEmail)
fn format_user_agent(config: &UserAgentConfig) -> String {
    format!(
        "{}/{} (+{}; {})",
        config.crawler_name, config.crawler_version, config.contact_url, config.contact_email
    )
}
