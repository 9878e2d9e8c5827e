use serde::Deserialize;

/// Main configuration structure for webharvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub policy: PolicyConfig,
    #[serde(default)]
    pub seen: SeenConfig,
    #[serde(default)]
    pub seeds: Vec<SeedEntry>,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Number of worker tasks pulling from the frontier
    pub workers: u32,

    /// Per-request fetch timeout in milliseconds
    #[serde(rename = "fetch-timeout-ms", default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,

    /// Maximum redirect hops before a fetch is failed
    #[serde(rename = "max-redirects", default = "default_max_redirects")]
    pub max_redirects: u32,

    /// Overall crawl-epoch deadline in seconds; absent means no deadline
    #[serde(rename = "epoch-timeout-secs")]
    pub epoch_timeout_secs: Option<u64>,
}

fn default_fetch_timeout_ms() -> u64 {
    10_000
}

fn default_max_redirects() -> u32 {
    5
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

/// Exclusion policy configuration
///
/// Loaded once at process start; reload semantics are external.
#[derive(Debug, Clone, Deserialize)]
pub struct PolicyConfig {
    /// URLs containing any of these substrings are rejected
    #[serde(rename = "blocked-substrings", default)]
    pub blocked_substrings: Vec<String>,

    /// Hosts matching any of these patterns (exact or "*.domain") are rejected
    #[serde(rename = "blocked-domains", default)]
    pub blocked_domains: Vec<String>,

    /// Whether to fetch and honor robots.txt per host
    #[serde(rename = "respect-robots", default = "default_respect_robots")]
    pub respect_robots: bool,
}

fn default_respect_robots() -> bool {
    true
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            blocked_substrings: Vec::new(),
            blocked_domains: Vec::new(),
            respect_robots: default_respect_robots(),
        }
    }
}

/// Seen-set backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeenBackend {
    Memory,
    Sqlite,
}

/// Seen-set configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SeenConfig {
    pub backend: SeenBackend,

    /// Path to the SQLite database file (sqlite backend only)
    #[serde(rename = "database-path")]
    pub database_path: Option<String>,
}

impl Default for SeenConfig {
    fn default() -> Self {
        Self {
            backend: SeenBackend::Memory,
            database_path: None,
        }
    }
}

/// A frontier seed entry
#[derive(Debug, Clone, Deserialize)]
pub struct SeedEntry {
    /// The URL to enqueue
    pub url: String,

    /// Optional region tag carried through to the crawl target
    pub region: Option<String>,

    /// Priority value (lower is crawled first)
    #[serde(default)]
    pub priority: u32,
}
