//! Crawl pipeline: fetcher, extractor, frontier, claims, and coordinator
//!
//! The coordinator drives one URL at a time through
//! policy gate → seen gate → claim → fetch → extract → store → mark-seen,
//! and runs a fixed-size worker pool over the shared frontier.

mod claim;
mod coordinator;
mod extractor;
mod fetcher;
mod frontier;

pub use claim::{ClaimGuard, ClaimRegistry};
pub use coordinator::{run_crawl, Coordinator, CrawlStats};
pub use extractor::{extract, Document};
pub use fetcher::{FetchError, FetchedPage, Fetcher};
pub use frontier::{CrawlTarget, Frontier};

/// Why a URL was skipped without fetching
///
/// Skips are expected outcomes and are logged at debug level only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Rejected by the blocklist or robots rules
    PolicyRejected,
    /// Fingerprint already present in the seen-set
    AlreadySeen,
    /// Another worker currently holds the claim for this fingerprint
    InFlight,
}

/// Why a crawl attempt failed
///
/// All failures leave the fingerprint unmarked, so the URL stays eligible
/// for a later crawl pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlFailure {
    /// The fetch did not complete within the configured timeout
    Timeout,
    /// The server answered with a non-2xx status
    Http(u16),
    /// Connection, TLS, or transfer error
    Network(String),
    /// The sink refused or failed to persist the document
    Sink(String),
}

impl std::fmt::Display for CrawlFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CrawlFailure::Timeout => write!(f, "fetch timeout"),
            CrawlFailure::Http(status) => write!(f, "HTTP {}", status),
            CrawlFailure::Network(msg) => write!(f, "network error: {}", msg),
            CrawlFailure::Sink(msg) => write!(f, "sink error: {}", msg),
        }
    }
}

/// Outcome of crawling a single URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlResult {
    /// The document was extracted and persisted; the fingerprint is now seen
    Stored(Document),
    /// The URL was gated before any fetch happened
    Skipped(SkipReason),
    /// The attempt failed; the URL remains retryable
    Failed(CrawlFailure),
}

impl CrawlResult {
    /// Returns the stored document, if this result carries one
    pub fn document(&self) -> Option<&Document> {
        match self {
            CrawlResult::Stored(doc) => Some(doc),
            _ => None,
        }
    }

    pub fn is_stored(&self) -> bool {
        matches!(self, CrawlResult::Stored(_))
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, CrawlResult::Skipped(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, CrawlResult::Failed(_))
    }
}
