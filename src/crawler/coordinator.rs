//! Crawl coordinator
//!
//! Holds explicit references to its collaborators (blocklist, robots cache,
//! fetcher, seen-set, claim registry, sink) and drives the per-URL pipeline:
//!
//! 1. Canonicalize and fingerprint; blocklist and seen-set gates
//! 2. Atomic per-fingerprint claim
//! 3. Robots check, then fetch
//! 4. Extract a document
//! 5. Persist to the sink, then mark seen and commit the claim
//!
//! A failure at any step releases the claim without marking seen, so the
//! URL stays retryable by a later pass. No failure is process-fatal.

use crate::config::Config;
use crate::crawler::claim::ClaimRegistry;
use crate::crawler::extractor::extract;
use crate::crawler::fetcher::{FetchError, Fetcher};
use crate::crawler::frontier::{CrawlTarget, Frontier};
use crate::crawler::{CrawlFailure, CrawlResult, SkipReason};
use crate::policy::{Blocklist, RobotsCache};
use crate::seen::SeenSet;
use crate::sink::Sink;
use crate::url::{canonicalize_url, Fingerprint};
use crate::HarvestError;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Counts of crawl outcomes for one epoch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStats {
    pub stored: u64,
    pub skipped: u64,
    pub failed: u64,
}

#[derive(Debug, Default)]
struct Counters {
    stored: AtomicU64,
    skipped: AtomicU64,
    failed: AtomicU64,
}

impl Counters {
    fn snapshot(&self) -> CrawlStats {
        CrawlStats {
            stored: self.stored.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

/// Main crawl coordinator
///
/// Construct once, use for the whole epoch. All state is held explicitly;
/// the seen-set, claim registry, and frontier are the only shared mutable
/// resources.
pub struct Coordinator {
    blocklist: Blocklist,
    robots: Option<RobotsCache>,
    fetcher: Fetcher,
    seen: Arc<dyn SeenSet>,
    claims: Arc<ClaimRegistry>,
    sink: Arc<dyn Sink>,
    workers: u32,
    epoch_timeout: Option<Duration>,
    counters: Counters,
}

impl Coordinator {
    /// Creates a coordinator from configuration and its two external
    /// collaborators
    ///
    /// # Arguments
    ///
    /// * `config` - Validated crawler configuration
    /// * `seen` - Seen-set backend (see [`crate::seen::from_config`])
    /// * `sink` - Destination for extracted documents
    pub fn new(
        config: &Config,
        seen: Arc<dyn SeenSet>,
        sink: Arc<dyn Sink>,
    ) -> Result<Self, HarvestError> {
        let fetcher = Fetcher::new(&config.crawler, &config.user_agent)?;

        let robots = if config.policy.respect_robots {
            Some(RobotsCache::new(
                fetcher.client(),
                fetcher.user_agent().to_string(),
            ))
        } else {
            None
        };

        Ok(Self {
            blocklist: Blocklist::from_config(&config.policy),
            robots,
            fetcher,
            seen,
            claims: Arc::new(ClaimRegistry::new()),
            sink,
            workers: config.crawler.workers,
            epoch_timeout: config.crawler.epoch_timeout_secs.map(Duration::from_secs),
            counters: Counters::default(),
        })
    }

    /// Crawls a single target through the full pipeline
    ///
    /// Expected outcomes (skips, fetch failures, sink failures) come back
    /// as [`CrawlResult`]; `Err` is reserved for infrastructure faults such
    /// as a broken seen-set backend.
    pub async fn crawl(&self, target: &CrawlTarget) -> Result<CrawlResult, HarvestError> {
        // Canonicalize; a URL we cannot parse is permanently rejected
        let canonical = match canonicalize_url(&target.url) {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!("Rejecting malformed URL {}: {}", target.url, e);
                return Ok(CrawlResult::Skipped(SkipReason::PolicyRejected));
            }
        };

        // Blocklist gate: pure, before any network activity
        if !self.blocklist.is_allowed(&canonical) {
            tracing::debug!("Policy rejected {}", canonical);
            return Ok(CrawlResult::Skipped(SkipReason::PolicyRejected));
        }

        let fingerprint = Fingerprint::of(&canonical);

        if self.seen.contains(&fingerprint)? {
            tracing::debug!("Already seen {}", canonical);
            return Ok(CrawlResult::Skipped(SkipReason::AlreadySeen));
        }

        // Atomic claim: losers observe the winner and skip
        let Some(guard) = self.claims.try_claim(fingerprint) else {
            tracing::debug!("Claim contested for {}", canonical);
            return Ok(CrawlResult::Skipped(SkipReason::InFlight));
        };

        // Re-check under the claim: a winner may have marked the
        // fingerprint between our first check and the claim
        if self.seen.contains(&fingerprint)? {
            tracing::debug!("Already seen {} (post-claim)", canonical);
            return Ok(CrawlResult::Skipped(SkipReason::AlreadySeen));
        }

        // Robots gate (one cached fetch per host)
        if let Some(robots) = &self.robots {
            if !robots.is_allowed(&canonical).await {
                tracing::debug!("Disallowed by robots.txt: {}", canonical);
                return Ok(CrawlResult::Skipped(SkipReason::PolicyRejected));
            }
        }

        let page = match self.fetcher.fetch(&canonical).await {
            Ok(page) => page,
            Err(e) => {
                // Claim released by guard drop; fingerprint stays retryable
                let failure = match e {
                    FetchError::Timeout => CrawlFailure::Timeout,
                    FetchError::Http(status) => CrawlFailure::Http(status),
                    FetchError::Network(msg) => CrawlFailure::Network(msg),
                };
                tracing::warn!("Fetch failed for {}: {}", canonical, failure);
                return Ok(CrawlResult::Failed(failure));
            }
        };

        // Best-effort extraction: an empty body is still a success
        let document = extract(&page.body, &canonical);

        if let Err(e) = self.sink.store(&document).await {
            tracing::warn!("Sink rejected document for {}: {}", canonical, e);
            return Ok(CrawlResult::Failed(CrawlFailure::Sink(e.to_string())));
        }

        // Mark seen only after successful persistence
        self.seen.mark_seen(&fingerprint)?;
        guard.commit();

        tracing::debug!("Stored document for {} (HTTP {})", canonical, page.status);
        Ok(CrawlResult::Stored(document))
    }

    /// Runs the worker pool over the frontier until it drains or the epoch
    /// deadline expires
    ///
    /// Each worker pulls one target at a time and runs the full pipeline;
    /// a single URL's failure never aborts the pool. On deadline expiry,
    /// in-flight fetches are aborted and their claims released.
    pub async fn run(self: &Arc<Self>, frontier: &Arc<Frontier>) -> CrawlStats {
        tracing::info!(
            "Starting crawl epoch: {} workers, {} targets queued",
            self.workers,
            frontier.len()
        );
        let start = std::time::Instant::now();

        match self.epoch_timeout {
            Some(deadline) => {
                if tokio::time::timeout(deadline, self.run_workers(frontier))
                    .await
                    .is_err()
                {
                    tracing::warn!(
                        "Epoch deadline of {:?} reached with {} targets left",
                        deadline,
                        frontier.len()
                    );
                }
            }
            None => self.run_workers(frontier).await,
        }

        let stats = self.counters.snapshot();
        tracing::info!(
            "Crawl epoch finished in {:?}: {} stored, {} skipped, {} failed",
            start.elapsed(),
            stats.stored,
            stats.skipped,
            stats.failed
        );
        stats
    }

    /// Returns the outcome counts so far
    pub fn stats(&self) -> CrawlStats {
        self.counters.snapshot()
    }

    async fn run_workers(self: &Arc<Self>, frontier: &Arc<Frontier>) {
        let mut tasks = tokio::task::JoinSet::new();

        for worker_id in 0..self.workers {
            let coordinator = Arc::clone(self);
            let frontier = Arc::clone(frontier);

            tasks.spawn(async move {
                while let Some(target) = frontier.pop() {
                    coordinator.process(worker_id, &target).await;
                }
                tracing::debug!("Worker {} done, frontier drained", worker_id);
            });
        }

        while tasks.join_next().await.is_some() {}
    }

    async fn process(&self, worker_id: u32, target: &CrawlTarget) {
        match self.crawl(target).await {
            Ok(CrawlResult::Stored(document)) => {
                self.counters.stored.fetch_add(1, Ordering::Relaxed);
                tracing::info!(
                    "Worker {} stored {} ({} keywords, {} body bytes)",
                    worker_id,
                    document.url,
                    document.keywords.len(),
                    document.body.len()
                );
            }
            Ok(CrawlResult::Skipped(reason)) => {
                self.counters.skipped.fetch_add(1, Ordering::Relaxed);
                tracing::debug!("Worker {} skipped {}: {:?}", worker_id, target.url, reason);
            }
            Ok(CrawlResult::Failed(failure)) => {
                self.counters.failed.fetch_add(1, Ordering::Relaxed);
                tracing::warn!("Worker {} failed {}: {}", worker_id, target.url, failure);
            }
            Err(e) => {
                self.counters.failed.fetch_add(1, Ordering::Relaxed);
                tracing::error!("Worker {} error on {}: {}", worker_id, target.url, e);
            }
        }
    }
}

/// Runs a full crawl epoch from configuration
///
/// Convenience entry point: builds the seen-set from config, seeds the
/// frontier, and drains it.
///
/// # Example
///
/// ```no_run
/// use webharvest::config::load_config;
/// use webharvest::crawler::run_crawl;
/// use webharvest::sink::LogSink;
/// use std::path::Path;
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("config.toml"))?;
/// let stats = run_crawl(&config, Arc::new(LogSink::new())).await?;
/// println!("stored {} documents", stats.stored);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: &Config, sink: Arc<dyn Sink>) -> Result<CrawlStats, HarvestError> {
    let seen = crate::seen::from_config(&config.seen)?;
    let coordinator = Arc::new(Coordinator::new(config, seen, sink)?);
    let frontier = Arc::new(Frontier::from_seeds(&config.seeds));
    Ok(coordinator.run(&frontier).await)
}
