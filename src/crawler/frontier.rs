//! Shared frontier queue
//!
//! A pull-based priority queue of crawl targets. Workers pop one target at
//! a time; producers (seed lists, upstream schedulers) push at any cadence.
//! Lower priority values are popped first; beyond that there is no ordering
//! guarantee between targets.

use crate::config::SeedEntry;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::Mutex;

/// A URL awaiting crawl, with optional metadata
///
/// Immutable once enqueued.
#[derive(Debug, Clone)]
pub struct CrawlTarget {
    /// The URL to crawl (canonicalized by the coordinator, not here)
    pub url: String,

    /// Optional region tag carried through from the producer
    pub region: Option<String>,

    /// Priority value (lower is crawled first)
    pub priority: u32,
}

impl CrawlTarget {
    /// Creates a target with default priority and no region
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            region: None,
            priority: 0,
        }
    }
}

impl From<&SeedEntry> for CrawlTarget {
    fn from(seed: &SeedEntry) -> Self {
        Self {
            url: seed.url.clone(),
            region: seed.region.clone(),
            priority: seed.priority,
        }
    }
}

// Reverse comparison so lower priority values pop first from the max-heap
impl Ord for CrawlTarget {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.url.cmp(&self.url))
    }
}

impl PartialOrd for CrawlTarget {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for CrawlTarget {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.url == other.url
    }
}

impl Eq for CrawlTarget {}

/// Mutation-guarded frontier shared by all workers
#[derive(Debug, Default)]
pub struct Frontier {
    queue: Mutex<BinaryHeap<CrawlTarget>>,
}

impl Frontier {
    /// Creates an empty frontier
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a frontier seeded from configuration entries
    pub fn from_seeds(seeds: &[SeedEntry]) -> Self {
        let frontier = Self::new();
        for seed in seeds {
            frontier.push(seed.into());
        }
        frontier
    }

    /// Enqueues a target
    pub fn push(&self, target: CrawlTarget) {
        self.queue.lock().unwrap().push(target);
    }

    /// Removes and returns the highest-priority target
    pub fn pop(&self) -> Option<CrawlTarget> {
        self.queue.lock().unwrap().pop()
    }

    /// Returns the number of queued targets
    pub fn len(&self) -> usize {
        self.queue.lock().unwrap().len()
    }

    /// Returns whether the frontier is empty
    pub fn is_empty(&self) -> bool {
        self.queue.lock().unwrap().is_empty()
    }
}
