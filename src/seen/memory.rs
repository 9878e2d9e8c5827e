use crate::seen::{Fingerprint, SeenResult, SeenSet};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

/// In-memory seen-set for single-node deployments
///
/// Fingerprints map to their first-seen timestamp. State does not survive
/// process restarts; use [`SqliteSeenSet`](crate::seen::SqliteSeenSet) when
/// crawl history must persist.
#[derive(Debug, Default)]
pub struct MemorySeenSet {
    entries: Mutex<HashMap<Fingerprint, DateTime<Utc>>>,
}

impl MemorySeenSet {
    /// Creates an empty seen-set
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the first-seen timestamp for a fingerprint, if recorded
    pub fn first_seen(&self, fingerprint: &Fingerprint) -> Option<DateTime<Utc>> {
        self.entries.lock().unwrap().get(fingerprint).copied()
    }
}

impl SeenSet for MemorySeenSet {
    fn contains(&self, fingerprint: &Fingerprint) -> SeenResult<bool> {
        Ok(self.entries.lock().unwrap().contains_key(fingerprint))
    }

    fn mark_seen(&self, fingerprint: &Fingerprint) -> SeenResult<()> {
        self.entries
            .lock()
            .unwrap()
            .entry(*fingerprint)
            .or_insert_with(Utc::now);
        Ok(())
    }

    fn len(&self) -> SeenResult<u64> {
        Ok(self.entries.lock().unwrap().len() as u64)
    }
}
