//! Per-fingerprint claims
//!
//! A claim is a short-lived exclusive reservation on a fingerprint that
//! spans one worker's fetch → extract → store → mark-seen sequence. It is
//! the only cross-worker mutual exclusion in the pipeline. Claims are
//! RAII-guarded: dropping an uncommitted guard releases the claim, so a
//! failed or aborted attempt leaves the URL retryable.

use crate::url::Fingerprint;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Registry of fingerprints currently owned by in-flight workers
#[derive(Debug, Default)]
pub struct ClaimRegistry {
    in_flight: Mutex<HashSet<Fingerprint>>,
}

impl ClaimRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempts to claim a fingerprint
    ///
    /// # Returns
    ///
    /// * `Some(ClaimGuard)` - The caller now exclusively owns the fingerprint
    /// * `None` - Another worker holds the claim
    pub fn try_claim(self: &Arc<Self>, fingerprint: Fingerprint) -> Option<ClaimGuard> {
        let mut in_flight = self.in_flight.lock().unwrap();
        if in_flight.insert(fingerprint) {
            Some(ClaimGuard {
                registry: Arc::clone(self),
                fingerprint,
                committed: false,
            })
        } else {
            None
        }
    }

    /// Returns whether a fingerprint is currently claimed
    pub fn is_claimed(&self, fingerprint: &Fingerprint) -> bool {
        self.in_flight.lock().unwrap().contains(fingerprint)
    }

    fn release(&self, fingerprint: &Fingerprint) {
        self.in_flight.lock().unwrap().remove(fingerprint);
    }
}

/// RAII guard for a claimed fingerprint
///
/// The claim is released on drop either way; `commit` only records that
/// the pipeline completed, so callers can distinguish a finished claim
/// from an abandoned one in logs.
#[derive(Debug)]
pub struct ClaimGuard {
    registry: Arc<ClaimRegistry>,
    fingerprint: Fingerprint,
    committed: bool,
}

impl ClaimGuard {
    /// Marks the claimed work as completed (document persisted and marked seen)
    pub fn commit(mut self) {
        self.committed = true;
    }

    /// The fingerprint this guard owns
    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }
}

impl Drop for ClaimGuard {
    fn drop(&mut self) {
        if !self.committed {
            tracing::trace!("Releasing uncommitted claim for {}", self.fingerprint);
        }
        self.registry.release(&self.fingerprint);
    }
}
