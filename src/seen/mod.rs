//! Durable, deduplicating membership over URL fingerprints
//!
//! The seen-set records which canonical URLs have completed a full
//! fetch+extract+store cycle. Entries are inserted only after successful
//! persistence and are never deleted in normal operation, so crawl history
//! is monotonic within an epoch. The contract is identical across backends;
//! the in-process claim that prevents two workers from fetching the same
//! URL concurrently lives in [`crate::crawler`], not here.

mod memory;
mod sqlite;

pub use memory::MemorySeenSet;
pub use sqlite::SqliteSeenSet;

pub use crate::url::Fingerprint;

use crate::config::{SeenBackend, SeenConfig};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Errors from seen-set backends
#[derive(Debug, Error)]
pub enum SeenError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Corrupt seen-set entry: {0}")]
    Corrupt(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for seen-set operations
pub type SeenResult<T> = Result<T, SeenError>;

/// Membership test over canonical URL fingerprints
///
/// Implementations must support concurrent readers and writers; callers
/// hold a shared reference across worker tasks.
pub trait SeenSet: Send + Sync {
    /// Returns whether the fingerprint has been recorded
    fn contains(&self, fingerprint: &Fingerprint) -> SeenResult<bool>;

    /// Records the fingerprint with a first-seen timestamp
    ///
    /// Idempotent: re-marking an existing fingerprint keeps the original
    /// timestamp.
    fn mark_seen(&self, fingerprint: &Fingerprint) -> SeenResult<()>;

    /// Returns the number of recorded fingerprints
    fn len(&self) -> SeenResult<u64>;

    /// Returns whether the set is empty
    fn is_empty(&self) -> SeenResult<bool> {
        Ok(self.len()? == 0)
    }
}

/// Builds a seen-set from configuration
///
/// The sqlite backend requires `database_path`; config validation enforces
/// that before this is reached.
pub fn from_config(config: &SeenConfig) -> SeenResult<Arc<dyn SeenSet>> {
    match config.backend {
        SeenBackend::Memory => Ok(Arc::new(MemorySeenSet::new())),
        SeenBackend::Sqlite => {
            let path = config.database_path.as_deref().unwrap_or("./seen.db");
            Ok(Arc::new(SqliteSeenSet::open(Path::new(path))?))
        }
    }
}
