//! Sink adapter: the boundary to the external indexing/storage system
//!
//! The sink receives immutable [`Document`]s and answers with success or
//! failure only. Retry policy belongs to the coordinator and to future
//! crawl passes, never to the adapter.

mod log;
mod memory;

pub use self::log::LogSink;
pub use memory::MemorySink;

use crate::crawler::Document;
use async_trait::async_trait;
use thiserror::Error;

/// Errors from sink backends
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Sink rejected document: {0}")]
    Rejected(String),

    #[error("Sink unavailable: {0}")]
    Unavailable(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for sink operations
pub type SinkResult<T> = Result<T, SinkError>;

/// Destination for extracted documents
///
/// Implementations are shared across worker tasks; `store` is a suspension
/// point and must not block the runtime.
#[async_trait]
pub trait Sink: Send + Sync {
    /// Persists a document downstream
    async fn store(&self, document: &Document) -> SinkResult<()>;
}
