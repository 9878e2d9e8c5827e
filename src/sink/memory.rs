use crate::crawler::Document;
use crate::sink::{Sink, SinkError, SinkResult};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// In-memory recording sink
///
/// Stores documents in a vector and can be flipped into a failing mode,
/// which tests use to verify that a sink error leaves the fingerprint out
/// of the seen-set.
#[derive(Debug, Default)]
pub struct MemorySink {
    documents: Mutex<Vec<Document>>,
    fail: AtomicBool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent `store` call fail
    pub fn fail_next_stores(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Returns a copy of all stored documents
    pub fn documents(&self) -> Vec<Document> {
        self.documents.lock().unwrap().clone()
    }

    /// Returns the number of stored documents
    pub fn len(&self) -> usize {
        self.documents.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl Sink for MemorySink {
    async fn store(&self, document: &Document) -> SinkResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(SinkError::Unavailable("simulated outage".to_string()));
        }

        self.documents.lock().unwrap().push(document.clone());
        Ok(())
    }
}
