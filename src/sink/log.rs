use crate::crawler::Document;
use crate::sink::{Sink, SinkResult};
use async_trait::async_trait;

/// Sink that serializes each document as JSON into the log stream
///
/// The binary's default adapter: useful for piping crawl output into log
/// shippers, and as a stand-in while a real index backend is wired up.
#[derive(Debug, Default)]
pub struct LogSink;

impl LogSink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Sink for LogSink {
    async fn store(&self, document: &Document) -> SinkResult<()> {
        let payload = serde_json::to_string(document)?;
        tracing::info!(url = %document.url, "stored document: {}", payload);
        Ok(())
    }
}
