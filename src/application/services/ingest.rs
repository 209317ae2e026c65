use chrono::Utc;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::application::services::{DocumentLoader, EmbeddingBatcher, VectorStoreManager};
use crate::domain::{DomainError, IngestReport, TextSplitter};

/// Loader → splitter → batcher → full index rebuild.
pub struct IngestService {
    loader: DocumentLoader,
    splitter: TextSplitter,
    batcher: EmbeddingBatcher,
    store: Arc<VectorStoreManager>,
}

impl IngestService {
    pub fn new(
        loader: DocumentLoader,
        splitter: TextSplitter,
        batcher: EmbeddingBatcher,
        store: Arc<VectorStoreManager>,
    ) -> Self {
        Self {
            loader,
            splitter,
            batcher,
            store,
        }
    }

    #[instrument(skip(self), fields(bucket = %self.loader.bucket()))]
    pub async fn run(&self) -> Result<IngestReport, DomainError> {
        let started_at = Utc::now();

        let documents = self.loader.load().await;
        let chunks = self.splitter.split_documents(&documents);
        info!(documents = documents.len(), chunks = chunks.len(), "chunks generated");

        if chunks.is_empty() {
            warn!("no chunks to process");
            return Ok(IngestReport::new(started_at, documents.len(), 0));
        }

        let embeddings = self.batcher.embed_chunks(&chunks).await?;
        self.store.rebuild(&chunks, &embeddings).await?;

        Ok(IngestReport::new(started_at, documents.len(), chunks.len()))
    }
}
