use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, instrument, warn};

use crate::domain::{
    ports::{EmbeddingService, VectorIndex},
    Chunk, DomainError, Embedding, SearchResult, VectorRecord,
};

pub const DEFAULT_TOP_K: usize = 150;
pub const DEFAULT_MIN_RELEVANCE: f32 = 0.35;

/// Owns the single persisted vector index.
///
/// Rebuilds hold the write side of `guard` and searches the read side, so a
/// search never observes a half-written index.
pub struct VectorStoreManager {
    embedding: Arc<dyn EmbeddingService>,
    index: Arc<dyn VectorIndex>,
    guard: RwLock<()>,
    top_k: usize,
    min_relevance: f32,
}

impl VectorStoreManager {
    pub fn new(embedding: Arc<dyn EmbeddingService>, index: Arc<dyn VectorIndex>) -> Self {
        Self {
            embedding,
            index,
            guard: RwLock::new(()),
            top_k: DEFAULT_TOP_K,
            min_relevance: DEFAULT_MIN_RELEVANCE,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_min_relevance(mut self, min_relevance: f32) -> Self {
        self.min_relevance = min_relevance;
        self
    }

    pub async fn exists(&self) -> bool {
        let _read = self.guard.read().await;
        self.index.exists().await.unwrap_or_else(|e| {
            error!(error = %e, "failed to check vector store");
            false
        })
    }

    /// Replaces the whole index with `chunks`. An empty chunk list leaves the
    /// current index untouched. If the old index cannot be removed, nothing new
    /// is written.
    #[instrument(skip(self, chunks, embeddings), fields(count = chunks.len()))]
    pub async fn rebuild(
        &self,
        chunks: &[Chunk],
        embeddings: &[Embedding],
    ) -> Result<(), DomainError> {
        if chunks.is_empty() {
            warn!("no chunks to save");
            return Ok(());
        }
        if chunks.len() != embeddings.len() {
            return Err(DomainError::validation(format!(
                "{} chunks but {} embeddings",
                chunks.len(),
                embeddings.len()
            )));
        }

        let records: Vec<VectorRecord> = chunks
            .iter()
            .cloned()
            .zip(embeddings.iter().cloned())
            .map(|(chunk, embedding)| VectorRecord::new(chunk, embedding))
            .collect();

        let _write = self.guard.write().await;
        if self.index.exists().await? {
            self.index.destroy().await?;
        }
        self.index.create(&records).await?;

        info!(records = records.len(), "stored chunks in the vector store");
        Ok(())
    }

    pub async fn search(&self, query: &str) -> Vec<SearchResult> {
        self.search_with(query, self.top_k, self.min_relevance).await
    }

    /// Top `top_k` matches scoring strictly above `min_relevance`, best first.
    /// Failures are logged and produce an empty result.
    #[instrument(skip(self))]
    pub async fn search_with(
        &self,
        query: &str,
        top_k: usize,
        min_relevance: f32,
    ) -> Vec<SearchResult> {
        let _read = self.guard.read().await;

        match self.try_search(query, top_k, min_relevance).await {
            Ok(results) => results,
            Err(e) => {
                error!(error = %e, "error during vector store search");
                Vec::new()
            }
        }
    }

    async fn try_search(
        &self,
        query: &str,
        top_k: usize,
        min_relevance: f32,
    ) -> Result<Vec<SearchResult>, DomainError> {
        if !self.index.exists().await? {
            error!("no data store found");
            return Ok(Vec::new());
        }

        let query_embedding = self.embedding.embed(query).await?;
        if query_embedding.is_empty() {
            error!("query embedding is empty");
            return Ok(Vec::new());
        }

        let mut results: Vec<SearchResult> = self
            .index
            .query(&query_embedding, top_k)
            .await?
            .into_iter()
            .filter(|r| r.score > min_relevance)
            .collect();
        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));

        if results.is_empty() {
            info!(min_relevance, "no results above relevance threshold");
        } else {
            info!(results = results.len(), min_relevance, "relevant results found");
        }
        Ok(results)
    }
}
