use crate::domain::{errors::DomainError, Embedding, SearchResult, VectorRecord};
use async_trait::async_trait;

/// A persisted index that is created, queried and destroyed as one unit.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    async fn exists(&self) -> Result<bool, DomainError>;
    async fn destroy(&self) -> Result<(), DomainError>;
    async fn create(&self, records: &[VectorRecord]) -> Result<(), DomainError>;
    /// Up to `top_k` nearest records, highest cosine similarity first.
    async fn query(
        &self,
        embedding: &Embedding,
        top_k: usize,
    ) -> Result<Vec<SearchResult>, DomainError>;
}
