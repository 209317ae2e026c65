use crate::domain::errors::DomainError;
use async_trait::async_trait;
use std::path::Path;

#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Text of every page of the file at `path`, concatenated in page order.
    async fn extract(&self, path: &Path) -> Result<String, DomainError>;
}
