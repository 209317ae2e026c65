use crate::domain::errors::DomainError;
use async_trait::async_trait;

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn list(&self, bucket: &str) -> Result<Vec<String>, DomainError>;
    async fn fetch(&self, bucket: &str, key: &str) -> Result<Vec<u8>, DomainError>;
}
