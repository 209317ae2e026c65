use crate::domain::errors::DomainError;
use async_trait::async_trait;

#[async_trait]
pub trait LlmService: Send + Sync {
    /// `Ok(None)` means the model produced no candidate for the prompt.
    async fn complete(&self, prompt: &str) -> Result<Option<String>, DomainError>;
}
