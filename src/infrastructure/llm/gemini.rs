use async_trait::async_trait;
use rig::client::{CompletionClient, ProviderClient};
use rig::completion::{CompletionError, Prompt, PromptError};
use rig::providers::gemini;

use crate::domain::{ports::LlmService, DomainError};
use crate::infrastructure::config::LlmConfig;

const API_KEY_ENV: &str = "GEMINI_API_KEY";

pub struct GeminiLlm {
    client: gemini::Client,
    model: String,
}

impl GeminiLlm {
    pub fn new(model: impl Into<String>) -> Result<Self, DomainError> {
        if std::env::var(API_KEY_ENV).is_err() {
            return Err(DomainError::validation(format!("{API_KEY_ENV} is not set")));
        }

        Ok(Self {
            client: gemini::Client::from_env(),
            model: model.into(),
        })
    }

    pub fn from_config(config: &LlmConfig) -> Result<Self, DomainError> {
        Self::new(config.model.clone())
    }
}

#[async_trait]
impl LlmService for GeminiLlm {
    async fn complete(&self, prompt: &str) -> Result<Option<String>, DomainError> {
        let agent = self.client.agent(&self.model).build();

        let text = match agent.prompt(prompt).await {
            Ok(text) => text,
            // Gemini answered, but with no candidate or a candidate without
            // usable content (safety block, empty parts).
            Err(PromptError::CompletionError(CompletionError::ResponseError(reason))) => {
                tracing::warn!(model = %self.model, %reason, "model returned no candidate");
                return Ok(None);
            }
            Err(e) => return Err(DomainError::external(e.to_string())),
        };

        if text.trim().is_empty() {
            tracing::warn!(model = %self.model, "model returned blank text");
            return Ok(None);
        }

        Ok(Some(text))
    }
}
