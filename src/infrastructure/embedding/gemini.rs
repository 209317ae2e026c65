use async_trait::async_trait;
use rig::client::{EmbeddingsClient, ProviderClient};
use rig::embeddings::EmbeddingModel;
use rig::providers::gemini;

use crate::domain::{ports::EmbeddingService, DomainError, Embedding};
use crate::infrastructure::config::EmbeddingConfig;

const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Gemini embedding API via rig. Empty vectors are passed through untouched so
/// the ingest gate can reject them.
pub struct GeminiEmbedding {
    client: gemini::Client,
    model: String,
}

impl GeminiEmbedding {
    pub fn new(model: impl Into<String>) -> Result<Self, DomainError> {
        if std::env::var(API_KEY_ENV).is_err() {
            return Err(DomainError::validation(format!("{API_KEY_ENV} is not set")));
        }

        Ok(Self {
            client: gemini::Client::from_env(),
            model: model.into(),
        })
    }

    pub fn from_config(config: &EmbeddingConfig) -> Result<Self, DomainError> {
        Self::new(config.model.clone())
    }
}

fn to_embedding(emb: rig::embeddings::Embedding) -> Embedding {
    Embedding::new(emb.vec.into_iter().map(|x| x as f32).collect())
}

#[async_trait]
impl EmbeddingService for GeminiEmbedding {
    async fn embed(&self, text: &str) -> Result<Embedding, DomainError> {
        let model = self.client.embedding_model(&self.model);

        model
            .embed_text(text)
            .await
            .map(to_embedding)
            .map_err(|e| DomainError::external(e.to_string()))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, DomainError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let model = self.client.embedding_model(&self.model);
        let embeddings = model
            .embed_texts(texts.iter().map(|t| t.to_string()).collect::<Vec<_>>())
            .await
            .map_err(|e| DomainError::external(e.to_string()))?;

        Ok(embeddings.into_iter().map(to_embedding).collect())
    }
}
