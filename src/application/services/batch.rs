use std::sync::Arc;
use tracing::{error, info, instrument};

use crate::domain::{ports::EmbeddingService, Chunk, DomainError, Embedding};

pub const DEFAULT_BATCH_SIZE: usize = 50;

/// Embeds chunks in fixed-size batches, one provider call per batch, strictly
/// in order. The result is all-or-nothing: any empty vector fails the whole run.
pub struct EmbeddingBatcher {
    embedding: Arc<dyn EmbeddingService>,
    batch_size: usize,
}

impl EmbeddingBatcher {
    pub fn new(embedding: Arc<dyn EmbeddingService>) -> Self {
        Self {
            embedding,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    #[instrument(skip(self, chunks), fields(count = chunks.len(), batch_size = self.batch_size))]
    pub async fn embed_chunks(&self, chunks: &[Chunk]) -> Result<Vec<Embedding>, DomainError> {
        let mut embeddings = Vec::with_capacity(chunks.len());

        for (i, batch) in chunks.chunks(self.batch_size).enumerate() {
            let texts: Vec<&str> = batch.iter().map(|c| c.content.as_str()).collect();
            let vectors = self.embedding.embed_batch(&texts).await?;

            if vectors.len() != batch.len() {
                return Err(DomainError::embedding(format!(
                    "batch {} returned {} embeddings for {} chunks",
                    i + 1,
                    vectors.len(),
                    batch.len()
                )));
            }

            info!(batch = i + 1, embeddings = vectors.len(), "embeddings generated");
            embeddings.extend(vectors);
        }

        if let Some(position) = embeddings.iter().position(Embedding::is_empty) {
            error!(position, "one or more embeddings are empty");
            return Err(DomainError::embedding(format!(
                "empty embedding for chunk {position}"
            )));
        }

        Ok(embeddings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Embeds each text as `[len]`, or `[]` for texts containing "EMPTY".
    #[derive(Default)]
    struct LengthEmbedding {
        calls: Mutex<Vec<usize>>,
    }

    #[async_trait]
    impl EmbeddingService for LengthEmbedding {
        async fn embed(&self, text: &str) -> Result<Embedding, DomainError> {
            Ok(Embedding::new(vec![text.len() as f32]))
        }

        async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, DomainError> {
            self.calls.lock().unwrap().push(texts.len());
            Ok(texts
                .iter()
                .map(|t| {
                    if t.contains("EMPTY") {
                        Embedding::new(vec![])
                    } else {
                        Embedding::new(vec![t.len() as f32])
                    }
                })
                .collect())
        }
    }

    fn chunks(contents: &[&str]) -> Vec<Chunk> {
        contents
            .iter()
            .enumerate()
            .map(|(i, c)| Chunk::new("doc.pdf", *c, i))
            .collect()
    }

    #[tokio::test]
    async fn test_batches_in_order() {
        let provider = Arc::new(LengthEmbedding::default());
        let batcher = EmbeddingBatcher::new(provider.clone()).with_batch_size(2);

        let embeddings = batcher
            .embed_chunks(&chunks(&["a", "bb", "ccc", "dddd", "eeeee"]))
            .await
            .unwrap();

        let lengths: Vec<f32> = embeddings.iter().map(|e| e.as_slice()[0]).collect();
        assert_eq!(lengths, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(*provider.calls.lock().unwrap(), vec![2, 2, 1]);
    }

    #[tokio::test]
    async fn test_default_batch_size_is_fifty() {
        let provider = Arc::new(LengthEmbedding::default());
        let batcher = EmbeddingBatcher::new(provider.clone());
        let contents: Vec<String> = (0..120).map(|i| format!("chunk {i}")).collect();
        let refs: Vec<&str> = contents.iter().map(String::as_str).collect();

        let embeddings = batcher.embed_chunks(&chunks(&refs)).await.unwrap();

        assert_eq!(embeddings.len(), 120);
        assert_eq!(*provider.calls.lock().unwrap(), vec![50, 50, 20]);
    }

    #[tokio::test]
    async fn test_any_empty_embedding_fails_everything() {
        let batcher = EmbeddingBatcher::new(Arc::new(LengthEmbedding::default())).with_batch_size(2);

        let result = batcher
            .embed_chunks(&chunks(&["ok", "fine", "EMPTY", "ok"]))
            .await;

        assert!(matches!(result, Err(DomainError::EmbeddingValidation(_))));
    }

    #[tokio::test]
    async fn test_no_chunks_no_calls() {
        let provider = Arc::new(LengthEmbedding::default());
        let batcher = EmbeddingBatcher::new(provider.clone());

        assert!(batcher.embed_chunks(&[]).await.unwrap().is_empty());
        assert!(provider.calls.lock().unwrap().is_empty());
    }
}
