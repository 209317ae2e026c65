#![allow(dead_code)]

use async_trait::async_trait;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

use kuppi_rag::application::{
    DocumentLoader, EmbeddingBatcher, IngestService, RagService, VectorStoreManager,
};
use kuppi_rag::domain::ports::{EmbeddingService, Language, LlmService, TextExtractor, Translator};
use kuppi_rag::domain::{DomainError, Embedding, TextSplitter};
use kuppi_rag::infrastructure::{
    DeleteRetry, LocalObjectStorage, LocalVectorIndex, PromptsConfig,
};

pub const BUCKET: &str = "kuppi-bucket";

const VOCABULARY: &[&str] = &[
    "photosynthesis",
    "convert",
    "light",
    "energy",
    "mitochondria",
    "cell",
    "gravity",
];

/// One axis per vocabulary stem; a word counts when it starts with the stem.
pub struct KeywordEmbedding;

pub fn keyword_vector(text: &str) -> Vec<f32> {
    let words: Vec<String> = text
        .split(|c: char| !c.is_alphanumeric())
        .map(str::to_lowercase)
        .collect();
    VOCABULARY
        .iter()
        .map(|stem| {
            if words.iter().any(|w| w.starts_with(stem)) {
                1.0
            } else {
                0.0
            }
        })
        .collect()
}

#[async_trait]
impl EmbeddingService for KeywordEmbedding {
    async fn embed(&self, text: &str) -> Result<Embedding, DomainError> {
        Ok(Embedding::new(keyword_vector(text)))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, DomainError> {
        Ok(texts.iter().map(|t| Embedding::new(keyword_vector(t))).collect())
    }
}

/// Returns no vector for any text mentioning gravity.
pub struct HoleyEmbedding;

#[async_trait]
impl EmbeddingService for HoleyEmbedding {
    async fn embed(&self, text: &str) -> Result<Embedding, DomainError> {
        KeywordEmbedding.embed(text).await
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, DomainError> {
        Ok(texts
            .iter()
            .map(|t| {
                if t.to_lowercase().contains("gravity") {
                    Embedding::new(vec![])
                } else {
                    Embedding::new(keyword_vector(t))
                }
            })
            .collect())
    }
}

/// Replays queued replies and records every prompt it receives.
#[derive(Default)]
pub struct ScriptedLlm {
    replies: Mutex<Vec<Result<Option<String>, String>>>,
    pub prompts: Mutex<Vec<String>>,
}

impl ScriptedLlm {
    pub fn replying(replies: Vec<Result<Option<&str>, &str>>) -> Self {
        let mut replies: Vec<_> = replies
            .into_iter()
            .map(|r| r.map(|o| o.map(str::to_string)).map_err(str::to_string))
            .collect();
        replies.reverse();
        Self {
            replies: Mutex::new(replies),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmService for ScriptedLlm {
    async fn complete(&self, prompt: &str) -> Result<Option<String>, DomainError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match self.replies.lock().unwrap().pop() {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(e)) => Err(DomainError::external(e)),
            None => Ok(Some("default answer".to_string())),
        }
    }
}

/// Prefixes text with the target code, or fails for the configured target.
#[derive(Default)]
pub struct FakeTranslator {
    pub fail_for: Option<Language>,
    pub blank_for: Option<Language>,
}

#[async_trait]
impl Translator for FakeTranslator {
    async fn translate(&self, text: &str, target: Language) -> Result<String, DomainError> {
        if self.fail_for == Some(target) {
            return Err(DomainError::external("translation quota exceeded"));
        }
        if self.blank_for == Some(target) {
            return Ok(String::new());
        }
        Ok(format!("[{}] {}", target.code(), text))
    }
}

/// Treats the downloaded file as UTF-8 text.
pub struct Utf8Extractor;

#[async_trait]
impl TextExtractor for Utf8Extractor {
    async fn extract(&self, path: &Path) -> Result<String, DomainError> {
        let bytes = tokio::fs::read(path).await?;
        String::from_utf8(bytes).map_err(|e| DomainError::validation(e.to_string()))
    }
}

pub struct Harness {
    pub dir: TempDir,
    pub store: Arc<VectorStoreManager>,
    pub ingest: Arc<IngestService>,
    pub rag: Arc<RagService>,
    pub llm: Arc<ScriptedLlm>,
    pub translator: Arc<FakeTranslator>,
}

impl Harness {
    pub fn new(llm: ScriptedLlm, translator: FakeTranslator) -> Self {
        Self::with_embedding(Arc::new(KeywordEmbedding), llm, translator)
    }

    pub fn with_embedding(
        embedding: Arc<dyn EmbeddingService>,
        llm: ScriptedLlm,
        translator: FakeTranslator,
    ) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let bucket = dir.path().join("objects").join(BUCKET);
        std::fs::create_dir_all(&bucket).unwrap();
        std::fs::create_dir_all(dir.path().join("scratch")).unwrap();

        let index = LocalVectorIndex::new(dir.path().join("chroma"))
            .with_retry(DeleteRetry::new(5, Duration::from_millis(1)));
        let store = Arc::new(VectorStoreManager::new(embedding.clone(), Arc::new(index)));

        let loader = DocumentLoader::new(
            Arc::new(LocalObjectStorage::new(dir.path().join("objects"))),
            Arc::new(Utf8Extractor),
            BUCKET,
        )
        .with_scratch_dir(dir.path().join("scratch"));
        let ingest = Arc::new(IngestService::new(
            loader,
            TextSplitter::default(),
            EmbeddingBatcher::new(embedding),
            store.clone(),
        ));

        let llm = Arc::new(llm);
        let translator = Arc::new(translator);
        let rag = Arc::new(RagService::new(
            store.clone(),
            llm.clone(),
            translator.clone(),
            PromptsConfig::default(),
        ));

        Self {
            dir,
            store,
            ingest,
            rag,
            llm,
            translator,
        }
    }

    pub fn put_object(&self, key: &str, content: &str) {
        let path = self.dir.path().join("objects").join(BUCKET).join(key);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }
}
