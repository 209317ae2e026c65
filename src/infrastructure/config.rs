use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::DomainError;

const APP_CONFIG_FILE: &str = "app.yaml";
const PROMPTS_CONFIG_FILE: &str = "prompts.yaml";

/// Runtime settings plus prompt templates, loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub config: Config,
    pub prompts: PromptsConfig,
}

impl AppConfig {
    /// Reads `app.yaml` and `prompts.yaml` from `dir`. Missing files fall back
    /// to defaults; environment overrides are applied last.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, DomainError> {
        let dir = dir.as_ref();
        let mut config: Config = read_yaml(&dir.join(APP_CONFIG_FILE))?.unwrap_or_default();
        let prompts = read_yaml(&dir.join(PROMPTS_CONFIG_FILE))?.unwrap_or_default();
        config.apply_env_overrides();
        Ok(Self { config, prompts })
    }

    pub fn from_env() -> Result<Self, DomainError> {
        let dir = std::env::var("CONFIG_DIR").unwrap_or_else(|_| "config".into());
        Self::load(dir)
    }
}

fn read_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>, DomainError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "config file not found, using defaults");
        return Ok(None);
    }

    let raw = std::fs::read_to_string(path)?;
    serde_yaml::from_str(&raw)
        .map(Some)
        .map_err(|e| DomainError::validation(format!("{}: {e}", path.display())))
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub ingest: IngestConfig,
    pub vector_store: VectorStoreConfig,
    pub rag: RagConfig,
    pub llm: LlmConfig,
    pub embedding: EmbeddingConfig,
    pub translation: TranslationConfig,
    pub cors: CorsConfig,
}

impl Config {
    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("SERVER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = std::env::var("SERVER_PORT").ok().and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }
        if let Ok(bucket) = std::env::var("S3_BUCKET") {
            self.storage.bucket = bucket;
        }
        if let Ok(region) = std::env::var("S3_REGION") {
            self.storage.region = region;
        }
        if let Ok(path) = std::env::var("VECTOR_STORE_PATH") {
            self.vector_store.path = PathBuf::from(path);
        }
        if let Ok(url) = std::env::var("QDRANT_URL") {
            self.vector_store.qdrant_url = url;
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub ingest_on_startup: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            ingest_on_startup: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    S3,
    Local,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub bucket: String,
    pub region: String,
    /// Root directory for the `local` backend; each bucket is a subdirectory.
    pub local_root: PathBuf,
    pub scratch_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::S3,
            bucket: "kuppi-bucket".to_string(),
            region: "ap-south-1".to_string(),
            local_root: PathBuf::from("data"),
            scratch_dir: std::env::temp_dir(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub batch_size: usize,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            chunk_size: 2000,
            chunk_overlap: 300,
            batch_size: 50,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VectorBackend {
    Local,
    Qdrant,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VectorStoreConfig {
    pub backend: VectorBackend,
    pub path: PathBuf,
    pub qdrant_url: String,
    pub collection: String,
    pub delete_attempts: u32,
    pub delete_pause_ms: u64,
}

impl VectorStoreConfig {
    pub fn delete_pause(&self) -> Duration {
        Duration::from_millis(self.delete_pause_ms)
    }
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            backend: VectorBackend::Local,
            path: PathBuf::from("chroma"),
            qdrant_url: "http://localhost:6334".to_string(),
            collection: "kuppi_chunks".to_string(),
            delete_attempts: 5,
            delete_pause_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    pub top_k: usize,
    pub min_relevance: f32,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            top_k: 150,
            min_relevance: 0.35,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub model: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gemini-1.5-flash-001".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub model: String,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: "text-embedding-004".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TranslationConfig {
    pub endpoint: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://translation.googleapis.com/language/translate/v2".to_string(),
            api_key_env: "GOOGLE_TRANSLATE_API_KEY".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PromptsConfig {
    /// Placeholders: `{context}`, `{query}`.
    pub answer_english: String,
    /// Placeholders: `{context}`, `{query}`.
    pub answer_sinhala: String,
    /// Placeholder: `{text}`.
    pub grammar_sinhala: String,
}

impl PromptsConfig {
    pub fn render_answer(template: &str, context: &str, query: &str) -> String {
        template.replace("{context}", context).replace("{query}", query)
    }

    pub fn render_grammar(&self, text: &str) -> String {
        self.grammar_sinhala.replace("{text}", text)
    }
}

impl Default for PromptsConfig {
    fn default() -> Self {
        Self {
            answer_english: "Using the following information:\n{context}\n\
                ### Provide an answer to the query: '{query}' ###\n\
                - Answer the query concisely and accurately based on the given information.\n\
                - Format the response in a simple and clear manner.\n\
                - Present the answer in a point-wise format or in a way that is easy to \
                understand and read, as this is for study purposes."
                .to_string(),
            answer_sinhala: "Using the following information:\n{context}\n\
                ### Provide an answer to the query: '{query}' ###\n\
                - Answer the query concisely and accurately based on the given information.\n\
                - Format the response in a simple and clear manner.\n\
                - Ensure the answer stays the same and correct when translated from English to Sinhala.\n\
                - Present the answer in a point-wise format or in a way that is easy to \
                understand and read, as this is for study purposes."
                .to_string(),
            grammar_sinhala: "Please correct the grammar of the following text in Sinhala:\n{text}\n\
                ### Follow standard Sinhala grammar: Subject-Object-Verb order, agreement of \
                nouns, pronouns and verbs in number, tense and formality, adjectives before \
                nouns, postpositions and honorifics where appropriate. ###\n\
                ### Do not mention these rules; respond only with the corrected text. ###"
                .to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_pipeline_constants() {
        let config = Config::default();
        assert_eq!(config.ingest.chunk_size, 2000);
        assert_eq!(config.ingest.chunk_overlap, 300);
        assert_eq!(config.ingest.batch_size, 50);
        assert_eq!(config.rag.top_k, 150);
        assert!((config.rag.min_relevance - 0.35).abs() < f32::EPSILON);
        assert_eq!(config.vector_store.delete_attempts, 5);
        assert_eq!(config.vector_store.delete_pause(), Duration::from_secs(1));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = "rag:\n  top_k: 10\nvector_store:\n  backend: qdrant\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.rag.top_k, 10);
        assert!((config.rag.min_relevance - 0.35).abs() < f32::EPSILON);
        assert_eq!(config.vector_store.backend, VectorBackend::Qdrant);
        assert_eq!(config.storage.backend, StorageBackend::S3);
    }

    #[test]
    fn test_load_from_missing_dir_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(dir.path().join("absent")).unwrap();
        assert_eq!(config.config.llm.model, "gemini-1.5-flash-001");
        assert!(config.prompts.answer_english.contains("{context}"));
    }

    #[test]
    fn test_render_answer_fills_placeholders() {
        let prompt = PromptsConfig::render_answer("C={context} Q={query}", "ctx", "why?");
        assert_eq!(prompt, "C=ctx Q=why?");

        let prompts = PromptsConfig::default();
        assert!(prompts.render_grammar("පාඩම").contains("පාඩම"));
    }
}
