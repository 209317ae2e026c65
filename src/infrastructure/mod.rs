pub mod config;
pub mod embedding;
pub mod extractor;
pub mod llm;
pub mod storage;
pub mod translation;
pub mod vector_store;

pub use config::{AppConfig, Config, PromptsConfig, StorageBackend, VectorBackend};
pub use embedding::GeminiEmbedding;
pub use extractor::PdfTextExtractor;
pub use llm::GeminiLlm;
pub use storage::{LocalObjectStorage, S3ObjectStorage};
pub use translation::GoogleTranslator;
pub use vector_store::{DeleteRetry, LocalVectorIndex, QdrantVectorIndex};
