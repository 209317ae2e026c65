mod embedding;
mod extractor;
mod llm;
mod storage;
mod translator;
mod vector_store;

pub use embedding::EmbeddingService;
pub use extractor::TextExtractor;
pub use llm::LlmService;
pub use storage::ObjectStorage;
pub use translator::{Language, Translator};
pub use vector_store::VectorIndex;
