mod batch;
mod document;
mod ingest;
mod rag;
mod vector_store;

pub use batch::{EmbeddingBatcher, DEFAULT_BATCH_SIZE};
pub use document::DocumentLoader;
pub use ingest::IngestService;
pub use rag::RagService;
pub use vector_store::{VectorStoreManager, DEFAULT_MIN_RELEVANCE, DEFAULT_TOP_K};
