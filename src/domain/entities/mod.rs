mod document;
mod embedding;
mod ingest;
mod outcome;

pub use document::{
    Chunk, ChunkMetadata, Document, DocumentMetadata, SearchResult, VectorRecord,
};
pub use embedding::Embedding;
pub use ingest::IngestReport;
pub use outcome::{
    QueryOutcome, GENERATION_FAILED_MESSAGE, GRAMMAR_FAILED_MESSAGE, NO_RESPONSE_MESSAGE,
    NO_RESULTS_MESSAGE, TRANSLATION_FAILED_MESSAGE,
};
