use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::Embedding;

/// Extracted text of one source object, keyed by its storage key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub content: String,
    pub metadata: DocumentMetadata,
}

impl Document {
    pub fn new(filename: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            metadata: DocumentMetadata {
                filename: filename.into(),
            },
        }
    }

    pub fn filename(&self) -> &str {
        &self.metadata.filename
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub filename: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub content: String,
    pub metadata: ChunkMetadata,
}

impl Chunk {
    pub fn new(filename: impl Into<String>, content: impl Into<String>, start_index: usize) -> Self {
        Self {
            content: content.into(),
            metadata: ChunkMetadata {
                filename: filename.into(),
                start_index,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub filename: String,
    /// Character offset of the chunk within its source document.
    pub start_index: usize,
}

/// A chunk paired with its embedding, as persisted by a vector index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorRecord {
    pub id: Uuid,
    pub chunk: Chunk,
    pub embedding: Embedding,
}

impl VectorRecord {
    pub fn new(chunk: Chunk, embedding: Embedding) -> Self {
        Self {
            id: Uuid::new_v4(),
            chunk,
            embedding,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub chunk: Chunk,
    pub score: f32,
}

impl SearchResult {
    /// Renders the result as a context line for answer prompts.
    pub fn to_context(&self) -> String {
        format!(
            "- Document: {}, Relevance: {:.2}\n{}",
            self.chunk.metadata.filename, self.score, self.chunk.content
        )
    }
}
