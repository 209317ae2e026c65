//! Application layer - Use cases and orchestration.
//!
//! Services here compose the ingest and query pipelines. They depend on domain
//! ports (traits) rather than concrete adapters, which are injected by the
//! composition root.

pub mod services;

pub use services::{
    DocumentLoader, EmbeddingBatcher, IngestService, RagService, VectorStoreManager,
};
