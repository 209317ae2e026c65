//! Retrieval-augmented question answering over PDF study material.
//!
//! Layers follow a ports-and-adapters split:
//! - [`domain`]: entities, the text splitter and collaborator traits
//! - [`application`]: ingest and query pipelines
//! - [`infrastructure`]: adapters for Gemini, S3, Qdrant, PDF and translation
//! - [`api`]: the axum HTTP surface

pub mod api;
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod telemetry;
