use async_trait::async_trait;
use std::path::Path;

use crate::domain::{ports::TextExtractor, DomainError};

/// PDF text extraction with `pdf-extract`, run on the blocking pool.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TextExtractor for PdfTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String, DomainError> {
        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text(&path)
                .map_err(|e| DomainError::external(format!("{}: {e}", path.display())))
        })
        .await
        .map_err(|e| DomainError::internal(e.to_string()))?
    }
}
