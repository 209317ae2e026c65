use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

use crate::domain::{
    ports::{ObjectStorage, TextExtractor},
    Document, DomainError,
};

const MIN_EXPECTED_CHARS: usize = 500;

/// Pulls PDFs out of a bucket and turns each into a [`Document`].
///
/// Objects are processed one at a time: every download goes through the same
/// scratch directory and the scratch file is removed before the next object.
pub struct DocumentLoader {
    storage: Arc<dyn ObjectStorage>,
    extractor: Arc<dyn TextExtractor>,
    bucket: String,
    scratch_dir: PathBuf,
}

impl DocumentLoader {
    pub fn new(
        storage: Arc<dyn ObjectStorage>,
        extractor: Arc<dyn TextExtractor>,
        bucket: impl Into<String>,
    ) -> Self {
        Self {
            storage,
            extractor,
            bucket: bucket.into(),
            scratch_dir: std::env::temp_dir(),
        }
    }

    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = dir.into();
        self
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    #[instrument(skip(self), fields(bucket = %self.bucket))]
    pub async fn load(&self) -> Vec<Document> {
        let keys = match self.storage.list(&self.bucket).await {
            Ok(keys) => keys,
            Err(e) => {
                error!(error = %e, "failed to list bucket");
                return Vec::new();
            }
        };

        let mut documents = Vec::new();
        for key in keys {
            if !key.ends_with(".pdf") {
                debug!(key, "skipping non-pdf object");
                continue;
            }

            match self.load_one(&key).await {
                Ok(Some(doc)) => documents.push(doc),
                Ok(None) => warn!(key, "no text extracted"),
                Err(e) => error!(key, error = %e, "failed to load object"),
            }
        }

        info!(documents = documents.len(), "documents loaded");
        documents
    }

    async fn load_one(&self, key: &str) -> Result<Option<Document>, DomainError> {
        let bytes = self.storage.fetch(&self.bucket, key).await?;
        debug!(key, bytes = bytes.len(), "object downloaded");

        let scratch = self.scratch_path(key);
        tokio::fs::write(&scratch, &bytes).await?;

        let extracted = self.extractor.extract(&scratch).await;
        if let Err(e) = tokio::fs::remove_file(&scratch).await {
            warn!(path = %scratch.display(), error = %e, "failed to remove scratch file");
        }
        let text = extracted?;

        if text.chars().count() > MIN_EXPECTED_CHARS {
            info!(key, chars = text.chars().count(), "text extracted");
        } else {
            warn!(key, chars = text.chars().count(), "extracted too little text");
        }

        if text.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(Document::new(key, text)))
    }

    fn scratch_path(&self, key: &str) -> PathBuf {
        let base = Path::new(key)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "object.pdf".to_string());
        self.scratch_dir.join(format!("temp_{base}"))
    }
}
