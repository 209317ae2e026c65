//! Vector index persisted as a directory on local disk.
//!
//! The directory holds a single `records.json` file. Queries are answered by a
//! brute-force cosine scan over the records, which are cached in memory after
//! the first load.

use async_trait::async_trait;
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::domain::{ports::VectorIndex, DomainError, Embedding, SearchResult, VectorRecord};

const RECORDS_FILE: &str = "records.json";

/// Bounded, fixed-pause retry for removing the index directory.
#[derive(Debug, Clone, Copy)]
pub struct DeleteRetry {
    pub attempts: u32,
    pub pause: Duration,
}

impl DeleteRetry {
    pub fn new(attempts: u32, pause: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            pause,
        }
    }
}

impl Default for DeleteRetry {
    fn default() -> Self {
        Self::new(5, Duration::from_secs(1))
    }
}

/// Busy or locked files surface as one of these on the platforms we run on.
fn is_transient(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::PermissionDenied | io::ErrorKind::ResourceBusy
    )
}

/// Runs `remove` until it succeeds, retrying only transient failures.
///
/// A missing directory counts as removed. Returns an error once `retry.attempts`
/// transient failures have been seen, or immediately on any other failure.
pub async fn remove_dir_with_retry<F, Fut>(
    path: &Path,
    retry: DeleteRetry,
    mut remove: F,
) -> Result<(), DomainError>
where
    F: FnMut(PathBuf) -> Fut,
    Fut: Future<Output = io::Result<()>>,
{
    for attempt in 1..=retry.attempts {
        match remove(path.to_path_buf()).await {
            Ok(()) => {
                debug!(path = %path.display(), attempt, "directory removed");
                return Ok(());
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) if is_transient(&e) => {
                warn!(path = %path.display(), attempt, error = %e, "directory busy, retrying");
                if attempt < retry.attempts {
                    tokio::time::sleep(retry.pause).await;
                }
            }
            Err(e) => return Err(DomainError::storage(format!("{}: {e}", path.display()))),
        }
    }

    warn!(
        path = %path.display(),
        attempts = retry.attempts,
        "failed to delete directory"
    );
    Err(DomainError::storage(format!(
        "failed to delete {} after {} attempts",
        path.display(),
        retry.attempts
    )))
}

/// `remove_dir_all` on the blocking pool.
async fn remove_dir_blocking(path: PathBuf) -> io::Result<()> {
    tokio::task::spawn_blocking(move || std::fs::remove_dir_all(path))
        .await
        .map_err(io::Error::other)?
}

pub struct LocalVectorIndex {
    path: PathBuf,
    retry: DeleteRetry,
    cache: RwLock<Option<Vec<VectorRecord>>>,
}

impl LocalVectorIndex {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            retry: DeleteRetry::default(),
            cache: RwLock::new(None),
        }
    }

    pub fn with_retry(mut self, retry: DeleteRetry) -> Self {
        self.retry = retry;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn records_path(&self) -> PathBuf {
        self.path.join(RECORDS_FILE)
    }

    fn set_cache(&self, records: Option<Vec<VectorRecord>>) -> Result<(), DomainError> {
        let mut cache = self
            .cache
            .write()
            .map_err(|e| DomainError::internal(e.to_string()))?;
        *cache = records;
        Ok(())
    }

    async fn load(&self) -> Result<(), DomainError> {
        let loaded = self
            .cache
            .read()
            .map_err(|e| DomainError::internal(e.to_string()))?
            .is_some();
        if loaded {
            return Ok(());
        }

        let raw = tokio::fs::read(self.records_path()).await?;
        let records: Vec<VectorRecord> = serde_json::from_slice(&raw)?;
        debug!(path = %self.path.display(), records = records.len(), "vector index loaded");
        self.set_cache(Some(records))
    }
}

#[async_trait]
impl VectorIndex for LocalVectorIndex {
    async fn exists(&self) -> Result<bool, DomainError> {
        Ok(tokio::fs::try_exists(self.records_path()).await?)
    }

    async fn destroy(&self) -> Result<(), DomainError> {
        self.set_cache(None)?;
        remove_dir_with_retry(&self.path, self.retry, remove_dir_blocking).await?;
        info!(path = %self.path.display(), "vector index deleted");
        Ok(())
    }

    async fn create(&self, records: &[VectorRecord]) -> Result<(), DomainError> {
        tokio::fs::create_dir_all(&self.path).await?;

        let tmp = self.path.join(format!("{RECORDS_FILE}.tmp"));
        tokio::fs::write(&tmp, serde_json::to_vec(records)?).await?;
        tokio::fs::rename(&tmp, self.records_path()).await?;

        self.set_cache(Some(records.to_vec()))?;
        info!(path = %self.path.display(), records = records.len(), "vector index written");
        Ok(())
    }

    async fn query(
        &self,
        embedding: &Embedding,
        top_k: usize,
    ) -> Result<Vec<SearchResult>, DomainError> {
        self.load().await?;

        let cache = self
            .cache
            .read()
            .map_err(|e| DomainError::internal(e.to_string()))?;
        let records = cache
            .as_ref()
            .ok_or_else(|| DomainError::not_found("vector index not loaded"))?;

        let mut results: Vec<SearchResult> = records
            .iter()
            .map(|record| SearchResult {
                chunk: record.chunk.clone(),
                score: embedding.cosine_similarity(&record.embedding),
            })
            .collect();

        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(top_k);
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Chunk;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn record(content: &str, vec: Vec<f32>) -> VectorRecord {
        VectorRecord::new(Chunk::new("doc.pdf", content, 0), Embedding::new(vec))
    }

    fn fast_retry() -> DeleteRetry {
        DeleteRetry::new(5, Duration::from_millis(1))
    }

    fn busy() -> io::Error {
        io::Error::new(io::ErrorKind::PermissionDenied, "resource busy")
    }

    #[tokio::test]
    async fn test_delete_succeeds_on_fifth_attempt() {
        let calls = AtomicU32::new(0);
        let result = remove_dir_with_retry(Path::new("store"), fast_retry(), |_| {
            let attempt = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt < 4 {
                    Err(busy())
                } else {
                    Ok(())
                }
            }
        })
        .await;

        assert!(result.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn test_delete_gives_up_after_attempts() {
        let calls = AtomicU32::new(0);
        let result = remove_dir_with_retry(Path::new("store"), fast_retry(), |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err::<(), _>(busy()) }
        })
        .await;

        assert!(matches!(result, Err(DomainError::Storage(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn test_delete_does_not_retry_permanent_errors() {
        let calls = AtomicU32::new(0);
        let result = remove_dir_with_retry(Path::new("store"), fast_retry(), |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err::<(), _>(io::Error::new(io::ErrorKind::InvalidInput, "bad path")) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_delete_missing_directory_is_ok() {
        let result = remove_dir_with_retry(Path::new("store"), fast_retry(), |_| async {
            Err::<(), _>(io::Error::new(io::ErrorKind::NotFound, "gone"))
        })
        .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_create_query_and_destroy() {
        let dir = tempfile::tempdir().unwrap();
        let index = LocalVectorIndex::new(dir.path().join("chroma")).with_retry(fast_retry());

        assert!(!index.exists().await.unwrap());

        index
            .create(&[
                record("east", vec![1.0, 0.0]),
                record("north", vec![0.0, 1.0]),
                record("north-east", vec![0.7, 0.7]),
            ])
            .await
            .unwrap();
        assert!(index.exists().await.unwrap());

        let results = index.query(&Embedding::new(vec![1.0, 0.1]), 2).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].chunk.content, "east");
        assert_eq!(results[1].chunk.content, "north-east");

        index.destroy().await.unwrap();
        assert!(!index.exists().await.unwrap());
        assert!(!index.path().exists());
    }

    #[tokio::test]
    async fn test_destroy_removes_nested_files_and_tolerates_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chroma");
        std::fs::create_dir_all(path.join("segments")).unwrap();
        std::fs::write(path.join("segments").join("data.bin"), b"stale").unwrap();
        let index = LocalVectorIndex::new(&path).with_retry(fast_retry());

        index.destroy().await.unwrap();
        assert!(!path.exists());

        index.destroy().await.unwrap();
    }

    #[tokio::test]
    async fn test_persisted_index_reloads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chroma");

        LocalVectorIndex::new(&path)
            .create(&[record("persisted", vec![0.0, 1.0])])
            .await
            .unwrap();

        let reopened = LocalVectorIndex::new(&path);
        let results = reopened.query(&Embedding::new(vec![0.0, 1.0]), 5).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].chunk.content, "persisted");
        assert!((results[0].score - 1.0).abs() < 1e-6);
    }
}
