use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::domain::{ports::ObjectStorage, DomainError};

/// Buckets as directories under a root; object keys are `/`-separated paths
/// relative to the bucket directory.
pub struct LocalObjectStorage {
    root: PathBuf,
}

impl LocalObjectStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn bucket_dir(&self, bucket: &str) -> PathBuf {
        self.root.join(bucket)
    }
}

fn collect_keys(base: &Path, dir: &Path, keys: &mut Vec<String>) -> std::io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_keys(base, &path, keys)?;
        } else if let Ok(relative) = path.strip_prefix(base) {
            let key = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            keys.push(key);
        }
    }
    Ok(())
}

#[async_trait]
impl ObjectStorage for LocalObjectStorage {
    async fn list(&self, bucket: &str) -> Result<Vec<String>, DomainError> {
        let dir = self.bucket_dir(bucket);
        let mut keys = tokio::task::spawn_blocking(move || {
            let mut keys = Vec::new();
            collect_keys(&dir, &dir, &mut keys).map(|_| keys)
        })
        .await
        .map_err(|e| DomainError::internal(e.to_string()))??;

        keys.sort();
        Ok(keys)
    }

    async fn fetch(&self, bucket: &str, key: &str) -> Result<Vec<u8>, DomainError> {
        if key.split('/').any(|part| part == "..") {
            return Err(DomainError::validation(format!("invalid object key: {key}")));
        }

        let path = self.bucket_dir(bucket).join(key);
        tokio::fs::read(&path)
            .await
            .map_err(|e| DomainError::storage(format!("{}: {e}", path.display())))
    }
}
