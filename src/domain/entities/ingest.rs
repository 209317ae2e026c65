use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestReport {
    pub documents: usize,
    pub chunks: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl IngestReport {
    pub fn new(started_at: DateTime<Utc>, documents: usize, chunks: usize) -> Self {
        Self {
            documents,
            chunks,
            started_at,
            finished_at: Utc::now(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.chunks == 0
    }
}
