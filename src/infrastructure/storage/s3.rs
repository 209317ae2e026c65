use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::Client;

use crate::domain::{ports::ObjectStorage, DomainError};

pub struct S3ObjectStorage {
    client: Client,
}

impl S3ObjectStorage {
    /// Builds a client from the default AWS credential chain.
    pub async fn new(region: impl Into<String>) -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.into()))
            .load()
            .await;

        Self {
            client: Client::new(&config),
        }
    }
}

#[async_trait]
impl ObjectStorage for S3ObjectStorage {
    async fn list(&self, bucket: &str) -> Result<Vec<String>, DomainError> {
        let mut keys = Vec::new();
        let mut continuation: Option<String> = None;

        loop {
            let response = self
                .client
                .list_objects_v2()
                .bucket(bucket)
                .set_continuation_token(continuation.take())
                .send()
                .await
                .map_err(|e| DomainError::external(format!("list {bucket}: {e}")))?;

            keys.extend(
                response
                    .contents()
                    .iter()
                    .filter_map(|object| object.key().map(str::to_string)),
            );

            match response.next_continuation_token() {
                Some(token) => continuation = Some(token.to_string()),
                None => break,
            }
        }

        tracing::info!(bucket, objects = keys.len(), "bucket listed");
        Ok(keys)
    }

    async fn fetch(&self, bucket: &str, key: &str) -> Result<Vec<u8>, DomainError> {
        let response = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| DomainError::external(format!("get {bucket}/{key}: {e}")))?;

        let body = response
            .body
            .collect()
            .await
            .map_err(|e| DomainError::external(format!("read {bucket}/{key}: {e}")))?;

        Ok(body.into_bytes().to_vec())
    }
}
