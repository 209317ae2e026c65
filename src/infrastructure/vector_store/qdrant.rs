use async_trait::async_trait;
use qdrant_client::qdrant::{
    CreateCollectionBuilder, Distance, PointStruct, SearchPointsBuilder, UpsertPointsBuilder,
    VectorParamsBuilder,
};
use qdrant_client::{Payload, Qdrant};

use crate::domain::{
    ports::VectorIndex, Chunk, DomainError, Embedding, SearchResult, VectorRecord,
};

const UPSERT_BATCH: usize = 256;

/// Vector index backed by a single Qdrant collection. Rebuilding drops and
/// recreates the collection.
pub struct QdrantVectorIndex {
    client: Qdrant,
    collection: String,
}

impl QdrantVectorIndex {
    pub fn new(url: &str, collection: &str) -> Result<Self, DomainError> {
        let client = Qdrant::from_url(url)
            .build()
            .map_err(|e| DomainError::external(e.to_string()))?;

        Ok(Self {
            client,
            collection: collection.to_string(),
        })
    }

    fn to_point(record: &VectorRecord) -> Result<PointStruct, DomainError> {
        let payload: Payload = serde_json::json!({
            "filename": record.chunk.metadata.filename,
            "start_index": record.chunk.metadata.start_index,
            "content": record.chunk.content,
        })
        .try_into()
        .map_err(|_| DomainError::internal("Failed to create payload"))?;

        Ok(PointStruct::new(
            record.id.to_string(),
            record.embedding.as_slice().to_vec(),
            payload,
        ))
    }
}

#[async_trait]
impl VectorIndex for QdrantVectorIndex {
    async fn exists(&self) -> Result<bool, DomainError> {
        self.client
            .collection_exists(&self.collection)
            .await
            .map_err(|e| DomainError::external(e.to_string()))
    }

    async fn destroy(&self) -> Result<(), DomainError> {
        self.client
            .delete_collection(&self.collection)
            .await
            .map_err(|e| DomainError::external(e.to_string()))?;
        tracing::info!(collection = %self.collection, "collection deleted");
        Ok(())
    }

    async fn create(&self, records: &[VectorRecord]) -> Result<(), DomainError> {
        let dimension = records
            .first()
            .map(|r| r.embedding.dimension())
            .ok_or_else(|| DomainError::validation("cannot create an empty collection"))?;

        self.client
            .create_collection(
                CreateCollectionBuilder::new(&self.collection).vectors_config(
                    VectorParamsBuilder::new(dimension as u64, Distance::Cosine),
                ),
            )
            .await
            .map_err(|e| DomainError::external(e.to_string()))?;

        for batch in records.chunks(UPSERT_BATCH) {
            let points = batch
                .iter()
                .map(Self::to_point)
                .collect::<Result<Vec<_>, _>>()?;

            self.client
                .upsert_points(UpsertPointsBuilder::new(&self.collection, points).wait(true))
                .await
                .map_err(|e| DomainError::external(e.to_string()))?;
        }

        tracing::info!(collection = %self.collection, records = records.len(), "collection written");
        Ok(())
    }

    async fn query(
        &self,
        embedding: &Embedding,
        top_k: usize,
    ) -> Result<Vec<SearchResult>, DomainError> {
        let results = self
            .client
            .search_points(
                SearchPointsBuilder::new(
                    &self.collection,
                    embedding.as_slice().to_vec(),
                    top_k as u64,
                )
                .with_payload(true),
            )
            .await
            .map_err(|e| DomainError::external(e.to_string()))?;

        let search_results: Vec<SearchResult> = results
            .result
            .into_iter()
            .filter_map(|point| {
                let payload = point.payload;

                let filename = payload.get("filename")?.as_str()?.to_string();
                let content = payload.get("content")?.as_str()?.to_string();
                let start_index = payload.get("start_index")?.as_integer()? as usize;

                Some(SearchResult {
                    chunk: Chunk::new(filename, content, start_index),
                    score: point.score,
                })
            })
            .collect();

        Ok(search_results)
    }
}
