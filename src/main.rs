use kuppi_rag::api::{create_router, AppState};
use kuppi_rag::application::{
    DocumentLoader, EmbeddingBatcher, IngestService, RagService, VectorStoreManager,
};
use kuppi_rag::domain::ports::{
    EmbeddingService, LlmService, ObjectStorage, Translator, VectorIndex,
};
use kuppi_rag::domain::TextSplitter;
use kuppi_rag::infrastructure::{
    AppConfig, DeleteRetry, GeminiEmbedding, GeminiLlm, GoogleTranslator, LocalObjectStorage,
    LocalVectorIndex, PdfTextExtractor, QdrantVectorIndex, S3ObjectStorage, StorageBackend,
    VectorBackend,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    kuppi_rag::telemetry::init();

    let config = AppConfig::from_env()?;
    let settings = &config.config;

    let embedding: Arc<dyn EmbeddingService> =
        Arc::new(GeminiEmbedding::from_config(&settings.embedding)?);
    let llm: Arc<dyn LlmService> = Arc::new(GeminiLlm::from_config(&settings.llm)?);
    let translator: Arc<dyn Translator> =
        Arc::new(GoogleTranslator::from_config(&settings.translation)?);

    let storage: Arc<dyn ObjectStorage> = match settings.storage.backend {
        StorageBackend::S3 => Arc::new(S3ObjectStorage::new(settings.storage.region.clone()).await),
        StorageBackend::Local => Arc::new(LocalObjectStorage::new(&settings.storage.local_root)),
    };

    let index: Arc<dyn VectorIndex> = match settings.vector_store.backend {
        VectorBackend::Local => Arc::new(
            LocalVectorIndex::new(&settings.vector_store.path).with_retry(DeleteRetry::new(
                settings.vector_store.delete_attempts,
                settings.vector_store.delete_pause(),
            )),
        ),
        VectorBackend::Qdrant => Arc::new(QdrantVectorIndex::new(
            &settings.vector_store.qdrant_url,
            &settings.vector_store.collection,
        )?),
    };
    info!(backend = ?settings.vector_store.backend, "vector index configured");

    let store = Arc::new(
        VectorStoreManager::new(embedding.clone(), index)
            .with_top_k(settings.rag.top_k)
            .with_min_relevance(settings.rag.min_relevance),
    );

    let loader = DocumentLoader::new(
        storage,
        Arc::new(PdfTextExtractor::new()),
        settings.storage.bucket.clone(),
    )
    .with_scratch_dir(&settings.storage.scratch_dir);
    let splitter = TextSplitter::new(settings.ingest.chunk_size, settings.ingest.chunk_overlap)?;
    let batcher = EmbeddingBatcher::new(embedding).with_batch_size(settings.ingest.batch_size);
    let ingest = Arc::new(IngestService::new(loader, splitter, batcher, store.clone()));

    if settings.server.ingest_on_startup {
        match ingest.run().await {
            Ok(report) => info!(
                documents = report.documents,
                chunks = report.chunks,
                "startup ingest finished"
            ),
            Err(e) => error!(error = %e, "startup ingest failed"),
        }
    }

    let rag = Arc::new(RagService::new(
        store,
        llm,
        translator.clone(),
        config.prompts.clone(),
    ));

    let addr = SocketAddr::new(settings.server.host.parse()?, settings.server.port);
    let app = create_router(AppState::new(rag, ingest, translator, config.clone()));

    info!("API server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
