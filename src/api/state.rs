use std::sync::Arc;

use crate::application::{IngestService, RagService, VectorStoreManager};
use crate::domain::ports::Translator;
use crate::infrastructure::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub rag_service: Arc<RagService>,
    pub ingest_service: Arc<IngestService>,
    pub translator: Arc<dyn Translator>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(
        rag_service: Arc<RagService>,
        ingest_service: Arc<IngestService>,
        translator: Arc<dyn Translator>,
        config: AppConfig,
    ) -> Self {
        Self {
            rag_service,
            ingest_service,
            translator,
            config: Arc::new(config),
        }
    }

    pub fn vector_store(&self) -> &Arc<VectorStoreManager> {
        self.rag_service.store()
    }
}
