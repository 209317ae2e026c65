use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use crate::application::services::VectorStoreManager;
use crate::domain::{
    ports::{Language, LlmService, Translator},
    QueryOutcome, SearchResult,
};
use crate::infrastructure::PromptsConfig;

/// Answers questions from the indexed documents.
///
/// Every path ends in a [`QueryOutcome`]; collaborator failures are logged and
/// mapped to the matching variant instead of being returned as errors.
pub struct RagService {
    store: Arc<VectorStoreManager>,
    llm: Arc<dyn LlmService>,
    translator: Arc<dyn Translator>,
    prompts: PromptsConfig,
}

impl RagService {
    pub fn new(
        store: Arc<VectorStoreManager>,
        llm: Arc<dyn LlmService>,
        translator: Arc<dyn Translator>,
        prompts: PromptsConfig,
    ) -> Self {
        Self {
            store,
            llm,
            translator,
            prompts,
        }
    }

    pub fn store(&self) -> &Arc<VectorStoreManager> {
        &self.store
    }

    #[instrument(skip(self))]
    pub async fn answer_english(&self, query: &str) -> QueryOutcome {
        info!("received query");

        let results = self.store.search(query).await;
        if results.is_empty() {
            return QueryOutcome::NoResults;
        }

        match self.generate(&self.prompts.answer_english, query, &results).await {
            Ok(answer) => QueryOutcome::Answered(answer),
            Err(outcome) => outcome,
        }
    }

    /// `query` must already be in English; the answer is returned in Sinhala.
    #[instrument(skip(self))]
    pub async fn answer_sinhala(&self, query: &str) -> QueryOutcome {
        info!("received translated query");

        let results = self.store.search(query).await;
        if results.is_empty() {
            return QueryOutcome::NoResults;
        }

        let answer = match self.generate(&self.prompts.answer_sinhala, query, &results).await {
            Ok(answer) => answer,
            Err(outcome) => return outcome,
        };

        let translated = match self.translator.translate(&answer, Language::Sinhala).await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => {
                error!("translation returned no text for the generated answer");
                return QueryOutcome::TranslationFailed;
            }
            Err(e) => {
                error!(error = %e, "translation failed for the generated answer");
                return QueryOutcome::TranslationFailed;
            }
        };
        info!(chars = translated.chars().count(), "answer translated");

        match self.llm.complete(&self.prompts.render_grammar(&translated)).await {
            Ok(Some(corrected)) if !corrected.trim().is_empty() => {
                QueryOutcome::Answered(corrected)
            }
            Ok(_) => {
                error!("grammar correction returned no text");
                QueryOutcome::GrammarCorrectionFailed
            }
            Err(e) => {
                error!(error = %e, "grammar correction failed");
                QueryOutcome::GrammarCorrectionFailed
            }
        }
    }

    async fn generate(
        &self,
        template: &str,
        query: &str,
        results: &[SearchResult],
    ) -> Result<String, QueryOutcome> {
        let context = results
            .iter()
            .map(SearchResult::to_context)
            .collect::<Vec<_>>()
            .join("\n");
        let prompt = PromptsConfig::render_answer(template, &context, query);

        match self.llm.complete(&prompt).await {
            Ok(Some(answer)) => {
                info!(chars = answer.chars().count(), "answer generated");
                Ok(answer)
            }
            Ok(None) => {
                warn!("no valid candidates returned from the model");
                Err(QueryOutcome::NoResponse)
            }
            Err(e) => {
                error!(error = %e, "answer generation failed");
                Err(QueryOutcome::GenerationFailed)
            }
        }
    }
}
