use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::api::{error::ApiError, state::AppState};
use crate::domain::ports::Language;

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct QueryResponse {
    pub response: String,
}

fn require_query(request: &QueryRequest) -> Result<&str, ApiError> {
    let query = request.query.trim();
    if query.is_empty() {
        return Err(ApiError::BadRequest("No query provided".into()));
    }
    Ok(query)
}

pub async fn query_english(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<QueryResponse>, ApiError> {
    let query = require_query(&request)?;

    let outcome = state.rag_service.answer_english(query).await;
    tracing::info!(outcome = outcome.as_str(), "english query answered");

    Ok(Json(QueryResponse {
        response: outcome.into_message(),
    }))
}

pub async fn query_sinhala(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<QueryResponse>, ApiError> {
    let query = require_query(&request)?;

    let translated = match state.translator.translate(query, Language::English).await {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => return Err(ApiError::Internal("Translation failed for query".into())),
        Err(e) => {
            tracing::error!(error = %e, "query translation failed");
            return Err(ApiError::Internal("Translation failed for query".into()));
        }
    };
    tracing::info!(translated = %translated, "query translated");

    let outcome = state.rag_service.answer_sinhala(&translated).await;
    tracing::info!(outcome = outcome.as_str(), "sinhala query answered");

    Ok(Json(QueryResponse {
        response: outcome.into_message(),
    }))
}
