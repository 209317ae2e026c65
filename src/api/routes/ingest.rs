use axum::{extract::State, Json};

use crate::api::{error::ApiError, state::AppState};
use crate::domain::IngestReport;

pub async fn trigger_ingest(State(state): State<AppState>) -> Result<Json<IngestReport>, ApiError> {
    state.ingest_service.run().await.map(Json).map_err(|e| {
        tracing::error!(error = %e, "ingest failed");
        ApiError::Internal(format!("Ingest failed: {e}"))
    })
}
