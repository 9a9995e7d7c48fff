//! Handlers for the `/data` resource: generation, retrieval, cleanup.

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use tdm_core::error::CoreError;
use tdm_core::request::GenerationRequest;
use tdm_core::response::GenerationResponse;
use tdm_core::types::BatchId;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Outcome of a cleanup run.
#[derive(Debug, Serialize)]
pub struct CleanupResult {
    pub deleted: u64,
    pub message: String,
}

/// Run one generation on its own task and wait for it.
///
/// Dropping the handler future (request timeout, client disconnect) must not
/// cancel the orchestrator between the IN_PROGRESS save and the terminal save.
async fn generate_detached(
    state: &AppState,
    request: GenerationRequest,
) -> AppResult<GenerationResponse> {
    let orchestrator = Arc::clone(&state.orchestrator);
    let response = tokio::spawn(async move { orchestrator.generate(&request).await })
        .await
        .map_err(|e| CoreError::Internal(format!("Generation task failed: {e}")))??;
    Ok(response)
}

/// POST /api/v1/data/generate
///
/// 200 with a COMPLETED response, or 500 carrying the FAILED response.
pub async fn generate(
    State(state): State<AppState>,
    payload: Result<Json<GenerationRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(request) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let response = generate_detached(&state, request).await?;
    let status = if response.is_completed() {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    Ok((status, Json(DataResponse { data: response })))
}

/// POST /api/v1/data/quick-generate/{schema}/{count}
///
/// Unpersisted generation; always 200, even for a FAILED result.
pub async fn quick_generate(
    State(state): State<AppState>,
    path: Result<Path<(String, i64)>, PathRejection>,
) -> AppResult<impl IntoResponse> {
    let Path((schema_name, count)) = path.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let response = generate_detached(&state, GenerationRequest::quick(schema_name, count)).await?;
    Ok(Json(DataResponse { data: response }))
}

/// GET /api/v1/data/batch/{batch_id}
pub async fn get_batch(
    State(state): State<AppState>,
    path: Result<Path<BatchId>, PathRejection>,
) -> AppResult<impl IntoResponse> {
    let Path(batch_id) = path.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let response = state.orchestrator.fetch(batch_id).await?;
    Ok(Json(DataResponse { data: response }))
}

/// GET /api/v1/data/schemas/{name}/batches
///
/// Persisted batches of one schema, newest first.
pub async fn list_schema_batches(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<impl IntoResponse> {
    let batches = state.orchestrator.batches_for_schema(&name).await?;
    Ok(Json(DataResponse { data: batches }))
}

/// DELETE /api/v1/data/cleanup
pub async fn cleanup(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let deleted = state.orchestrator.cleanup_expired(Utc::now()).await?;
    Ok(Json(DataResponse {
        data: CleanupResult {
            deleted,
            message: format!("Cleaned up {deleted} expired data records"),
        },
    }))
}
