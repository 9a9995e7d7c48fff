//! Handlers for the `/schemas` resource.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use tdm_core::schema::CreateSchemaDefinition;

use crate::error::{AppError, AppResult};
use crate::query::ActiveOnlyParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Body of `PATCH /schemas/{name}/active`.
#[derive(Debug, Deserialize)]
pub struct SetActiveInput {
    pub active: bool,
}

/// POST /api/v1/schemas
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<CreateSchemaDefinition>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let schema = state.registry.register(input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: schema })))
}

/// GET /api/v1/schemas?activeOnly=false
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ActiveOnlyParams>,
) -> AppResult<impl IntoResponse> {
    let schemas = if params.active_only {
        state.registry.list_active().await?
    } else {
        state.registry.list_all().await?
    };
    Ok(Json(DataResponse { data: schemas }))
}

/// GET /api/v1/schemas/{name}
pub async fn get_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<impl IntoResponse> {
    let schema = state.registry.get_by_name(&name).await?;
    Ok(Json(DataResponse { data: schema }))
}

/// PATCH /api/v1/schemas/{name}/active
pub async fn set_active(
    State(state): State<AppState>,
    Path(name): Path<String>,
    payload: Result<Json<SetActiveInput>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let schema = state.registry.set_active(&name, input.active).await?;
    Ok(Json(DataResponse { data: schema }))
}

/// GET /api/v1/schemas/health
pub async fn service_health() -> impl IntoResponse {
    Json(DataResponse {
        data: "TDM Service is running",
    })
}
