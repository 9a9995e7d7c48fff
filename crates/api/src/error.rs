use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tdm_core::error::CoreError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Malformed body, path or query.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// HTTP status, machine-readable code, and client-facing message.
    fn classify(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Core(core) => match core {
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::SchemaNotFound(_) | CoreError::BatchNotFound(_) => {
                    (StatusCode::NOT_FOUND, "NOT_FOUND", core.to_string())
                }
                CoreError::AlreadyExists(_) => (StatusCode::CONFLICT, "CONFLICT", core.to_string()),
                CoreError::SchemaInactive(_) => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "SCHEMA_INACTIVE",
                    core.to_string(),
                ),
                CoreError::Unsupported(msg) => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "UNSUPPORTED", msg.clone())
                }
                CoreError::Storage(msg) | CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.classify();
        let body = json!({
            "error": message,
            "code": code,
        });
        (status, axum::Json(body)).into_response()
    }
}
