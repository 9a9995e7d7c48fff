use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::schemas;
use crate::state::AppState;

/// Schema routes mounted at `/schemas`.
///
/// ```text
/// GET    /                -> list
/// POST   /                -> register
/// GET    /health          -> service_health
/// GET    /{name}          -> get_by_name
/// PATCH  /{name}/active   -> set_active
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(schemas::list).post(schemas::register))
        .route("/health", get(schemas::service_health))
        .route("/{name}", get(schemas::get_by_name))
        .route("/{name}/active", patch(schemas::set_active))
}
