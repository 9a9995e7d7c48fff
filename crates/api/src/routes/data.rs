use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::data;
use crate::state::AppState;

/// Generation routes mounted at `/data`.
///
/// ```text
/// POST   /generate                        -> generate
/// POST   /quick-generate/{schema}/{count} -> quick_generate
/// GET    /batch/{batch_id}                -> get_batch
/// GET    /schemas/{name}/batches          -> list_schema_batches
/// DELETE /cleanup                         -> cleanup
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/generate", post(data::generate))
        .route("/quick-generate/{schema}/{count}", post(data::quick_generate))
        .route("/batch/{batch_id}", get(data::get_batch))
        .route("/schemas/{name}/batches", get(data::list_schema_batches))
        .route("/cleanup", delete(data::cleanup))
}
