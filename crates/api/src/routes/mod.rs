pub mod data;
pub mod health;
pub mod schemas;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /schemas                              list (?activeOnly), register
/// /schemas/health                       service liveness message
/// /schemas/{name}                       get
/// /schemas/{name}/active                activate / deactivate (PATCH)
///
/// /data/generate                        persisted generation (POST)
/// /data/quick-generate/{schema}/{count} unpersisted generation (POST)
/// /data/batch/{batch_id}                fetch a batch
/// /data/schemas/{name}/batches          batch history of a schema
/// /data/cleanup                         purge expired batches (DELETE)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/schemas", schemas::router())
        .nest("/data", data::router())
}
