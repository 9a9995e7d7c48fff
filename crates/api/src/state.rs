use std::sync::Arc;

use tdm_core::orchestrator::GenerationOrchestrator;
use tdm_core::registry::SchemaRegistry;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything inside is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database pool, absent when running over in-memory stores.
    pub pool: Option<tdm_db::DbPool>,
    pub config: Arc<ServerConfig>,
    pub registry: SchemaRegistry,
    pub orchestrator: Arc<GenerationOrchestrator>,
}
