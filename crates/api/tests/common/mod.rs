//! Shared helpers for HTTP integration tests.
//!
//! The app runs over in-memory stores and a scripted synthesizer, through
//! the same [`build_app_router`] middleware stack as production.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use tdm_api::config::{LlmConfig, ServerConfig, DEFAULT_LLM_API_URL};
use tdm_api::router::build_app_router;
use tdm_api::state::AppState;
use tdm_core::config::GenerationConfig;
use tdm_core::orchestrator::GenerationOrchestrator;
use tdm_core::registry::SchemaRegistry;
use tdm_core::store::{MemoryBatchStore, MemorySchemaStore};
use tdm_core::strategy::StrategyTable;
use tdm_core::synthesis::{ContentSynthesizer, SynthesisCall, SynthesisError};

/// How the test synthesizer answers every call.
#[derive(Clone, Copy)]
pub enum Reply {
    /// As many valid `User` records as were asked for.
    Users,
    /// A provider error.
    Fail,
    /// Valid `User` records, after sleeping this long.
    Slow(Duration),
}

struct ScriptedSynthesizer(Reply);

#[async_trait]
impl ContentSynthesizer for ScriptedSynthesizer {
    async fn synthesize(
        &self,
        call: &SynthesisCall,
    ) -> Result<Vec<Value>, SynthesisError> {
        match self.0 {
            Reply::Users => Ok((0..call.expected_records).map(user_record).collect()),
            Reply::Fail => Err(SynthesisError::Provider("upstream returned 503".into())),
            Reply::Slow(delay) => {
                tokio::time::sleep(delay).await;
                Ok((0..call.expected_records).map(user_record).collect())
            }
        }
    }
}

pub fn user_record(i: usize) -> Value {
    json!({
        "first_name": "Ada",
        "last_name": format!("Lovelace{i}"),
        "email": format!("ada.lovelace{i}@example.com"),
        "age": 36
    })
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        cleanup_interval_secs: 3600,
        seed_default_schemas: false,
        generation: GenerationConfig {
            synthesis_timeout: Duration::from_secs(5),
            ..GenerationConfig::default()
        },
        llm: LlmConfig {
            api_url: DEFAULT_LLM_API_URL.to_string(),
            api_key: None,
        },
    }
}

/// A running app plus handles on its stores.
pub struct TestApp {
    pub router: Router,
    pub registry: SchemaRegistry,
    pub batches: Arc<MemoryBatchStore>,
}

/// Build the application router over fresh in-memory stores.
pub fn build_test_app(reply: Reply) -> TestApp {
    build_test_app_with(reply, test_config())
}

/// [`build_test_app`] with an explicit configuration.
pub fn build_test_app_with(reply: Reply, config: ServerConfig) -> TestApp {
    let registry = SchemaRegistry::new(Arc::new(MemorySchemaStore::new()));
    let batches = Arc::new(MemoryBatchStore::new());

    let orchestrator = Arc::new(GenerationOrchestrator::new(
        registry.clone(),
        batches.clone(),
        Arc::new(ScriptedSynthesizer(reply)),
        StrategyTable::with_builtin_types(),
        config.generation.clone(),
    ));

    let state = AppState {
        pool: None,
        config: Arc::new(config.clone()),
        registry: registry.clone(),
        orchestrator,
    };

    TestApp {
        router: build_app_router(state, &config),
        registry,
        batches,
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn post_empty(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::POST, uri, None).await
}

pub async fn patch_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(body)).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None).await
}

/// Raw body bytes as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert the status, then return the JSON body.
pub async fn expect_json(response: Response<Body>, status: StatusCode) -> Value {
    assert_eq!(response.status(), status);
    body_json(response).await
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn user_schema_body() -> Value {
    json!({
        "name": "User",
        "type": "NAMED_TYPE",
        "definition": "User record",
        "description": "Application users",
        "business_rules": "- Age must be between 18 and 65"
    })
}

pub fn document_schema_body(name: &str) -> Value {
    json!({
        "name": name,
        "type": "JSON_SCHEMA",
        "definition": r#"{"type":"object","properties":{"sku":{"type":"string"}}}"#
    })
}
