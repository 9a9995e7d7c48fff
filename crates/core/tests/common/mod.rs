//! Shared fixtures for orchestrator tests: a scripted synthesizer, a batch
//! store that can be told to fail, and record builders for the built-in
//! types.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use tdm_core::batch::{BatchStatus, GenerationBatch};
use tdm_core::config::GenerationConfig;
use tdm_core::error::CoreError;
use tdm_core::orchestrator::GenerationOrchestrator;
use tdm_core::registry::SchemaRegistry;
use tdm_core::schema::{CreateSchemaDefinition, SchemaKind};
use tdm_core::store::{BatchStore, MemoryBatchStore, MemorySchemaStore};
use tdm_core::strategy::StrategyTable;
use tdm_core::synthesis::{ContentSynthesizer, SynthesisCall, SynthesisError};
use tdm_core::types::{BatchId, Timestamp};

// ---------------------------------------------------------------------------
// Synthesizer
// ---------------------------------------------------------------------------

/// What the stub answers with.
pub enum Script {
    /// `expected_records` records built by the given function.
    Records(fn(usize) -> serde_json::Value),
    /// Exactly these records, whatever was asked for.
    Fixed(Vec<serde_json::Value>),
    Fail(String),
    /// Never answers.
    Hang,
}

pub struct StubSynthesizer {
    script: Script,
    calls: Mutex<Vec<SynthesisCall>>,
}

impl StubSynthesizer {
    pub fn new(script: Script) -> Arc<Self> {
        Arc::new(Self {
            script,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<SynthesisCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContentSynthesizer for StubSynthesizer {
    async fn synthesize(
        &self,
        call: &SynthesisCall,
    ) -> Result<Vec<serde_json::Value>, SynthesisError> {
        self.calls.lock().unwrap().push(call.clone());
        match &self.script {
            Script::Records(make) => Ok((0..call.expected_records).map(make).collect()),
            Script::Fixed(records) => Ok(records.clone()),
            Script::Fail(msg) => Err(SynthesisError::Provider(msg.clone())),
            Script::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(Vec::new())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Batch store
// ---------------------------------------------------------------------------

/// [`MemoryBatchStore`] that logs every save attempt and can be told to
/// fail saves for a chosen status, or all saves.
#[derive(Default)]
pub struct FlakyBatchStore {
    pub inner: MemoryBatchStore,
    fail_status: Mutex<Option<BatchStatus>>,
    fail_all: AtomicBool,
    attempts: Mutex<Vec<BatchStatus>>,
}

impl FlakyBatchStore {
    /// Never fails; only records.
    pub fn recording() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Status of every batch passed to `save`, in call order.
    pub fn save_attempts(&self) -> Vec<BatchStatus> {
        self.attempts.lock().unwrap().clone()
    }

    pub fn failing_on(status: BatchStatus) -> Arc<Self> {
        let store = Self::default();
        *store.fail_status.lock().unwrap() = Some(status);
        Arc::new(store)
    }

    pub fn failing_always() -> Arc<Self> {
        let store = Self::default();
        store.fail_all.store(true, Ordering::SeqCst);
        Arc::new(store)
    }
}

#[async_trait]
impl BatchStore for FlakyBatchStore {
    async fn save(&self, batch: &GenerationBatch) -> Result<(), CoreError> {
        self.attempts.lock().unwrap().push(batch.status);
        let targeted = *self.fail_status.lock().unwrap() == Some(batch.status);
        if targeted || self.fail_all.load(Ordering::SeqCst) {
            return Err(CoreError::Storage("connection reset".to_string()));
        }
        self.inner.save(batch).await
    }

    async fn find_by_id(&self, id: BatchId) -> Result<Option<GenerationBatch>, CoreError> {
        self.inner.find_by_id(id).await
    }

    async fn find_by_status_and_expiry_before(
        &self,
        status: BatchStatus,
        cutoff: Timestamp,
    ) -> Result<Vec<GenerationBatch>, CoreError> {
        self.inner.find_by_status_and_expiry_before(status, cutoff).await
    }

    async fn find_by_schema_name(&self, name: &str) -> Result<Vec<GenerationBatch>, CoreError> {
        self.inner.find_by_schema_name(name).await
    }

    async fn delete_many(&self, ids: &[BatchId]) -> Result<u64, CoreError> {
        self.inner.delete_many(ids).await
    }
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

pub struct Harness {
    pub orchestrator: GenerationOrchestrator,
    pub registry: SchemaRegistry,
    pub batches: Arc<dyn BatchStore>,
    pub synthesizer: Arc<StubSynthesizer>,
}

pub fn harness(script: Script) -> Harness {
    harness_with(
        script,
        StrategyTable::with_builtin_types(),
        Arc::new(MemoryBatchStore::new()),
        GenerationConfig::default(),
    )
}

pub fn harness_with(
    script: Script,
    strategies: StrategyTable,
    batches: Arc<dyn BatchStore>,
    config: GenerationConfig,
) -> Harness {
    let registry = SchemaRegistry::new(Arc::new(MemorySchemaStore::new()));
    let synthesizer = StubSynthesizer::new(script);
    let orchestrator = GenerationOrchestrator::new(
        registry.clone(),
        Arc::clone(&batches),
        synthesizer.clone(),
        strategies,
        config,
    );
    Harness {
        orchestrator,
        registry,
        batches,
        synthesizer,
    }
}

pub async fn register_named(registry: &SchemaRegistry, name: &str) {
    registry
        .register(CreateSchemaDefinition::new(
            name,
            SchemaKind::NamedType,
            format!("{name} record"),
        ))
        .await
        .unwrap();
}

pub async fn register_document(registry: &SchemaRegistry, name: &str) {
    registry
        .register(CreateSchemaDefinition::new(
            name,
            SchemaKind::JsonSchema,
            r#"{"type":"object","properties":{"sku":{"type":"string"}}}"#,
        ))
        .await
        .unwrap();
}

pub fn past(now: Timestamp, days: i64) -> Timestamp {
    now - chrono::Duration::days(days)
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

pub fn order_record(i: usize) -> serde_json::Value {
    json!({
        "order_id": format!("ORD-20260101-{i:04}"),
        "customer_id": format!("CUST-{i}"),
        "order_date": "2026-01-01T10:00:00Z",
        "status": "SHIPPED",
        "items": [{
            "product_id": "P-1",
            "product_name": "Desk Lamp",
            "quantity": 2,
            "unit_price": 12.5,
            "total_price": 25.0
        }],
        "total_amount": 25.0,
        "payment_method": "PayPal"
    })
}

pub fn product_record(i: usize) -> serde_json::Value {
    json!({"sku": format!("SKU-{i}")})
}
