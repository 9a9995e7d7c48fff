//! Persistence seams for schemas and batches.
//!
//! The Postgres implementations live in `tdm-db`. The in-memory stores here
//! back unit tests and database-less deployments.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::batch::{BatchStatus, GenerationBatch};
use crate::error::CoreError;
use crate::schema::{CreateSchemaDefinition, SchemaDefinition};
use crate::types::{BatchId, Timestamp};

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// Durable storage for schema definitions.
#[async_trait]
pub trait SchemaStore: Send + Sync {
    /// Insert a new schema. Fails with [`CoreError::AlreadyExists`] when the
    /// name is taken; the check and the insert are atomic.
    async fn insert(&self, input: &CreateSchemaDefinition) -> Result<SchemaDefinition, CoreError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<SchemaDefinition>, CoreError>;

    /// All schemas (or only active ones), ordered by name.
    async fn list(&self, active_only: bool) -> Result<Vec<SchemaDefinition>, CoreError>;

    /// Flip the active flag. Returns the updated row, or `None` if unknown.
    async fn set_active(
        &self,
        name: &str,
        active: bool,
    ) -> Result<Option<SchemaDefinition>, CoreError>;
}

/// Durable storage for generation batches.
#[async_trait]
pub trait BatchStore: Send + Sync {
    /// Insert or replace the batch with the same id.
    async fn save(&self, batch: &GenerationBatch) -> Result<(), CoreError>;

    async fn find_by_id(&self, id: BatchId) -> Result<Option<GenerationBatch>, CoreError>;

    /// Batches in `status` whose `expires_at` is strictly before `cutoff`.
    async fn find_by_status_and_expiry_before(
        &self,
        status: BatchStatus,
        cutoff: Timestamp,
    ) -> Result<Vec<GenerationBatch>, CoreError>;

    /// Batches of one schema, newest first.
    async fn find_by_schema_name(&self, name: &str) -> Result<Vec<GenerationBatch>, CoreError>;

    /// Delete the given batches. Returns the number of rows removed.
    async fn delete_many(&self, ids: &[BatchId]) -> Result<u64, CoreError>;
}

// ---------------------------------------------------------------------------
// In-memory schema store
// ---------------------------------------------------------------------------

/// [`SchemaStore`] over a map guarded by an async `RwLock`.
#[derive(Default)]
pub struct MemorySchemaStore {
    rows: RwLock<HashMap<String, SchemaDefinition>>,
    next_id: AtomicI64,
}

impl MemorySchemaStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SchemaStore for MemorySchemaStore {
    async fn insert(&self, input: &CreateSchemaDefinition) -> Result<SchemaDefinition, CoreError> {
        let mut rows = self.rows.write().await;
        if rows.contains_key(&input.name) {
            return Err(CoreError::AlreadyExists(input.name.clone()));
        }
        let now = Utc::now();
        let row = SchemaDefinition {
            id: self.next_id.fetch_add(1, Ordering::Relaxed) + 1,
            name: input.name.clone(),
            description: input.description.clone(),
            definition: input.definition.clone(),
            kind: input.kind,
            business_rules: input.business_rules.clone(),
            prompt_template: input.prompt_template.clone(),
            active: input.active,
            created_at: now,
            updated_at: now,
            created_by: input.created_by.clone(),
        };
        rows.insert(row.name.clone(), row.clone());
        Ok(row)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<SchemaDefinition>, CoreError> {
        Ok(self.rows.read().await.get(name).cloned())
    }

    async fn list(&self, active_only: bool) -> Result<Vec<SchemaDefinition>, CoreError> {
        let rows = self.rows.read().await;
        let mut out: Vec<SchemaDefinition> = rows
            .values()
            .filter(|s| !active_only || s.active)
            .cloned()
            .collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(out)
    }

    async fn set_active(
        &self,
        name: &str,
        active: bool,
    ) -> Result<Option<SchemaDefinition>, CoreError> {
        let mut rows = self.rows.write().await;
        Ok(rows.get_mut(name).map(|row| {
            row.active = active;
            row.updated_at = Utc::now();
            row.clone()
        }))
    }
}

// ---------------------------------------------------------------------------
// In-memory batch store
// ---------------------------------------------------------------------------

/// [`BatchStore`] over a map guarded by an async `RwLock`.
#[derive(Default)]
pub struct MemoryBatchStore {
    rows: RwLock<HashMap<BatchId, GenerationBatch>>,
}

impl MemoryBatchStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored batches.
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

#[async_trait]
impl BatchStore for MemoryBatchStore {
    async fn save(&self, batch: &GenerationBatch) -> Result<(), CoreError> {
        self.rows.write().await.insert(batch.id, batch.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: BatchId) -> Result<Option<GenerationBatch>, CoreError> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn find_by_status_and_expiry_before(
        &self,
        status: BatchStatus,
        cutoff: Timestamp,
    ) -> Result<Vec<GenerationBatch>, CoreError> {
        Ok(self
            .rows
            .read()
            .await
            .values()
            .filter(|b| b.status == status && b.expires_at < cutoff)
            .cloned()
            .collect())
    }

    async fn find_by_schema_name(&self, name: &str) -> Result<Vec<GenerationBatch>, CoreError> {
        let rows = self.rows.read().await;
        let mut out: Vec<GenerationBatch> = rows
            .values()
            .filter(|b| b.schema_name == name)
            .cloned()
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(out)
    }

    async fn delete_many(&self, ids: &[BatchId]) -> Result<u64, CoreError> {
        let mut rows = self.rows.write().await;
        Ok(ids.iter().filter(|id| rows.remove(id).is_some()).count() as u64)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
