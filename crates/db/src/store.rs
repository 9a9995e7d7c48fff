//! [`SchemaStore`] and [`BatchStore`] backed by PostgreSQL.

use async_trait::async_trait;
use tdm_core::batch::{BatchStatus, GenerationBatch};
use tdm_core::error::CoreError;
use tdm_core::schema::{CreateSchemaDefinition, SchemaDefinition};
use tdm_core::store::{BatchStore, SchemaStore};
use tdm_core::types::{BatchId, Timestamp};

use crate::error::{storage, unique_violation};
use crate::repositories::{DataSchemaRepo, GenerationBatchRepo};
use crate::DbPool;

// ---------------------------------------------------------------------------
// Schemas
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct PgSchemaStore {
    pool: DbPool,
}

impl PgSchemaStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SchemaStore for PgSchemaStore {
    async fn insert(&self, input: &CreateSchemaDefinition) -> Result<SchemaDefinition, CoreError> {
        match DataSchemaRepo::create(&self.pool, input).await {
            Ok(row) => row.try_into(),
            Err(e) if unique_violation(&e).is_some() => {
                Err(CoreError::AlreadyExists(input.name.clone()))
            }
            Err(e) => Err(storage(e)),
        }
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<SchemaDefinition>, CoreError> {
        DataSchemaRepo::find_by_name(&self.pool, name)
            .await
            .map_err(storage)?
            .map(SchemaDefinition::try_from)
            .transpose()
    }

    async fn list(&self, active_only: bool) -> Result<Vec<SchemaDefinition>, CoreError> {
        DataSchemaRepo::list(&self.pool, active_only)
            .await
            .map_err(storage)?
            .into_iter()
            .map(SchemaDefinition::try_from)
            .collect()
    }

    async fn set_active(
        &self,
        name: &str,
        active: bool,
    ) -> Result<Option<SchemaDefinition>, CoreError> {
        DataSchemaRepo::set_active(&self.pool, name, active)
            .await
            .map_err(storage)?
            .map(SchemaDefinition::try_from)
            .transpose()
    }
}

// ---------------------------------------------------------------------------
// Batches
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct PgBatchStore {
    pool: DbPool,
}

impl PgBatchStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BatchStore for PgBatchStore {
    async fn save(&self, batch: &GenerationBatch) -> Result<(), CoreError> {
        GenerationBatchRepo::upsert(&self.pool, batch)
            .await
            .map_err(storage)
    }

    async fn find_by_id(&self, id: BatchId) -> Result<Option<GenerationBatch>, CoreError> {
        GenerationBatchRepo::find_by_id(&self.pool, id)
            .await
            .map_err(storage)?
            .map(GenerationBatch::try_from)
            .transpose()
    }

    async fn find_by_status_and_expiry_before(
        &self,
        status: BatchStatus,
        cutoff: Timestamp,
    ) -> Result<Vec<GenerationBatch>, CoreError> {
        GenerationBatchRepo::find_by_status_and_expiry_before(&self.pool, status.id(), cutoff)
            .await
            .map_err(storage)?
            .into_iter()
            .map(GenerationBatch::try_from)
            .collect()
    }

    async fn find_by_schema_name(&self, name: &str) -> Result<Vec<GenerationBatch>, CoreError> {
        GenerationBatchRepo::list_by_schema_name(&self.pool, name)
            .await
            .map_err(storage)?
            .into_iter()
            .map(GenerationBatch::try_from)
            .collect()
    }

    async fn delete_many(&self, ids: &[BatchId]) -> Result<u64, CoreError> {
        GenerationBatchRepo::delete_many(&self.pool, ids)
            .await
            .map_err(storage)
    }
}
