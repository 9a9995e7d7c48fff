//! Repository for the `generation_batches` table.
//!
//! Reads join `data_schemas` so rows carry the schema name.

use sqlx::types::Json;
use sqlx::PgPool;
use tdm_core::batch::GenerationBatch;
use tdm_core::types::{BatchId, Timestamp};

use crate::models::generation_batch::GenerationBatchRow;

/// Column list for batch SELECT queries, qualified for the join.
const COLUMNS: &str = "\
    b.id, b.schema_id, s.name AS schema_name, b.payload, b.record_count, \
    b.status_id, b.prompt_used, b.model, b.temperature, b.error_message, \
    b.created_at, b.expires_at, b.requested_by";

const FROM_JOINED: &str = "generation_batches b JOIN data_schemas s ON s.id = b.schema_id";

pub struct GenerationBatchRepo;

impl GenerationBatchRepo {
    /// Insert the batch, or overwrite every mutable column if it exists.
    ///
    /// A single statement, so readers never observe a partial write.
    pub async fn upsert(pool: &PgPool, batch: &GenerationBatch) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO generation_batches \
                (id, schema_id, payload, record_count, status_id, prompt_used, \
                 model, temperature, error_message, created_at, expires_at, requested_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             ON CONFLICT (id) DO UPDATE SET \
                payload = EXCLUDED.payload, \
                record_count = EXCLUDED.record_count, \
                status_id = EXCLUDED.status_id, \
                prompt_used = EXCLUDED.prompt_used, \
                model = EXCLUDED.model, \
                temperature = EXCLUDED.temperature, \
                error_message = EXCLUDED.error_message, \
                expires_at = EXCLUDED.expires_at",
        )
        .bind(batch.id)
        .bind(batch.schema_id)
        .bind(Json(&batch.payload))
        .bind(batch.record_count)
        .bind(batch.status.id())
        .bind(&batch.prompt_used)
        .bind(&batch.model)
        .bind(batch.temperature)
        .bind(&batch.error_message)
        .bind(batch.created_at)
        .bind(batch.expires_at)
        .bind(&batch.requested_by)
        .execute(pool)
        .await?;
        Ok(())
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: BatchId,
    ) -> Result<Option<GenerationBatchRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM {FROM_JOINED} WHERE b.id = $1");
        sqlx::query_as::<_, GenerationBatchRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Batches in the given status whose expiry is strictly before `cutoff`.
    pub async fn find_by_status_and_expiry_before(
        pool: &PgPool,
        status_id: i16,
        cutoff: Timestamp,
    ) -> Result<Vec<GenerationBatchRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {FROM_JOINED} \
             WHERE b.status_id = $1 AND b.expires_at < $2 \
             ORDER BY b.expires_at"
        );
        sqlx::query_as::<_, GenerationBatchRow>(&query)
            .bind(status_id)
            .bind(cutoff)
            .fetch_all(pool)
            .await
    }

    /// All batches of one schema, newest first.
    pub async fn list_by_schema_name(
        pool: &PgPool,
        name: &str,
    ) -> Result<Vec<GenerationBatchRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {FROM_JOINED} \
             WHERE s.name = $1 \
             ORDER BY b.created_at DESC"
        );
        sqlx::query_as::<_, GenerationBatchRow>(&query)
            .bind(name)
            .fetch_all(pool)
            .await
    }

    /// Delete the given batches. Returns the number of rows removed.
    pub async fn delete_many(pool: &PgPool, ids: &[BatchId]) -> Result<u64, sqlx::Error> {
        if ids.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query("DELETE FROM generation_batches WHERE id = ANY($1)")
            .bind(ids)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
