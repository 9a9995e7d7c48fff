//! Row model for `generation_batches`, joined with the owning schema's name.

use sqlx::types::Json;
use sqlx::FromRow;
use tdm_core::batch::{BatchStatus, GenerationBatch};
use tdm_core::error::CoreError;
use tdm_core::types::{BatchId, DbId, Timestamp};

#[derive(Debug, Clone, FromRow)]
pub struct GenerationBatchRow {
    pub id: BatchId,
    pub schema_id: DbId,
    pub schema_name: String,
    pub payload: Json<serde_json::Value>,
    pub record_count: i32,
    pub status_id: i16,
    pub prompt_used: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f64>,
    pub error_message: Option<String>,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
    pub requested_by: Option<String>,
}

impl TryFrom<GenerationBatchRow> for GenerationBatch {
    type Error = CoreError;

    fn try_from(row: GenerationBatchRow) -> Result<Self, Self::Error> {
        Ok(GenerationBatch {
            id: row.id,
            schema_id: row.schema_id,
            schema_name: row.schema_name,
            payload: row.payload.0,
            record_count: row.record_count,
            status: BatchStatus::from_id(row.status_id)?,
            prompt_used: row.prompt_used,
            model: row.model,
            temperature: row.temperature,
            error_message: row.error_message,
            created_at: row.created_at,
            expires_at: row.expires_at,
            requested_by: row.requested_by,
        })
    }
}
