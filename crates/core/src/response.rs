//! Response shape shared by the synchronous and fetch paths.

use serde::Serialize;

use crate::batch::{BatchStatus, GenerationBatch};
use crate::request::OutputFormat;
use crate::types::{BatchId, Timestamp};

pub const MESSAGE_GENERATED: &str = "Data generated successfully";
pub const MESSAGE_FAILED: &str = "Data generation failed";
pub const MESSAGE_RETRIEVED: &str = "Batch retrieved successfully";

/// Outcome of a `generate` or `fetch` call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationResponse {
    pub batch_id: BatchId,
    pub schema_name: String,
    pub record_count: i32,
    pub status: BatchStatus,
    pub generated_at: Timestamp,
    pub expires_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<serde_json::Value>>,
    pub format: OutputFormat,
    pub model: Option<String>,
    pub temperature: Option<f64>,
    pub prompt_used: Option<String>,
    pub execution_time_ms: Option<u64>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl GenerationResponse {
    /// Build a response from a terminal batch.
    ///
    /// `data` is only populated for COMPLETED batches.
    pub fn from_batch(
        batch: &GenerationBatch,
        format: OutputFormat,
        execution_time_ms: Option<u64>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            batch_id: batch.id,
            schema_name: batch.schema_name.clone(),
            record_count: batch.record_count,
            status: batch.status,
            generated_at: batch.created_at,
            expires_at: Some(batch.expires_at),
            data: batch.records().cloned(),
            format,
            model: batch.model.clone(),
            temperature: batch.temperature,
            prompt_used: batch.prompt_used.clone(),
            execution_time_ms,
            message: message.into(),
            error_message: batch.error_message.clone(),
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == BatchStatus::Completed
    }
}

/// Payload-free view of a batch for history listings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    pub batch_id: BatchId,
    pub schema_name: String,
    pub record_count: i32,
    pub status: BatchStatus,
    pub generated_at: Timestamp,
    pub expires_at: Timestamp,
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl From<&GenerationBatch> for BatchSummary {
    fn from(batch: &GenerationBatch) -> Self {
        Self {
            batch_id: batch.id,
            schema_name: batch.schema_name.clone(),
            record_count: batch.record_count,
            status: batch.status,
            generated_at: batch.created_at,
            expires_at: batch.expires_at,
            model: batch.model.clone(),
            error_message: batch.error_message.clone(),
        }
    }
}
