//! The generation state machine.
//!
//! `generate` resolves the schema, renders the instruction, makes exactly
//! one synthesizer call and turns the outcome into a terminal batch.
//! Validation and lookup failures are returned as errors before a batch
//! exists; synthesis failures become a FAILED batch carried in an `Ok`
//! response.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;

use crate::batch::{BatchStatus, GenerationBatch};
use crate::config::GenerationConfig;
use crate::error::CoreError;
use crate::prompt::PromptBuilder;
use crate::registry::SchemaRegistry;
use crate::request::{GenerationRequest, OutputFormat};
use crate::response::{
    BatchSummary, GenerationResponse, MESSAGE_FAILED, MESSAGE_GENERATED, MESSAGE_RETRIEVED,
};
use crate::store::BatchStore;
use crate::strategy::{GenerationStrategy, StrategyTable};
use crate::synthesis::{ContentSynthesizer, SynthesisCall, SynthesisError};
use crate::types::{BatchId, Timestamp};

pub struct GenerationOrchestrator {
    registry: SchemaRegistry,
    batches: Arc<dyn BatchStore>,
    synthesizer: Arc<dyn ContentSynthesizer>,
    strategies: StrategyTable,
    config: GenerationConfig,
}

impl GenerationOrchestrator {
    pub fn new(
        registry: SchemaRegistry,
        batches: Arc<dyn BatchStore>,
        synthesizer: Arc<dyn ContentSynthesizer>,
        strategies: StrategyTable,
        config: GenerationConfig,
    ) -> Self {
        Self {
            registry,
            batches,
            synthesizer,
            strategies,
            config,
        }
    }

    // -----------------------------------------------------------------------
    // Generate
    // -----------------------------------------------------------------------

    /// Generate `request.record_count` records for the named schema.
    ///
    /// Returns `Err` for validation, lookup, dispatch, and pre-synthesis
    /// storage failures. Every outcome after the synthesizer is invoked is an
    /// `Ok` response whose status is COMPLETED or FAILED.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, CoreError> {
        let started = Instant::now();
        request.validate(self.config.max_generation_size)?;

        let schema = self.registry.get_by_name(&request.schema_name).await?;
        if !schema.active {
            return Err(CoreError::SchemaInactive(schema.name));
        }
        let strategy = self.strategies.dispatch(&schema)?;

        let model = request
            .model
            .clone()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| self.config.default_model.clone());
        let temperature = request.temperature.unwrap_or(self.config.default_temperature);
        let instruction = PromptBuilder::build_instruction(&schema, request, &strategy);

        let now = Utc::now();
        let mut batch = GenerationBatch::new(
            uuid::Uuid::new_v4(),
            schema.id,
            schema.name.clone(),
            now,
            now + self.config.retention,
        );
        batch.model = Some(model.clone());
        batch.temperature = Some(temperature);
        batch.prompt_used = Some(instruction.clone());
        batch.requested_by = Some(self.config.requested_by.clone());
        batch.start()?;

        tracing::info!(
            batch_id = %batch.id,
            schema_name = %schema.name,
            record_count = request.record_count,
            strategy = ?strategy,
            persist = request.persist_data,
            "Generation started"
        );

        if request.persist_data {
            self.batches.save(&batch).await?;
        }

        let call = SynthesisCall {
            instruction,
            shape: strategy.shape_hint(&schema),
            model,
            temperature,
            // validate() bounds the count to a small positive range.
            expected_records: request.record_count as usize,
        };

        let batch = match self.synthesize(&call, &strategy).await {
            Ok(records) => self.finish_completed(batch, records, request.persist_data).await?,
            Err(err) => {
                tracing::warn!(batch_id = %batch.id, error = %err, "Generation failed");
                self.finish_failed(batch, err.to_string(), request.persist_data)
                    .await?
            }
        };

        let elapsed = elapsed_ms(started);
        let message = match batch.status {
            BatchStatus::Completed => MESSAGE_GENERATED,
            _ => MESSAGE_FAILED,
        };
        tracing::info!(
            batch_id = %batch.id,
            status = %batch.status,
            record_count = batch.record_count,
            execution_time_ms = elapsed,
            "Generation finished"
        );
        Ok(GenerationResponse::from_batch(
            &batch,
            request.format,
            Some(elapsed),
            message,
        ))
    }

    /// One bounded synthesizer call, decoded and count-checked.
    async fn synthesize(
        &self,
        call: &SynthesisCall,
        strategy: &GenerationStrategy,
    ) -> Result<Vec<serde_json::Value>, SynthesisError> {
        let timeout = self.config.synthesis_timeout;
        let raw = tokio::time::timeout(timeout, self.synthesizer.synthesize(call))
            .await
            .map_err(|_| SynthesisError::Timeout(timeout))??;

        let records = strategy.decode(raw)?;
        if records.len() != call.expected_records {
            return Err(SynthesisError::CountMismatch {
                expected: call.expected_records,
                actual: records.len(),
            });
        }
        Ok(records)
    }

    async fn finish_completed(
        &self,
        batch: GenerationBatch,
        records: Vec<serde_json::Value>,
        persist: bool,
    ) -> Result<GenerationBatch, CoreError> {
        let mut completed = batch.clone();
        completed.complete(records)?;
        if !persist {
            return Ok(completed);
        }

        match self.batches.save(&completed).await {
            Ok(()) => {
                tracing::debug!(batch_id = %completed.id, "Completed batch persisted");
                Ok(completed)
            }
            Err(e) => {
                tracing::error!(batch_id = %batch.id, error = %e, "Failed to persist completed batch");
                self.finish_failed(batch, format!("failed to persist batch: {e}"), true)
                    .await
            }
        }
    }

    async fn finish_failed(
        &self,
        mut batch: GenerationBatch,
        message: String,
        persist: bool,
    ) -> Result<GenerationBatch, CoreError> {
        batch.fail(message)?;
        if persist {
            if let Err(e) = self.batches.save(&batch).await {
                tracing::error!(batch_id = %batch.id, error = %e, "Failed to persist error batch");
            }
        }
        Ok(batch)
    }

    // -----------------------------------------------------------------------
    // Retrieval
    // -----------------------------------------------------------------------

    /// Load a persisted batch in the same response shape as `generate`.
    pub async fn fetch(&self, batch_id: BatchId) -> Result<GenerationResponse, CoreError> {
        let batch = self
            .batches
            .find_by_id(batch_id)
            .await?
            .ok_or_else(|| CoreError::BatchNotFound(batch_id.to_string()))?;

        if batch.status == BatchStatus::Completed && batch.records().is_none() {
            return Err(CoreError::Internal(format!(
                "Stored payload of batch {batch_id} is not a record array"
            )));
        }
        Ok(GenerationResponse::from_batch(
            &batch,
            OutputFormat::Json,
            None,
            MESSAGE_RETRIEVED,
        ))
    }

    /// Persisted batches of a registered schema, newest first.
    pub async fn batches_for_schema(&self, name: &str) -> Result<Vec<BatchSummary>, CoreError> {
        let schema = self.registry.get_by_name(name).await?;
        let batches = self.batches.find_by_schema_name(&schema.name).await?;
        Ok(batches.iter().map(BatchSummary::from).collect())
    }

    // -----------------------------------------------------------------------
    // Expiration
    // -----------------------------------------------------------------------

    /// Delete COMPLETED batches whose expiry is before `now`.
    ///
    /// FAILED batches are kept for diagnostics regardless of expiry.
    pub async fn cleanup_expired(&self, now: Timestamp) -> Result<u64, CoreError> {
        let expired = self
            .batches
            .find_by_status_and_expiry_before(BatchStatus::Completed, now)
            .await?;
        let ids: Vec<BatchId> = expired
            .iter()
            .filter(|b| b.is_expired_at(now))
            .map(|b| b.id)
            .collect();
        if ids.is_empty() {
            return Ok(0);
        }
        let removed = self.batches.delete_many(&ids).await?;
        tracing::info!(removed, cutoff = %now, "Expired batches removed");
        Ok(removed)
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
