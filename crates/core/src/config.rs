//! Generation policy handed to the orchestrator.

use std::time::Duration;

/// Default upper bound on records per request.
pub const DEFAULT_MAX_GENERATION_SIZE: i64 = 1_000;

/// Default retention window applied at batch creation.
pub const DEFAULT_RETENTION_DAYS: i64 = 30;

pub const DEFAULT_MODEL: &str = "gpt-4";

pub const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Default orchestrator-side cap on a single synthesis call.
pub const DEFAULT_SYNTHESIS_TIMEOUT_SECS: u64 = 90;

/// Recorded as `requested_by` on every batch.
pub const DEFAULT_REQUESTED_BY: &str = "system";

/// Policy values for [`crate::orchestrator::GenerationOrchestrator`].
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    pub max_generation_size: i64,
    pub retention: chrono::Duration,
    pub default_model: String,
    pub default_temperature: f64,
    pub synthesis_timeout: Duration,
    pub requested_by: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_generation_size: DEFAULT_MAX_GENERATION_SIZE,
            retention: chrono::Duration::days(DEFAULT_RETENTION_DAYS),
            default_model: DEFAULT_MODEL.to_string(),
            default_temperature: DEFAULT_TEMPERATURE,
            synthesis_timeout: Duration::from_secs(DEFAULT_SYNTHESIS_TIMEOUT_SECS),
            requested_by: DEFAULT_REQUESTED_BY.to_string(),
        }
    }
}
