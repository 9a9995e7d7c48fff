//! The generative capability boundary.
//!
//! The orchestrator hands a [`ContentSynthesizer`] one instruction plus a
//! [`ShapeHint`] and gets decoded JSON records back. Provider selection,
//! network retries and prompt submission all live behind this trait.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

/// Target shape the synthesizer is asked to produce.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShapeHint {
    /// Records of a registered named type; `format` is its JSON schema.
    Typed { type_name: String, format: String },
    /// Open-ended records described by a caller-supplied JSON schema.
    Document { schema: String },
}

/// A single synthesis invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SynthesisCall {
    pub instruction: String,
    pub shape: ShapeHint,
    pub model: String,
    pub temperature: f64,
    pub expected_records: usize,
}

/// Why a synthesis call produced no usable records.
#[derive(Debug, thiserror::Error)]
pub enum SynthesisError {
    /// The provider rejected the call or could not be reached.
    #[error("provider error: {0}")]
    Provider(String),

    /// The call did not finish in time.
    #[error("synthesis timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// The provider answered but the output could not be decoded.
    #[error("malformed output: {0}")]
    Malformed(String),

    /// The decoded output did not contain the demanded number of records.
    #[error("expected {expected} records but received {actual}")]
    CountMismatch { expected: usize, actual: usize },
}

/// Capability: turn an instruction into structured records, or fail.
#[async_trait]
pub trait ContentSynthesizer: Send + Sync {
    /// Submit `call` and return the decoded records.
    async fn synthesize(
        &self,
        call: &SynthesisCall,
    ) -> Result<Vec<serde_json::Value>, SynthesisError>;
}
