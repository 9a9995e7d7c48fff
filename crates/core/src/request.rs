//! Generation request value object.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Hard upper bound on records per request, whatever the configuration says.
pub const ABSOLUTE_MAX_RECORDS: i64 = 10_000;

/// Accepted sampling temperature range (inclusive).
pub const TEMPERATURE_RANGE: (f64, f64) = (0.0, 2.0);

/// Output encoding tag echoed back in the response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
    Sql,
}

fn default_persist() -> bool {
    true
}

/// A request for `record_count` synthetic records of a registered schema.
///
/// `additional_constraints` keeps the caller's insertion order; each entry
/// becomes one `- key: value` rule line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub schema_name: String,
    pub record_count: i64,
    #[serde(default)]
    pub custom_prompt: Option<String>,
    #[serde(default)]
    pub additional_constraints: IndexMap<String, serde_json::Value>,
    #[serde(default = "default_persist")]
    pub persist_data: bool,
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default, alias = "ai_model")]
    pub model: Option<String>,
}

impl GenerationRequest {
    /// A persisted JSON request with no overrides.
    pub fn new(schema_name: impl Into<String>, record_count: i64) -> Self {
        Self {
            schema_name: schema_name.into(),
            record_count,
            custom_prompt: None,
            additional_constraints: IndexMap::new(),
            persist_data: true,
            format: OutputFormat::Json,
            temperature: None,
            model: None,
        }
    }

    /// The quick-generate shape: same as [`GenerationRequest::new`] but not persisted.
    pub fn quick(schema_name: impl Into<String>, record_count: i64) -> Self {
        Self {
            persist_data: false,
            ..Self::new(schema_name, record_count)
        }
    }

    /// The caller's replacement instruction, if it has any content.
    pub fn custom_prompt(&self) -> Option<&str> {
        self.custom_prompt
            .as_deref()
            .filter(|p| !p.trim().is_empty())
    }

    /// Validate the request against the configured record ceiling.
    pub fn validate(&self, max_records: i64) -> Result<(), CoreError> {
        if self.schema_name.trim().is_empty() {
            return Err(CoreError::Validation(
                "Schema name is required".to_string(),
            ));
        }
        let max_records = max_records.min(ABSOLUTE_MAX_RECORDS);
        if self.record_count < 1 {
            return Err(CoreError::Validation(
                "Must generate at least 1 record".to_string(),
            ));
        }
        if self.record_count > max_records {
            return Err(CoreError::Validation(format!(
                "Cannot generate more than {max_records} records at once"
            )));
        }
        if let Some(t) = self.temperature {
            let (lo, hi) = TEMPERATURE_RANGE;
            if !(lo..=hi).contains(&t) {
                return Err(CoreError::Validation(format!(
                    "Temperature must be between {lo} and {hi} (got {t})"
                )));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
