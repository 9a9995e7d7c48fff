//! Generation batches and their status state machine.
//!
//! ```text
//! PENDING -> IN_PROGRESS -> COMPLETED
//!                        \-> FAILED
//! ```
//!
//! COMPLETED and FAILED are terminal. EXPIRED is a valid stored status but
//! no transition leads to it: the sweeper deletes expired batches outright.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{BatchId, DbId, Timestamp};

/// Payload stored for batches that carry no records.
pub fn empty_payload() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Lifecycle status of a [`GenerationBatch`].
///
/// The numeric ids must match the seed rows of `batch_statuses`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BatchStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
    Expired,
}

impl BatchStatus {
    /// Lookup-table id of this status.
    pub fn id(self) -> i16 {
        match self {
            BatchStatus::Pending => 1,
            BatchStatus::InProgress => 2,
            BatchStatus::Completed => 3,
            BatchStatus::Failed => 4,
            BatchStatus::Expired => 5,
        }
    }

    /// Inverse of [`BatchStatus::id`].
    pub fn from_id(id: i16) -> Result<Self, CoreError> {
        match id {
            1 => Ok(BatchStatus::Pending),
            2 => Ok(BatchStatus::InProgress),
            3 => Ok(BatchStatus::Completed),
            4 => Ok(BatchStatus::Failed),
            5 => Ok(BatchStatus::Expired),
            other => Err(CoreError::Internal(format!("Unknown batch status id {other}"))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BatchStatus::Pending => "PENDING",
            BatchStatus::InProgress => "IN_PROGRESS",
            BatchStatus::Completed => "COMPLETED",
            BatchStatus::Failed => "FAILED",
            BatchStatus::Expired => "EXPIRED",
        }
    }

    /// Whether `self -> next` is a legal transition.
    pub fn can_transition_to(self, next: BatchStatus) -> bool {
        matches!(
            (self, next),
            (BatchStatus::Pending, BatchStatus::InProgress)
                | (BatchStatus::InProgress, BatchStatus::Completed)
                | (BatchStatus::InProgress, BatchStatus::Failed)
        )
    }
}

impl fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// One invocation's worth of generated records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationBatch {
    pub id: BatchId,
    pub schema_id: DbId,
    pub schema_name: String,
    /// JSON array of records when COMPLETED, an empty object otherwise.
    pub payload: serde_json::Value,
    pub record_count: i32,
    pub status: BatchStatus,
    pub prompt_used: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f64>,
    pub error_message: Option<String>,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
    pub requested_by: Option<String>,
}

impl GenerationBatch {
    /// A fresh PENDING batch with an empty payload.
    pub fn new(
        id: BatchId,
        schema_id: DbId,
        schema_name: impl Into<String>,
        created_at: Timestamp,
        expires_at: Timestamp,
    ) -> Self {
        Self {
            id,
            schema_id,
            schema_name: schema_name.into(),
            payload: empty_payload(),
            record_count: 0,
            status: BatchStatus::Pending,
            prompt_used: None,
            model: None,
            temperature: None,
            error_message: None,
            created_at,
            expires_at,
            requested_by: None,
        }
    }

    fn transition(&mut self, next: BatchStatus) -> Result<(), CoreError> {
        if !self.status.can_transition_to(next) {
            return Err(CoreError::Internal(format!(
                "Illegal batch transition {} -> {next} for batch {}",
                self.status, self.id
            )));
        }
        self.status = next;
        Ok(())
    }

    /// PENDING -> IN_PROGRESS.
    pub fn start(&mut self) -> Result<(), CoreError> {
        self.transition(BatchStatus::InProgress)
    }

    /// IN_PROGRESS -> COMPLETED with the given records.
    ///
    /// Rejects an empty record list so a COMPLETED batch always has a payload.
    pub fn complete(&mut self, records: Vec<serde_json::Value>) -> Result<(), CoreError> {
        if records.is_empty() {
            return Err(CoreError::Internal(format!(
                "Batch {} cannot complete without records",
                self.id
            )));
        }
        let count = i32::try_from(records.len()).map_err(|_| {
            CoreError::Internal(format!("Batch {} record count overflows", self.id))
        })?;
        self.transition(BatchStatus::Completed)?;
        self.record_count = count;
        self.payload = serde_json::Value::Array(records);
        self.error_message = None;
        Ok(())
    }

    /// IN_PROGRESS -> FAILED. Clears any payload.
    pub fn fail(&mut self, message: impl Into<String>) -> Result<(), CoreError> {
        let mut message = message.into();
        if message.trim().is_empty() {
            message = "Unknown generation error".to_string();
        }
        self.transition(BatchStatus::Failed)?;
        self.record_count = 0;
        self.payload = empty_payload();
        self.error_message = Some(message);
        Ok(())
    }

    /// Records of a COMPLETED batch, or `None` for any other status.
    pub fn records(&self) -> Option<&Vec<serde_json::Value>> {
        match (self.status, &self.payload) {
            (BatchStatus::Completed, serde_json::Value::Array(items)) => Some(items),
            _ => None,
        }
    }

    /// Whether the sweeper may remove this batch at `now`.
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        self.status == BatchStatus::Completed && self.expires_at < now
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{Duration, Utc};
    use serde_json::json;

    use super::*;

    const ALL: [BatchStatus; 5] = [
        BatchStatus::Pending,
        BatchStatus::InProgress,
        BatchStatus::Completed,
        BatchStatus::Failed,
        BatchStatus::Expired,
    ];

    fn pending() -> GenerationBatch {
        let now = Utc::now();
        GenerationBatch::new(uuid::Uuid::new_v4(), 1, "Order", now, now + Duration::days(30))
    }

    #[test]
    fn status_ids_round_trip() {
        for status in ALL {
            assert_eq!(BatchStatus::from_id(status.id()).unwrap(), status);
        }
        assert!(BatchStatus::from_id(0).is_err());
    }

    #[test]
    fn status_ids_are_sequential() {
        let ids: Vec<i16> = ALL.iter().map(|s| s.id()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn nothing_leaves_a_terminal_status() {
        for next in ALL {
            assert!(!BatchStatus::Completed.can_transition_to(next));
            assert!(!BatchStatus::Failed.can_transition_to(next));
            assert!(!BatchStatus::Expired.can_transition_to(next));
        }
    }

    #[test]
    fn pending_cannot_skip_in_progress() {
        assert!(!BatchStatus::Pending.can_transition_to(BatchStatus::Completed));
        assert!(!BatchStatus::Pending.can_transition_to(BatchStatus::Failed));
    }

    #[test]
    fn serializes_as_screaming_snake_case() {
        assert_eq!(
            serde_json::to_value(BatchStatus::InProgress).unwrap(),
            json!("IN_PROGRESS")
        );
    }

    #[test]
    fn complete_sets_payload_and_count() {
        let mut batch = pending();
        batch.start().unwrap();
        batch.complete(vec![json!({"a": 1}), json!({"a": 2})]).unwrap();
        assert_eq!(batch.status, BatchStatus::Completed);
        assert_eq!(batch.record_count, 2);
        assert_eq!(batch.records().unwrap().len(), 2);
    }

    #[test]
    fn complete_without_records_is_rejected() {
        let mut batch = pending();
        batch.start().unwrap();
        assert_matches!(batch.complete(vec![]), Err(CoreError::Internal(_)));
        assert_eq!(batch.status, BatchStatus::InProgress);
    }

    #[test]
    fn fail_clears_payload_and_keeps_message() {
        let mut batch = pending();
        batch.start().unwrap();
        batch.fail("model unavailable").unwrap();
        assert_eq!(batch.status, BatchStatus::Failed);
        assert_eq!(batch.record_count, 0);
        assert_eq!(batch.payload, empty_payload());
        assert_eq!(batch.error_message.as_deref(), Some("model unavailable"));
        assert!(batch.records().is_none());
    }

    #[test]
    fn fail_with_blank_message_still_records_one() {
        let mut batch = pending();
        batch.start().unwrap();
        batch.fail("").unwrap();
        assert!(!batch.error_message.unwrap().is_empty());
    }

    #[test]
    fn completing_twice_is_illegal() {
        let mut batch = pending();
        batch.start().unwrap();
        batch.complete(vec![json!({})]).unwrap();
        assert!(batch.complete(vec![json!({})]).is_err());
        assert!(batch.fail("late").is_err());
    }

    #[test]
    fn only_completed_batches_past_expiry_are_expired() {
        let mut batch = pending();
        let later = batch.expires_at + Duration::seconds(1);
        assert!(!batch.is_expired_at(later));
        batch.start().unwrap();
        batch.complete(vec![json!({})]).unwrap();
        assert!(batch.is_expired_at(later));
        assert!(!batch.is_expired_at(batch.expires_at));
    }
}
