/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Opaque batch identifier (random v4 UUID, rendered as text on the wire).
pub type BatchId = uuid::Uuid;
