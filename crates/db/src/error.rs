//! Mapping of sqlx errors onto the domain taxonomy.

use tdm_core::error::CoreError;

/// PostgreSQL SQLSTATE for unique violations.
const UNIQUE_VIOLATION: &str = "23505";

/// Name of the `uq_` constraint a unique violation tripped, if any.
pub fn unique_violation(err: &sqlx::Error) -> Option<&str> {
    match err {
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) => {
            db_err.constraint().filter(|c| c.starts_with("uq_"))
        }
        _ => None,
    }
}

/// Wrap any sqlx error as [`CoreError::Storage`], logging it once here.
pub fn storage(err: sqlx::Error) -> CoreError {
    tracing::error!(error = %err, "Database error");
    CoreError::Storage(err.to_string())
}
