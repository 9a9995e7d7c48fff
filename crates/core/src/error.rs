/// Domain error taxonomy shared by every layer.
///
/// Validation and lookup failures short-circuit before a batch exists.
/// Synthesis failures never surface here: they are carried by
/// [`crate::synthesis::SynthesisError`] into a FAILED batch.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Schema not found: {0}")]
    SchemaNotFound(String),

    #[error("Schema is not active: {0}")]
    SchemaInactive(String),

    #[error("Schema with name '{0}' already exists")]
    AlreadyExists(String),

    #[error("Unsupported: {0}")]
    Unsupported(String),

    #[error("Batch not found: {0}")]
    BatchNotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
