//! Schema registry: named schema definitions with unique names.

use std::sync::Arc;

use crate::error::CoreError;
use crate::schema::{CreateSchemaDefinition, SchemaDefinition};
use crate::store::SchemaStore;

/// Registers and resolves schema definitions.
///
/// Name uniqueness is enforced atomically by the underlying [`SchemaStore`],
/// so two concurrent registrations of one name yield exactly one success.
#[derive(Clone)]
pub struct SchemaRegistry {
    store: Arc<dyn SchemaStore>,
}

impl SchemaRegistry {
    pub fn new(store: Arc<dyn SchemaStore>) -> Self {
        Self { store }
    }

    /// Validate and persist a new definition.
    pub async fn register(
        &self,
        input: CreateSchemaDefinition,
    ) -> Result<SchemaDefinition, CoreError> {
        input.validate()?;
        let stored = self.store.insert(&input).await?;
        tracing::info!(
            schema_id = stored.id,
            schema_name = %stored.name,
            kind = %stored.kind,
            "Schema registered"
        );
        Ok(stored)
    }

    pub async fn get_by_name(&self, name: &str) -> Result<SchemaDefinition, CoreError> {
        self.store
            .find_by_name(name)
            .await?
            .ok_or_else(|| CoreError::SchemaNotFound(name.to_string()))
    }

    pub async fn list_all(&self) -> Result<Vec<SchemaDefinition>, CoreError> {
        self.store.list(false).await
    }

    pub async fn list_active(&self) -> Result<Vec<SchemaDefinition>, CoreError> {
        self.store.list(true).await
    }

    /// Administrative toggle of the active flag.
    pub async fn set_active(
        &self,
        name: &str,
        active: bool,
    ) -> Result<SchemaDefinition, CoreError> {
        let updated = self
            .store
            .set_active(name, active)
            .await?
            .ok_or_else(|| CoreError::SchemaNotFound(name.to_string()))?;
        tracing::info!(schema_name = %name, active, "Schema activation changed");
        Ok(updated)
    }
}
