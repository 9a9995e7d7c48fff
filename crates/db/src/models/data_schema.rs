//! Row model for the `data_schemas` table.

use sqlx::FromRow;
use tdm_core::error::CoreError;
use tdm_core::schema::{SchemaDefinition, SchemaKind};
use tdm_core::types::{DbId, Timestamp};

/// A row from `data_schemas`. `schema_type` holds the [`SchemaKind`] tag.
#[derive(Debug, Clone, FromRow)]
pub struct DataSchemaRow {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub definition: String,
    pub schema_type: String,
    pub business_rules: Option<String>,
    pub prompt_template: Option<String>,
    pub active: bool,
    pub created_by: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<DataSchemaRow> for SchemaDefinition {
    type Error = CoreError;

    fn try_from(row: DataSchemaRow) -> Result<Self, Self::Error> {
        let kind: SchemaKind = row.schema_type.parse().map_err(|_| {
            CoreError::Internal(format!(
                "Schema '{}' has unknown type '{}'",
                row.name, row.schema_type
            ))
        })?;
        Ok(SchemaDefinition {
            id: row.id,
            name: row.name,
            description: row.description,
            definition: row.definition,
            kind,
            business_rules: row.business_rules,
            prompt_template: row.prompt_template,
            active: row.active,
            created_at: row.created_at,
            updated_at: row.updated_at,
            created_by: row.created_by,
        })
    }
}
