//! Repository for the `data_schemas` table.

use sqlx::PgPool;
use tdm_core::schema::CreateSchemaDefinition;

use crate::models::data_schema::DataSchemaRow;

/// Column list for `data_schemas` SELECT queries.
const COLUMNS: &str = "\
    id, name, description, definition, schema_type, business_rules, \
    prompt_template, active, created_by, created_at, updated_at";

pub struct DataSchemaRepo;

impl DataSchemaRepo {
    /// Insert a new schema. A taken name trips `uq_data_schemas_name`.
    pub async fn create(
        pool: &PgPool,
        input: &CreateSchemaDefinition,
    ) -> Result<DataSchemaRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO data_schemas \
                (name, description, definition, schema_type, business_rules, \
                 prompt_template, active, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DataSchemaRow>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.definition)
            .bind(input.kind.as_str())
            .bind(&input.business_rules)
            .bind(&input.prompt_template)
            .bind(input.active)
            .bind(&input.created_by)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_name(
        pool: &PgPool,
        name: &str,
    ) -> Result<Option<DataSchemaRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM data_schemas WHERE name = $1");
        sqlx::query_as::<_, DataSchemaRow>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// List schemas ordered by name, optionally only active ones.
    pub async fn list(pool: &PgPool, active_only: bool) -> Result<Vec<DataSchemaRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM data_schemas \
             WHERE ($1 = FALSE OR active = TRUE) \
             ORDER BY name"
        );
        sqlx::query_as::<_, DataSchemaRow>(&query)
            .bind(active_only)
            .fetch_all(pool)
            .await
    }

    /// Set the active flag. Returns `None` if no schema has that name.
    pub async fn set_active(
        pool: &PgPool,
        name: &str,
        active: bool,
    ) -> Result<Option<DataSchemaRow>, sqlx::Error> {
        let query = format!(
            "UPDATE data_schemas SET active = $2 WHERE name = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DataSchemaRow>(&query)
            .bind(name)
            .bind(active)
            .fetch_optional(pool)
            .await
    }
}
