//! Schema definitions: named record shapes plus natural-language rules.
//!
//! A schema's [`SchemaKind`] selects the generation strategy. Names are
//! unique (case-sensitive) and immutable once registered.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// Maximum length of a schema name in characters.
pub const MAX_SCHEMA_NAME_LENGTH: usize = 255;

/// Maximum length of a schema description in characters.
pub const MAX_DESCRIPTION_LENGTH: usize = 1_000;

// ---------------------------------------------------------------------------
// Descriptor kind
// ---------------------------------------------------------------------------

/// Category of a schema's structural descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SchemaKind {
    /// Reference to a record type known to the strategy table.
    #[serde(alias = "JAVA_CLASS")]
    NamedType,
    /// A JSON-schema document describing open-ended records.
    JsonSchema,
    /// Column headers of a CSV template.
    CsvTemplate,
    /// Reference to an existing database table.
    DatabaseTable,
}

impl SchemaKind {
    /// All kinds, in declaration order.
    pub const ALL: [SchemaKind; 4] = [
        SchemaKind::NamedType,
        SchemaKind::JsonSchema,
        SchemaKind::CsvTemplate,
        SchemaKind::DatabaseTable,
    ];

    /// Stable textual tag, used for storage and on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            SchemaKind::NamedType => "NAMED_TYPE",
            SchemaKind::JsonSchema => "JSON_SCHEMA",
            SchemaKind::CsvTemplate => "CSV_TEMPLATE",
            SchemaKind::DatabaseTable => "DATABASE_TABLE",
        }
    }
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NAMED_TYPE" | "JAVA_CLASS" => Ok(SchemaKind::NamedType),
            "JSON_SCHEMA" => Ok(SchemaKind::JsonSchema),
            "CSV_TEMPLATE" => Ok(SchemaKind::CsvTemplate),
            "DATABASE_TABLE" => Ok(SchemaKind::DatabaseTable),
            other => Err(CoreError::Validation(format!(
                "Unknown schema type '{other}'"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A registered schema definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaDefinition {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    /// Structural descriptor text (type reference, JSON schema, column template).
    pub definition: String,
    #[serde(rename = "type")]
    pub kind: SchemaKind,
    /// Natural-language constraints passed verbatim into the instruction.
    pub business_rules: Option<String>,
    pub prompt_template: Option<String>,
    pub active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub created_by: Option<String>,
}

impl SchemaDefinition {
    /// Business rules with surrounding whitespace removed, or `None` if blank.
    pub fn rules(&self) -> Option<&str> {
        self.business_rules
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
    }
}

// ---------------------------------------------------------------------------
// Create DTO
// ---------------------------------------------------------------------------

fn default_active() -> bool {
    true
}

/// Input for registering a new schema.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSchemaDefinition {
    pub name: String,
    pub description: Option<String>,
    pub definition: String,
    #[serde(rename = "type")]
    pub kind: SchemaKind,
    pub business_rules: Option<String>,
    pub prompt_template: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
    pub created_by: Option<String>,
}

impl CreateSchemaDefinition {
    /// Minimal input with just the required fields set.
    pub fn new(name: impl Into<String>, kind: SchemaKind, definition: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            definition: definition.into(),
            kind,
            business_rules: None,
            prompt_template: None,
            active: true,
            created_by: None,
        }
    }

    /// Check required fields and length limits.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.trim().is_empty() {
            return Err(CoreError::Validation(
                "Schema name is required".to_string(),
            ));
        }
        if self.name.chars().count() > MAX_SCHEMA_NAME_LENGTH {
            return Err(CoreError::Validation(format!(
                "Schema name exceeds maximum length of {MAX_SCHEMA_NAME_LENGTH} characters"
            )));
        }
        if self.definition.trim().is_empty() {
            return Err(CoreError::Validation(
                "Schema definition is required".to_string(),
            ));
        }
        if let Some(description) = &self.description {
            if description.chars().count() > MAX_DESCRIPTION_LENGTH {
                return Err(CoreError::Validation(format!(
                    "Description exceeds maximum length of {MAX_DESCRIPTION_LENGTH} characters"
                )));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
