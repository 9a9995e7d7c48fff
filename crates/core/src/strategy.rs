//! Descriptor-kind dispatch.
//!
//! A schema's [`SchemaKind`] picks the generation strategy. Named types are
//! resolved through an explicit [`StrategyTable`] keyed by schema name;
//! the descriptor text is never inspected to guess a type.

use std::marker::PhantomData;
use std::sync::Arc;

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::CoreError;
use crate::records::{
    Order, User, ORDER_DEFAULT_RULES, ORDER_TYPE_NAME, USER_DEFAULT_RULES, USER_TYPE_NAME,
};
use crate::schema::{SchemaDefinition, SchemaKind};
use crate::synthesis::{ShapeHint, SynthesisError};

// ---------------------------------------------------------------------------
// Named-type strategies
// ---------------------------------------------------------------------------

/// Type-specific synthesis support for one named record type.
pub trait NamedTypeStrategy: Send + Sync {
    /// Exact name this strategy answers to.
    fn type_name(&self) -> &str;

    /// JSON-schema text describing an array of these records.
    fn format_descriptor(&self) -> &str;

    /// Rules used when the schema has none of its own.
    fn default_rules(&self) -> Option<&str>;

    /// Decode raw records into the strong type and re-encode them.
    fn decode(
        &self,
        records: Vec<serde_json::Value>,
    ) -> Result<Vec<serde_json::Value>, SynthesisError>;
}

/// [`NamedTypeStrategy`] backed by a serde + schemars record type.
pub struct RecordStrategy<T> {
    type_name: String,
    format: String,
    default_rules: Option<String>,
    _record: PhantomData<fn() -> T>,
}

impl<T> RecordStrategy<T>
where
    T: JsonSchema + DeserializeOwned + Serialize,
{
    pub fn new(type_name: impl Into<String>, default_rules: Option<&str>) -> Self {
        let schema = schemars::schema_for!(Vec<T>);
        let format = serde_json::to_string_pretty(&schema).unwrap_or_default();
        Self {
            type_name: type_name.into(),
            format,
            default_rules: default_rules.map(str::to_string),
            _record: PhantomData,
        }
    }
}

impl<T> NamedTypeStrategy for RecordStrategy<T>
where
    T: JsonSchema + DeserializeOwned + Serialize,
{
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn format_descriptor(&self) -> &str {
        &self.format
    }

    fn default_rules(&self) -> Option<&str> {
        self.default_rules.as_deref()
    }

    fn decode(
        &self,
        records: Vec<serde_json::Value>,
    ) -> Result<Vec<serde_json::Value>, SynthesisError> {
        let typed: Vec<T> = serde_json::from_value(serde_json::Value::Array(records))
            .map_err(|e| {
                SynthesisError::Malformed(format!(
                    "records do not match type {}: {e}",
                    self.type_name
                ))
            })?;
        typed
            .iter()
            .map(|record| {
                serde_json::to_value(record).map_err(|e| {
                    SynthesisError::Malformed(format!(
                        "failed to serialize {} record: {e}",
                        self.type_name
                    ))
                })
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Strategy table
// ---------------------------------------------------------------------------

/// Ordered routing table of named-type strategies.
///
/// Lookup is by exact name; when two entries share a name the one
/// registered first wins.
#[derive(Clone, Default)]
pub struct StrategyTable {
    entries: Vec<Arc<dyn NamedTypeStrategy>>,
}

impl StrategyTable {
    /// An empty table: every named-type schema is unsupported.
    pub fn new() -> Self {
        Self::default()
    }

    /// Table with the built-in `User` and `Order` types.
    pub fn with_builtin_types() -> Self {
        let mut table = Self::new();
        table.register(Arc::new(RecordStrategy::<User>::new(
            USER_TYPE_NAME,
            Some(USER_DEFAULT_RULES),
        )));
        table.register(Arc::new(RecordStrategy::<Order>::new(
            ORDER_TYPE_NAME,
            Some(ORDER_DEFAULT_RULES),
        )));
        table
    }

    pub fn register(&mut self, strategy: Arc<dyn NamedTypeStrategy>) {
        if self.lookup(strategy.type_name()).is_some() {
            tracing::warn!(
                type_name = strategy.type_name(),
                "Named type already registered; the earlier entry keeps precedence"
            );
        }
        self.entries.push(strategy);
    }

    /// First strategy whose name matches `type_name` exactly.
    pub fn lookup(&self, type_name: &str) -> Option<Arc<dyn NamedTypeStrategy>> {
        self.entries
            .iter()
            .find(|s| s.type_name() == type_name)
            .cloned()
    }

    pub fn type_names(&self) -> Vec<&str> {
        self.entries.iter().map(|s| s.type_name()).collect()
    }

    /// Select the generation strategy for `schema`.
    ///
    /// Fails with [`CoreError::Unsupported`] for named types missing from
    /// the table and for descriptor kinds without a strategy.
    pub fn dispatch(&self, schema: &SchemaDefinition) -> Result<GenerationStrategy, CoreError> {
        match schema.kind {
            SchemaKind::NamedType => self
                .lookup(&schema.name)
                .map(GenerationStrategy::Typed)
                .ok_or_else(|| {
                    CoreError::Unsupported(format!(
                        "No generation strategy registered for named type '{}'",
                        schema.name
                    ))
                }),
            SchemaKind::JsonSchema => Ok(GenerationStrategy::Document),
            kind @ (SchemaKind::CsvTemplate | SchemaKind::DatabaseTable) => Err(
                CoreError::Unsupported(format!("Schema type not yet implemented: {kind}")),
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Resolved strategy
// ---------------------------------------------------------------------------

/// Strategy chosen for a single generate call.
#[derive(Clone)]
pub enum GenerationStrategy {
    Typed(Arc<dyn NamedTypeStrategy>),
    /// JSON-schema documents: open-ended key/value records.
    Document,
}

impl std::fmt::Debug for GenerationStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerationStrategy::Typed(strategy) => {
                f.debug_tuple("Typed").field(&strategy.type_name()).finish()
            }
            GenerationStrategy::Document => f.write_str("Document"),
        }
    }
}

impl GenerationStrategy {
    pub fn shape_hint(&self, schema: &SchemaDefinition) -> ShapeHint {
        match self {
            GenerationStrategy::Typed(strategy) => ShapeHint::Typed {
                type_name: strategy.type_name().to_string(),
                format: strategy.format_descriptor().to_string(),
            },
            GenerationStrategy::Document => ShapeHint::Document {
                schema: schema.definition.clone(),
            },
        }
    }

    pub fn default_rules(&self) -> Option<&str> {
        match self {
            GenerationStrategy::Typed(strategy) => strategy.default_rules(),
            GenerationStrategy::Document => None,
        }
    }

    /// Validate and normalize raw synthesizer output.
    pub fn decode(
        &self,
        records: Vec<serde_json::Value>,
    ) -> Result<Vec<serde_json::Value>, SynthesisError> {
        match self {
            GenerationStrategy::Typed(strategy) => strategy.decode(records),
            GenerationStrategy::Document => {
                if let Some(pos) = records.iter().position(|r| !r.is_object()) {
                    return Err(SynthesisError::Malformed(format!(
                        "record {pos} is not a JSON object"
                    )));
                }
                Ok(records)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::Utc;
    use serde_json::json;

    use super::*;

    fn schema(name: &str, kind: SchemaKind) -> SchemaDefinition {
        let now = Utc::now();
        SchemaDefinition {
            id: 1,
            name: name.to_string(),
            description: None,
            definition: "{\"type\":\"object\"}".to_string(),
            kind,
            business_rules: None,
            prompt_template: None,
            active: true,
            created_at: now,
            updated_at: now,
            created_by: None,
        }
    }

    fn user_json() -> serde_json::Value {
        json!({
            "first_name": "Ada",
            "last_name": "Lovelace",
            "email": "ada.lovelace@example.com",
            "age": 36
        })
    }

    #[test]
    fn empty_table_leaves_named_types_unsupported() {
        let table = StrategyTable::new();
        assert_matches!(
            table.dispatch(&schema("User", SchemaKind::NamedType)),
            Err(CoreError::Unsupported(_))
        );
    }

    #[test]
    fn builtin_table_routes_user_and_order() {
        let table = StrategyTable::with_builtin_types();
        assert_eq!(table.type_names(), vec!["User", "Order"]);
        assert_matches!(
            table.dispatch(&schema("Order", SchemaKind::NamedType)),
            Ok(GenerationStrategy::Typed(s)) if s.type_name() == "Order"
        );
    }

    #[test]
    fn lookup_is_exact_and_case_sensitive() {
        let table = StrategyTable::with_builtin_types();
        assert!(table.lookup("user").is_none());
        assert!(table.lookup("User ").is_none());
    }

    #[test]
    fn descriptor_text_does_not_drive_dispatch() {
        let table = StrategyTable::with_builtin_types();
        let mut s = schema("Customer", SchemaKind::NamedType);
        s.definition = "public record User(String name) {}".to_string();
        assert_matches!(table.dispatch(&s), Err(CoreError::Unsupported(_)));
    }

    #[test]
    fn first_registered_strategy_wins() {
        let mut table = StrategyTable::new();
        table.register(Arc::new(RecordStrategy::<User>::new("Thing", Some("first"))));
        table.register(Arc::new(RecordStrategy::<Order>::new("Thing", Some("second"))));
        let found = table.lookup("Thing").unwrap();
        assert_eq!(found.default_rules(), Some("first"));
    }

    #[test]
    fn json_schema_routes_to_document() {
        let table = StrategyTable::new();
        assert_matches!(
            table.dispatch(&schema("Product", SchemaKind::JsonSchema)),
            Ok(GenerationStrategy::Document)
        );
    }

    #[test]
    fn template_and_table_kinds_are_unsupported() {
        let table = StrategyTable::with_builtin_types();
        for kind in [SchemaKind::CsvTemplate, SchemaKind::DatabaseTable] {
            assert_matches!(
                table.dispatch(&schema("User", kind)),
                Err(CoreError::Unsupported(msg)) if msg.contains(kind.as_str())
            );
        }
    }

    #[test]
    fn typed_decode_accepts_conforming_records() {
        let strategy = RecordStrategy::<User>::new("User", None);
        let decoded = strategy.decode(vec![user_json()]).unwrap();
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0]["email"], "ada.lovelace@example.com");
        assert!(decoded[0]["phone_number"].is_null());
    }

    #[test]
    fn typed_decode_rejects_missing_fields() {
        let strategy = RecordStrategy::<User>::new("User", None);
        let err = strategy.decode(vec![json!({"first_name": "Ada"})]).unwrap_err();
        assert_matches!(err, SynthesisError::Malformed(msg) if msg.contains("User"));
    }

    #[test]
    fn format_descriptor_describes_an_array() {
        let strategy = RecordStrategy::<Order>::new("Order", None);
        let format: serde_json::Value =
            serde_json::from_str(strategy.format_descriptor()).unwrap();
        assert_eq!(format["type"], "array");
    }

    #[test]
    fn document_decode_rejects_non_objects() {
        let err = GenerationStrategy::Document
            .decode(vec![json!({"a": 1}), json!(2)])
            .unwrap_err();
        assert_matches!(err, SynthesisError::Malformed(msg) if msg.contains("record 1"));
    }
}
