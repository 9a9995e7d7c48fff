//! Instruction rendering for the synthesizer.
//!
//! Pure and deterministic: identical inputs always produce byte-identical
//! text. A caller-supplied custom prompt replaces the rendered instruction
//! entirely.

use std::fmt::Write as _;

use crate::request::GenerationRequest;
use crate::schema::SchemaDefinition;
use crate::strategy::GenerationStrategy;
use crate::synthesis::ShapeHint;

/// Directives included in every rendered instruction.
pub const COMMON_DIRECTIVES: &[&str] = &[
    "All data must be realistic and believable",
    "Ensure diversity in the generated data",
];

/// Extra directives for named-type instructions.
pub const TYPED_DIRECTIVES: &[&str] = &["Follow standard formats for emails, phone numbers, dates, etc."];

/// Extra directives for JSON-schema instructions.
pub const DOCUMENT_DIRECTIVES: &[&str] = &[
    "Strictly follow the provided schema structure",
    "Use appropriate data types and formats",
];

/// Trailing output-encoding directive.
pub const OUTPUT_DIRECTIVE: &str = "Return the data as a JSON array of objects.";

/// Renders synthesis instructions from a schema and a request.
pub struct PromptBuilder;

impl PromptBuilder {
    /// Render the instruction for `request` against `definition`.
    ///
    /// Section order: header with the exact record count, generic
    /// directives, the schema's business rules, the request's additional
    /// constraints, then the conformance and output-encoding directives.
    /// A named type's default rules stand in only when the schema has no
    /// rules and the request no constraints.
    pub fn build_instruction(
        definition: &SchemaDefinition,
        request: &GenerationRequest,
        strategy: &GenerationStrategy,
    ) -> String {
        if let Some(custom) = request.custom_prompt() {
            return custom.to_string();
        }

        let count = request.record_count;
        let shape = strategy.shape_hint(definition);
        let mut out = String::new();

        match &shape {
            ShapeHint::Typed { type_name, .. } => {
                let _ = write!(
                    out,
                    "Generate exactly {count} realistic test data records for a {type_name} entity.\n\n"
                );
            }
            ShapeHint::Document { schema } => {
                let _ = write!(
                    out,
                    "Generate exactly {count} realistic test data records that conform to the following JSON schema:\n\n{}\n\n",
                    schema.trim_end()
                );
            }
        }

        out.push_str("Requirements:\n");
        let specific = match &shape {
            ShapeHint::Typed { .. } => TYPED_DIRECTIVES,
            ShapeHint::Document { .. } => DOCUMENT_DIRECTIVES,
        };
        for directive in COMMON_DIRECTIVES.iter().chain(specific) {
            let _ = writeln!(out, "- {directive}");
        }

        let rules = match definition.rules() {
            Some(rules) => Some(rules),
            None if request.additional_constraints.is_empty() => strategy.default_rules(),
            None => None,
        };
        if let Some(rules) = rules {
            let _ = write!(out, "\nAdditional Business Rules:\n{rules}\n");
        }

        if !request.additional_constraints.is_empty() {
            out.push_str("\nAdditional constraints:\n");
            for (key, value) in &request.additional_constraints {
                let _ = writeln!(out, "- {key}: {}", render_value(value));
            }
        }

        if let ShapeHint::Typed { format, .. } = &shape {
            let _ = write!(
                out,
                "\nYour response must strictly conform to this format:\n{}\n",
                format.trim_end()
            );
        }
        let _ = write!(out, "\n{OUTPUT_DIRECTIVE}");

        out
    }
}

/// Strings render bare; everything else renders as compact JSON.
fn render_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
