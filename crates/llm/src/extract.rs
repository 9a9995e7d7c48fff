//! Pull a JSON record array out of free-form model output.

use std::sync::LazyLock;

use regex::Regex;
use tdm_core::synthesis::SynthesisError;

/// First fenced block, with or without a `json` language tag.
static FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```(?:json|JSON)?\s*(.*?)\s*```").expect("valid regex"));

/// Decode `text` into a list of records.
///
/// Accepts a bare JSON array, an array inside a code fence, or an object
/// wrapping exactly one array field (e.g. `{"records": [...]}`).
pub fn extract_records(text: &str) -> Result<Vec<serde_json::Value>, SynthesisError> {
    let body = FENCE_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .map_or(text, |m| m.as_str())
        .trim();

    let value: serde_json::Value = serde_json::from_str(body)
        .or_else(|_| serde_json::from_str(slice_outer_array(body).unwrap_or(body)))
        .map_err(|e| SynthesisError::Malformed(format!("response is not valid JSON: {e}")))?;

    match value {
        serde_json::Value::Array(records) => Ok(records),
        serde_json::Value::Object(map) => {
            let mut arrays = map.into_iter().filter_map(|(_, v)| match v {
                serde_json::Value::Array(items) => Some(items),
                _ => None,
            });
            match (arrays.next(), arrays.next()) {
                (Some(records), None) => Ok(records),
                _ => Err(SynthesisError::Malformed(
                    "response object does not wrap a single record array".to_string(),
                )),
            }
        }
        other => Err(SynthesisError::Malformed(format!(
            "expected a JSON array, got {}",
            json_kind(&other)
        ))),
    }
}

/// The span from the first `[` to the last `]`, for prose-wrapped arrays.
fn slice_outer_array(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    (start < end).then(|| &text[start..=end])
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    #[test]
    fn bare_array() {
        let records = extract_records(r#"[{"a":1},{"a":2}]"#).unwrap();
        assert_eq!(records, vec![json!({"a": 1}), json!({"a": 2})]);
    }

    #[test]
    fn fenced_array_with_language_tag() {
        let text = "Here you go:\n```json\n[{\"a\":1}]\n```\nEnjoy!";
        assert_eq!(extract_records(text).unwrap(), vec![json!({"a": 1})]);
    }

    #[test]
    fn array_wrapped_in_prose() {
        let text = "Sure! [{\"a\":1}] Let me know if you need more.";
        assert_eq!(extract_records(text).unwrap().len(), 1);
    }

    #[test]
    fn single_array_field_object_is_unwrapped() {
        let text = r#"{"records":[{"a":1},{"a":2},{"a":3}]}"#;
        assert_eq!(extract_records(text).unwrap().len(), 3);
    }

    #[test]
    fn ambiguous_object_is_rejected() {
        let text = r#"{"users":[{"a":1}],"orders":[{"b":2}]}"#;
        assert_matches!(extract_records(text), Err(SynthesisError::Malformed(_)));
    }

    #[test]
    fn scalar_is_rejected() {
        assert_matches!(
            extract_records("42"),
            Err(SynthesisError::Malformed(msg)) if msg.contains("a number")
        );
    }

    #[test]
    fn garbage_is_rejected() {
        assert_matches!(
            extract_records("I cannot help with that."),
            Err(SynthesisError::Malformed(_))
        );
    }
}
