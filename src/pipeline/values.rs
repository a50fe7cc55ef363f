use std::collections::BTreeMap;

use serde_json::Value;

use super::prompt::is_recognized_field;
use super::PipelineError;

/// Recursion ceiling while flattening nested completion output. Parsed JSON
/// is a finite tree; the guard caps adversarially deep payloads.
const MAX_FLATTEN_DEPTH: usize = 32;

/// Parse a completion payload into a flat recognized-field mapping.
///
/// Strict JSON is tried first. On failure, every single quote is substituted
/// with a double quote and the text re-parsed — the normalization needed for
/// models that emit Python-style dictionaries. The substitution corrupts any
/// value that legitimately contains an apostrophe; such payloads fail to
/// parse rather than land under the wrong key.
pub fn parse_value_payload(raw: &str) -> Result<BTreeMap<String, f64>, PipelineError> {
    let parsed = parse_lenient(raw)?;
    if !parsed.is_object() {
        return Err(PipelineError::MalformedValues(
            "top-level payload is not a mapping".into(),
        ));
    }

    let mut fields = BTreeMap::new();
    flatten_into(&parsed, 0, &mut fields)?;
    Ok(fields)
}

fn parse_lenient(raw: &str) -> Result<Value, PipelineError> {
    let trimmed = raw.trim();
    match serde_json::from_str(trimmed) {
        Ok(value) => Ok(value),
        Err(_) => {
            let normalized = trimmed.replace('\'', "\"");
            serde_json::from_str(&normalized)
                .map_err(|e| PipelineError::MalformedValues(e.to_string()))
        }
    }
}

/// Walk a parsed payload, merging recognized scalar entries into `out`.
/// Mappings and sequences recurse; unrecognized keys drop silently at any
/// depth. Duplicate keys resolve last-write-wins in traversal order.
fn flatten_into(
    value: &Value,
    depth: usize,
    out: &mut BTreeMap<String, f64>,
) -> Result<(), PipelineError> {
    if depth > MAX_FLATTEN_DEPTH {
        return Err(PipelineError::MalformedValues(format!(
            "payload nested deeper than {MAX_FLATTEN_DEPTH} levels"
        )));
    }

    match value {
        Value::Object(map) => {
            for (key, child) in map {
                match child {
                    Value::Object(_) | Value::Array(_) => flatten_into(child, depth + 1, out)?,
                    scalar => {
                        if is_recognized_field(key) {
                            match numeric_value(scalar) {
                                Some(number) => {
                                    out.insert(key.clone(), number);
                                }
                                None => tracing::debug!(
                                    field = %key,
                                    "dropping non-numeric value for recognized field"
                                ),
                            }
                        }
                    }
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                flatten_into(item, depth + 1, out)?;
            }
        }
        _ => {}
    }
    Ok(())
}

/// JSON numbers pass through; numeric strings are accepted because models
/// quote values inconsistently.
fn numeric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_exactly_the_recognized_subset_at_any_depth() {
        let raw = r#"{
            "ph": 7.458,
            "station": 4,
            "panel": {
                "sodium": 140,
                "comment": "within range",
                "nested": {"lactate": 13, "reviewed by": "dr. levi"}
            }
        }"#;
        let fields = parse_value_payload(raw).unwrap();

        assert_eq!(fields.len(), 3);
        assert_eq!(fields["ph"], 7.458);
        assert_eq!(fields["sodium"], 140.0);
        assert_eq!(fields["lactate"], 13.0);
    }

    #[test]
    fn single_quoted_payload_parses_via_substitution() {
        let fields = parse_value_payload("{'ph': 7.458, 'lactate': 13}").unwrap();
        assert_eq!(fields["ph"], 7.458);
        assert_eq!(fields["lactate"], 13.0);
    }

    #[test]
    fn apostrophe_inside_a_value_fails_cleanly() {
        // After substitution the payload becomes {"ph": 7.4, "note": "it"s low"} —
        // invalid JSON. The whole payload must be rejected; no partial mapping
        // and no value attributed to a different key.
        let result = parse_value_payload(r#"{'ph': 7.4, 'note': "it's low"}"#);
        assert!(matches!(result, Err(PipelineError::MalformedValues(_))));
    }

    #[test]
    fn unparseable_text_is_malformed() {
        let result = parse_value_payload("the model refused to answer");
        assert!(matches!(result, Err(PipelineError::MalformedValues(_))));
    }

    #[test]
    fn non_mapping_top_level_is_malformed() {
        let result = parse_value_payload("[7.4, 140]");
        assert!(matches!(result, Err(PipelineError::MalformedValues(_))));
    }

    #[test]
    fn sequences_are_walked_for_nested_mappings() {
        let raw = r#"{"panels": [{"ph": 7.41}, {"sodium": 138}]}"#;
        let fields = parse_value_payload(raw).unwrap();
        assert_eq!(fields["ph"], 7.41);
        assert_eq!(fields["sodium"], 138.0);
    }

    #[test]
    fn numeric_strings_are_coerced() {
        let fields = parse_value_payload(r#"{"sodium": "140", "potassium": " 3.9 "}"#).unwrap();
        assert_eq!(fields["sodium"], 140.0);
        assert_eq!(fields["potassium"], 3.9);
    }

    #[test]
    fn non_numeric_recognized_values_are_dropped() {
        let fields = parse_value_payload(r#"{"ph": "not measured", "sodium": 140}"#).unwrap();
        assert!(!fields.contains_key("ph"));
        assert_eq!(fields["sodium"], 140.0);
    }

    #[test]
    fn later_traversal_entries_win_for_duplicate_keys() {
        // Traversal is alphabetical over object keys: "deep" flattens before
        // the top-level "ph" entry overwrites it.
        let raw = r#"{"deep": {"ph": 7.2}, "ph": 7.1}"#;
        let fields = parse_value_payload(raw).unwrap();
        assert_eq!(fields["ph"], 7.1);
    }

    #[test]
    fn depth_guard_rejects_adversarial_nesting() {
        let mut raw = String::new();
        for _ in 0..40 {
            raw.push_str("{\"panel\": ");
        }
        raw.push_str("{\"ph\": 7.4}");
        for _ in 0..40 {
            raw.push('}');
        }

        let result = parse_value_payload(&raw);
        assert!(matches!(result, Err(PipelineError::MalformedValues(_))));
    }

    #[test]
    fn idempotent_on_its_own_flat_output() {
        let first = parse_value_payload(r#"{"ph": 7.458, "sodium": 140, "lactate": 13}"#).unwrap();
        let reserialized = serde_json::to_string(&first).unwrap();
        let second = parse_value_payload(&reserialized).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn values_survive_unchanged() {
        let fields =
            parse_value_payload(r#"{"hematocrit": 29, "calcium, ionized": 0.39}"#).unwrap();
        assert_eq!(fields["hematocrit"], 29.0);
        assert_eq!(fields["calcium, ionized"], 0.39);
    }
}
