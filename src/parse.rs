use crate::error::{ParseError, ParseErrorKind};
use crate::types::Schema;

const TOP_LEVEL_KEYS: &[&str] = &["modes", "fields", "steps", "keyOrder"];

/// Parse a YAML (or JSON) string into an unvalidated [`Schema`].
///
/// Performs deserialization and type mapping only. Cross references between
/// modes, fields, and steps are checked by [`crate::validate::validate`].
pub fn parse(input: &str) -> Result<Schema, ParseError> {
    if input.trim().is_empty() {
        return Err(ParseError::new(ParseErrorKind::Syntax, "empty input"));
    }

    check_multi_document(input)?;

    // YAML → serde_json::Value first: preserve_order keeps arm declaration order.
    let value: serde_json::Value = serde_saphyr::from_str(input).map_err(|e| {
        let msg = e.to_string();
        ParseError::new(classify_saphyr_error(&msg), msg)
    })?;

    let Some(root) = value.as_object() else {
        return Err(ParseError::new(
            ParseErrorKind::TypeMismatch,
            "schema root must be a YAML mapping",
        ));
    };

    if let Some(unknown) = root.keys().find(|k| !TOP_LEVEL_KEYS.contains(&k.as_str())) {
        return Err(ParseError {
            path: Some(unknown.clone()),
            ..ParseError::new(
                ParseErrorKind::TypeMismatch,
                format!("unknown top-level field: {}", unknown),
            )
        });
    }
    if !root.contains_key("modes") {
        return Err(ParseError {
            path: Some("modes".to_string()),
            ..ParseError::new(ParseErrorKind::TypeMismatch, "missing field `modes`")
        });
    }

    serde_json::from_value(value).map_err(|e| {
        let msg = e.to_string();
        ParseError::new(classify_json_error(&msg), msg)
    })
}

/// Rejects streams holding more than one YAML document.
/// Only `---` at column 0 counts, so block scalars stay untouched.
fn check_multi_document(input: &str) -> Result<(), ParseError> {
    let markers = input
        .lines()
        .filter(|line| line.starts_with("---") && line[3..].trim().is_empty())
        .count();
    if markers > 1 {
        return Err(ParseError::new(
            ParseErrorKind::Syntax,
            "multi-document YAML is not supported",
        ));
    }
    Ok(())
}

fn classify_saphyr_error(msg: &str) -> ParseErrorKind {
    let lower = msg.to_lowercase();
    if lower.contains("unknown") || lower.contains("variant") {
        ParseErrorKind::UnknownVariant
    } else if lower.contains("type") || lower.contains("invalid") || lower.contains("expected") {
        ParseErrorKind::TypeMismatch
    } else {
        ParseErrorKind::Syntax
    }
}

fn classify_json_error(msg: &str) -> ParseErrorKind {
    let lower = msg.to_lowercase();
    if lower.contains("unknown variant") || lower.contains("unknown field") {
        ParseErrorKind::UnknownVariant
    } else if lower.contains("missing field")
        || lower.contains("invalid type")
        || lower.contains("expected")
    {
        ParseErrorKind::TypeMismatch
    } else {
        ParseErrorKind::Syntax
    }
}
