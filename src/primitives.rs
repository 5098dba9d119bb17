//! Shared operations used by the resolvers and the session.

use crate::error::Diagnostic;
use crate::types::{FieldDefinition, State};
use std::collections::BTreeMap;

// ─── Dependency predicate ────────────────────────────────────────────────────

/// Checks every `dependsOn` entry against `state`.
///
/// An entry holds when the stringified state value for its key is one of the
/// accepted values. Absent keys never satisfy an entry. A field without
/// dependencies is always satisfied.
pub fn dependencies_satisfied(field: &FieldDefinition, state: &State) -> bool {
    match &field.depends_on {
        Some(deps) => depends_on_satisfied(deps, state),
        None => true,
    }
}

pub(crate) fn depends_on_satisfied(deps: &BTreeMap<String, Vec<String>>, state: &State) -> bool {
    deps.iter().all(|(key, accepted)| match state.key_of(key) {
        Some(current) => accepted.iter().any(|v| *v == current),
        None => false,
    })
}

// ─── Content path templates ─────────────────────────────────────────────────

/// Substitutes `{{field}}` placeholders in a resolved content path with the
/// stringified state value of that field.
///
/// Returns the rendered string and a W-101 warning for every placeholder that
/// names a field absent from state (rendered as empty). `\{{` yields a literal
/// `{{`; an unclosed `{{` is passed through.
pub fn render_content_path(template: &str, state: &State) -> (String, Vec<Diagnostic>) {
    let mut diagnostics = Vec::new();

    const PLACEHOLDER: &str = "\x00ESCAPED_OPEN_BRACE\x00";
    let working = template.replace("\\{{", PLACEHOLDER);

    let mut result = String::new();
    let mut remaining = working.as_str();

    while let Some(start) = remaining.find("{{") {
        result.push_str(&remaining[..start]);

        let after_open = &remaining[start + 2..];
        if let Some(end) = after_open.find("}}") {
            let expr = after_open[..end].trim();
            match state.key_of(expr) {
                Some(value) => result.push_str(&value),
                None => diagnostics.push(Diagnostic::warning(
                    "W-101",
                    Some(template.to_string()),
                    format!("content path references unset field '{}'", expr),
                )),
            }
            remaining = &after_open[end + 2..];
        } else {
            result.push_str("{{");
            remaining = after_open;
        }
    }
    result.push_str(remaining);

    (result.replace(PLACEHOLDER, "{{"), diagnostics)
}
