//! Resolution of [`ConditionalValue`]s against wizard state.
//!
//! A branch is resolved by walking an ordered list of candidate state keys.
//! The first key whose current value names an arm wins, and that key and every
//! key before it are consumed: deeper levels only see the remaining suffix, so
//! one state dimension is never tested twice along a path. When nothing
//! matches, the `DEFAULT` arm is tried with the unconsumed list.
//!
//! An arm may also be named after a candidate key itself, in which case its
//! content is a value map for that one dimension:
//!
//! ```text
//! mode:
//!   mcp:
//!     mcpClient: { codex: A, DEFAULT: B }
//!     DEFAULT: C
//!   DEFAULT: D
//! ```
//!
//! Value arms take precedence over dimension-named arms for the same key. A
//! dimension-named arm is only read when its key holds a value in state, and
//! [`resolve_for_schema`] never reads an arm named after a mode id that way:
//! such arms are mode values.

use crate::types::{Branch, ConditionalValue, Schema, State};

/// Default priority of state keys when resolving conditional values.
pub const CANONICAL_KEY_ORDER: &[&str] = &[
    "mode",
    "framework",
    "frameworkVariant",
    "library",
    "frameworkUi",
    "connectionMethod",
    "connectionType",
    "useSharedPooler",
    "orm",
    "mcpClient",
    "mcpReadonly",
    "mcpFeatures",
];

/// Resolves `value` against `state`, trying `candidate_keys` in order.
///
/// Returns `None` when a branch has neither a matching arm nor a `DEFAULT`.
pub fn resolve_conditional<'a, T, K: AsRef<str>>(
    value: &'a ConditionalValue<T>,
    state: &State,
    candidate_keys: &[K],
) -> Option<&'a T> {
    resolve_value(value, state, candidate_keys, &[])
}

/// Resolves `value` with the schema's candidate key order.
///
/// Arms named after one of the schema's mode ids always select by mode value,
/// even when a field shares the id.
pub fn resolve_for_schema<'a, T>(
    value: &'a ConditionalValue<T>,
    state: &State,
    schema: &Schema,
) -> Option<&'a T> {
    let modes: Vec<&str> = schema.modes.iter().map(|mode| mode.id.as_str()).collect();
    resolve_value(value, state, &schema.candidate_keys(), &modes)
}

fn resolve_value<'a, T, K: AsRef<str>>(
    value: &'a ConditionalValue<T>,
    state: &State,
    candidate_keys: &[K],
    mode_ids: &[&str],
) -> Option<&'a T> {
    match value {
        ConditionalValue::Leaf(leaf) => Some(leaf),
        ConditionalValue::Branch(branch) => resolve_branch(branch, state, candidate_keys, mode_ids),
    }
}

fn resolve_branch<'a, T, K: AsRef<str>>(
    branch: &'a Branch<ConditionalValue<T>>,
    state: &State,
    candidate_keys: &[K],
    mode_ids: &[&str],
) -> Option<&'a T> {
    for (index, key) in candidate_keys.iter().enumerate() {
        let key = key.as_ref();
        let rest = &candidate_keys[index + 1..];
        let Some(current) = state.key_of(key) else {
            continue;
        };

        if let Some(arm) = branch.get(&current) {
            tracing::trace!(key, value = %current, "conditional arm matched");
            return resolve_value(arm, state, rest, mode_ids);
        }

        if mode_ids.iter().any(|id| *id == key) {
            continue;
        }
        if let Some(ConditionalValue::Branch(dimension)) = branch.get(key)
            && let Some(arm) = dimension.get_or_default(Some(current.as_str()))
        {
            tracing::trace!(key, value = %current, "dimension arm matched");
            return resolve_value(arm, state, rest, mode_ids);
        }
    }

    branch
        .default_arm()
        .and_then(|fallback| resolve_value(fallback, state, candidate_keys, mode_ids))
}
