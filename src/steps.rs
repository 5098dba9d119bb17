//! Step tree flattening and step content resolution.
//!
//! Unlike conditional values, the entries of a branching step node are not
//! alternatives: every entry is looked up independently and all selected
//! sub-trees contribute, in declaration order.

use crate::conditional::resolve_for_schema;
use crate::types::{ResolvedStep, Schema, State, StepDefinition, StepTree};

/// Flattens `tree` into the ordered step definitions selected by `state`.
///
/// For each `(field, value map)` entry the arm named by the stringified state
/// value is taken, else the `DEFAULT` arm, else the entry contributes nothing.
pub fn flatten_steps<'a>(tree: &'a StepTree, state: &State) -> Vec<&'a StepDefinition> {
    let mut out = Vec::new();
    collect_steps(tree, state, &mut out);
    out
}

fn collect_steps<'a>(tree: &'a StepTree, state: &State, out: &mut Vec<&'a StepDefinition>) {
    match tree {
        StepTree::Steps(steps) => out.extend(steps.iter()),
        StepTree::Branch(entries) => {
            for (field_id, value_map) in entries {
                let current = state.key_of(field_id);
                if let Some(subtree) = value_map.get_or_default(current.as_deref()) {
                    collect_steps(subtree, state, out);
                }
            }
        }
    }
}

/// Resolves the steps to show for `state`.
///
/// Content is resolved with the schema's candidate key order; steps whose
/// content resolves to nothing, `null`, or an empty string are dropped.
pub fn resolve_steps(schema: &Schema, state: &State) -> Vec<ResolvedStep> {
    flatten_steps(&schema.steps, state)
        .into_iter()
        .filter_map(|step| {
            let content = resolve_for_schema(&step.content, state, schema)?.as_deref()?;
            if content.is_empty() {
                return None;
            }
            Some(ResolvedStep {
                id: step.id.clone(),
                title: step.title.clone(),
                description: step.description.clone(),
                content: content.to_string(),
            })
        })
        .collect()
}
