//! Active field computation and option resolution.

use crate::conditional::resolve_for_schema;
use crate::primitives::dependencies_satisfied;
use crate::types::{FieldDefinition, FieldOption, FieldOptions, ResolvedField, Schema, State};
use std::collections::{BTreeMap, HashMap};

/// Supplier of externally sourced option lists (`options: {source: ...}`).
///
/// Implemented by the caller's data layer. Lookups are synchronous: the
/// implementation answers from whatever it has already fetched and returns
/// `None` for lists it does not have yet.
pub trait OptionSource {
    fn options(&self, source: &str, state: &State) -> Option<Vec<FieldOption>>;
}

impl<S: OptionSource + ?Sized> OptionSource for &S {
    fn options(&self, source: &str, state: &State) -> Option<Vec<FieldOption>> {
        (**self).options(source, state)
    }
}

/// A cache of already fetched lists keyed by source name.
impl OptionSource for BTreeMap<String, Vec<FieldOption>> {
    fn options(&self, source: &str, _state: &State) -> Option<Vec<FieldOption>> {
        self.get(source).cloned()
    }
}

impl OptionSource for HashMap<String, Vec<FieldOption>> {
    fn options(&self, source: &str, _state: &State) -> Option<Vec<FieldOption>> {
        self.get(source).cloned()
    }
}

/// Source that never has any data.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOptionSource;

impl OptionSource for NoOptionSource {
    fn options(&self, _source: &str, _state: &State) -> Option<Vec<FieldOption>> {
        None
    }
}

/// Fields of the current mode that are visible for `state`, in the mode's
/// declared order, each with its resolved options.
///
/// Returns an empty list when `state.mode` names no declared mode. Field ids
/// missing from the schema and fields with unmet dependencies are skipped.
pub fn get_active_fields(schema: &Schema, state: &State) -> Vec<ResolvedField> {
    let Some(mode) = state.mode().and_then(|id| schema.mode(id)) else {
        return Vec::new();
    };

    mode.fields
        .iter()
        .filter_map(|id| schema.field(id))
        .filter(|field| dependencies_satisfied(field, state))
        .map(|field| ResolvedField {
            field: field.clone(),
            resolved_options: resolve_options(field, state, schema),
        })
        .collect()
}

/// Whether `field_id` belongs to the current mode and its dependencies hold.
pub fn is_field_active(schema: &Schema, state: &State, field_id: &str) -> bool {
    let in_mode = state
        .mode()
        .and_then(|id| schema.mode(id))
        .is_some_and(|mode| mode.fields.iter().any(|f| f == field_id));
    in_mode
        && schema
            .field(field_id)
            .is_some_and(|field| dependencies_satisfied(field, state))
}

/// Options a field offers on its own, without consulting external sources.
///
/// Externally sourced lists resolve to `[]`; the caller merges fetched data.
pub fn resolve_options(field: &FieldDefinition, state: &State, schema: &Schema) -> Vec<FieldOption> {
    match &field.options {
        None | Some(FieldOptions::Source { .. }) => Vec::new(),
        Some(FieldOptions::Static(options)) => options.clone(),
        Some(FieldOptions::Conditional(value)) => resolve_for_schema(value, state, schema)
            .cloned()
            .unwrap_or_default(),
    }
}

/// Options for one field, merging externally sourced lists from `sources`.
///
/// Unknown fields and fields that are not currently active have no options.
pub fn get_field_options(
    schema: &Schema,
    state: &State,
    field_id: &str,
    sources: &dyn OptionSource,
) -> Vec<FieldOption> {
    if !is_field_active(schema, state, field_id) {
        return Vec::new();
    }
    let Some(field) = schema.field(field_id) else {
        return Vec::new();
    };
    match &field.options {
        Some(FieldOptions::Source { source }) => sources.options(source, state).unwrap_or_default(),
        _ => resolve_options(field, state, schema),
    }
}
