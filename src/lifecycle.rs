//! Default state, dependent-field resets, and the [`Session`] state machine.
//!
//! ```text
//! Session::new(schema) → get_default_state → overrides → reconcile options
//! update_field(id, v)  → set → reset_dependent_fields(id) → reconcile options
//! set_mode(m)          → stash left mode → set → reset_dependent_fields("mode")
//!                      → restore stash / backfill defaults → reconcile options
//! ```

use crate::fields::{OptionSource, get_active_fields, get_field_options, resolve_options};
use crate::primitives::dependencies_satisfied;
use crate::steps::resolve_steps;
use crate::types::{FieldOption, MODE_KEY, ResolvedField, ResolvedStep, Schema, State, StateValue};
use std::collections::{BTreeMap, HashSet};

/// Mode used when a schema declares no modes at all.
pub const FALLBACK_MODE: &str = "direct";

/// Initial state for `schema`.
///
/// `mode` is the first declared mode. Every field with a declared default is
/// present with exactly that value; fields without one are absent.
pub fn get_default_state(schema: &Schema) -> State {
    let mut state = State::new();
    state.set(MODE_KEY, default_mode(schema));
    for (id, field) in &schema.fields {
        if let Some(default) = &field.default_value {
            state.set(id.clone(), default.clone());
        }
    }
    state
}

fn default_mode(schema: &Schema) -> &str {
    schema
        .modes
        .first()
        .map(|m| m.id.as_str())
        .unwrap_or(FALLBACK_MODE)
}

/// Removes fields invalidated by a change to `changed_field_id`.
///
/// `state` must already hold the new value. Every field whose `dependsOn`
/// mentions the changed field and no longer holds is removed; this is a single
/// pass and does not follow chains of dependencies.
///
/// When the mode changed, fields of the previous mode that the current mode
/// does not declare are removed as well. With `previous_mode == None` the
/// fields of every other mode are treated as stale.
pub fn reset_dependent_fields(
    state: &State,
    changed_field_id: &str,
    schema: &Schema,
    previous_mode: Option<&str>,
) -> State {
    let mut next = state.clone();

    for (id, field) in &schema.fields {
        if field.depends_on_field(changed_field_id)
            && next.contains(id)
            && !dependencies_satisfied(field, state)
        {
            tracing::debug!(field = %id, changed = changed_field_id, "dependency no longer met, clearing field");
            next.remove(id);
        }
    }

    if changed_field_id == MODE_KEY {
        let current_mode = state.mode();
        let kept: HashSet<&str> = current_mode
            .and_then(|id| schema.mode(id))
            .map(|mode| mode.fields.iter().map(String::as_str).collect())
            .unwrap_or_default();

        let stale: Vec<&str> = match previous_mode {
            Some(previous) => schema
                .mode(previous)
                .map(|mode| mode.fields.iter().map(String::as_str).collect())
                .unwrap_or_default(),
            None => schema
                .modes
                .iter()
                .filter(|mode| Some(mode.id.as_str()) != current_mode)
                .flat_map(|mode| mode.fields.iter().map(String::as_str))
                .collect(),
        };

        for id in stale {
            if !kept.contains(id) && next.remove(id).is_some() {
                tracing::debug!(field = id, "field not part of the new mode, clearing");
            }
        }
    }

    next
}

/// Owns the wizard state for one schema. Mutation happens only through
/// [`Session::set_mode`] and [`Session::update_field`].
#[derive(Clone, Debug)]
pub struct Session<'s> {
    schema: &'s Schema,
    state: State,
    /// Values the user had entered in a mode when leaving it.
    remembered: BTreeMap<String, State>,
}

impl<'s> Session<'s> {
    pub fn new(schema: &'s Schema) -> Self {
        Self::with_overrides(schema, State::new())
    }

    /// Starts from the default state with `overrides` applied on top.
    ///
    /// A `mode` override naming an unknown mode is replaced by the default mode.
    pub fn with_overrides(schema: &'s Schema, overrides: State) -> Self {
        let mut state = get_default_state(schema);
        for (key, value) in overrides.iter() {
            state.set(key, value.clone());
        }
        if state.mode().and_then(|id| schema.mode(id)).is_none() {
            tracing::debug!(mode = ?state.get(MODE_KEY), "unknown mode override, using default");
            state.set(MODE_KEY, default_mode(schema));
        }

        let mut session = Session {
            schema,
            state,
            remembered: BTreeMap::new(),
        };
        session.reconcile_options();
        session
    }

    pub fn schema(&self) -> &'s Schema {
        self.schema
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn into_state(self) -> State {
        self.state
    }

    /// Switches to `mode_id`. Unknown mode ids are ignored.
    ///
    /// Values entered in the mode being left are remembered and restored when
    /// the user comes back; fields still without a value get their defaults.
    pub fn set_mode(&mut self, mode_id: &str) {
        let schema = self.schema;
        let Some(mode) = schema.mode(mode_id) else {
            tracing::debug!(mode = mode_id, "ignoring unknown mode");
            return;
        };
        let previous = self.state.mode().map(str::to_string);
        if previous.as_deref() == Some(mode_id) {
            return;
        }
        tracing::debug!(from = ?previous, to = mode_id, "switching mode");

        if let Some(previous) = &previous {
            self.remember_mode_values(previous);
        }

        let mut next = self.state.clone();
        next.set(MODE_KEY, mode_id);
        let mut next = reset_dependent_fields(&next, MODE_KEY, schema, previous.as_deref());

        // Restore remembered values before any default is backfilled.
        let remembered = self.remembered.remove(mode_id).unwrap_or_default();
        for (field_id, value) in remembered.iter() {
            if !next.contains(field_id) {
                next.set(field_id, value.clone());
            }
        }
        for field_id in &mode.fields {
            if next.contains(field_id) {
                continue;
            }
            if let Some(value) = schema.field(field_id).and_then(|f| f.default_value.clone()) {
                next.set(field_id.clone(), value);
            }
        }

        self.state = next;
        self.reconcile_options();
    }

    /// Sets `field_id` to `value` and clears fields that depended on it.
    ///
    /// Updating `mode` is routed through [`Session::set_mode`].
    pub fn update_field(&mut self, field_id: &str, value: impl Into<StateValue>) {
        let value = value.into();
        if field_id == MODE_KEY {
            if let Some(mode) = value.as_str() {
                self.set_mode(mode);
            }
            return;
        }
        tracing::debug!(field = field_id, value = ?value, "updating field");

        let mut next = self.state.clone();
        next.set(field_id, value);
        self.state = reset_dependent_fields(&next, field_id, self.schema, None);
        self.reconcile_options();
    }

    pub fn active_fields(&self) -> Vec<ResolvedField> {
        get_active_fields(self.schema, &self.state)
    }

    pub fn resolved_steps(&self) -> Vec<ResolvedStep> {
        resolve_steps(self.schema, &self.state)
    }

    pub fn field_options(&self, field_id: &str, sources: &dyn OptionSource) -> Vec<FieldOption> {
        get_field_options(self.schema, &self.state, field_id, sources)
    }

    fn remember_mode_values(&mut self, mode_id: &str) {
        let Some(mode) = self.schema.mode(mode_id) else {
            return;
        };
        let values: State = mode
            .fields
            .iter()
            .filter_map(|id| self.state.get(id).map(|v| (id.clone(), v.clone())))
            .collect();
        self.remembered.insert(mode_id.to_string(), values);
    }

    /// Moves single-choice fields whose value is missing or no longer offered
    /// onto the first option they currently resolve to.
    fn reconcile_options(&mut self) {
        let schema = self.schema;
        let Some(mode) = self.state.mode().and_then(|id| schema.mode(id)) else {
            return;
        };
        for field_id in &mode.fields {
            let Some(field) = schema.field(field_id) else {
                continue;
            };
            if !field.field_type.is_single_choice() || !dependencies_satisfied(field, &self.state) {
                continue;
            }
            let options = resolve_options(field, &self.state, schema);
            let Some(first) = options.first() else {
                continue;
            };
            let current = self.state.key_of(field_id);
            if current
                .as_deref()
                .is_some_and(|value| options.iter().any(|o| o.value == value))
            {
                continue;
            }
            tracing::debug!(field = %field_id, value = %first.value, "selecting first available option");
            self.state.set(field_id.clone(), first.value.clone());
            self.state = reset_dependent_fields(&self.state, field_id, schema, None);
        }
    }
}
