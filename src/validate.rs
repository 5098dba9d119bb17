//! Schema validation against authoring rules S-001 through S-012.
//!
//! Returns **all** errors and warnings, not just the first. Validation does not
//! modify the schema. The resolution engine itself never requires a valid
//! schema; these rules catch authoring mistakes that would otherwise surface as
//! silently hidden fields or steps.

use crate::enums::FieldType;
use crate::error::*;
use crate::types::*;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

// ─── Cached regexes ─────────────────────────────────────────────────────────

static IDENTIFIER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9_-]*$").unwrap());

static TEMPLATE_VAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([a-zA-Z_][a-zA-Z0-9_-]*)\}\}").unwrap());

/// Validate a parsed schema against all authoring rules (S-001..S-012).
/// Returns a ValidationResult containing all errors and warnings found.
pub fn validate(schema: &Schema) -> ValidationResult {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    s001_modes_non_empty(schema, &mut errors);
    s002_unique_mode_ids(schema, &mut errors);
    s003_mode_fields_exist(schema, &mut errors);
    s004_field_key_matches_id(schema, &mut errors);
    s005_identifier_format(schema, &mut errors);
    s006_depends_on_targets(schema, &mut errors);
    s007_default_value_type(schema, &mut errors);
    s008_default_among_options(schema, &mut errors);
    s009_unique_step_ids(schema, &mut errors);
    s010_option_source_names(schema, &mut errors);
    s011_content_templates(schema, &mut errors);
    s012_key_order(schema, &mut errors);

    w001_unused_fields(schema, &mut warnings);
    w002_conditional_options_default(schema, &mut warnings);
    w003_step_branch_keys(schema, &mut warnings);

    ValidationResult { errors, warnings }
}

// ─── Helpers ────────────────────────────────────────────────────────────────

fn error(rule: &str, path: impl Into<String>, message: impl Into<String>) -> ValidationError {
    ValidationError {
        rule: rule.to_string(),
        path: path.into(),
        message: message.into(),
    }
}

/// State keys a schema may branch or depend on.
fn is_known_key(schema: &Schema, key: &str) -> bool {
    key == MODE_KEY || schema.fields.contains_key(key)
}

/// Every terminal step list in the tree, with its document path.
fn collect_step_lists<'a>(tree: &'a StepTree, path: &str, out: &mut Vec<(String, &'a [StepDefinition])>) {
    match tree {
        StepTree::Steps(steps) => out.push((path.to_string(), steps.as_slice())),
        StepTree::Branch(entries) => {
            for (field_id, branch) in entries {
                for (key, subtree) in branch.arms() {
                    collect_step_lists(subtree, &format!("{}.{}.{}", path, field_id, key), out);
                }
                if let Some(subtree) = branch.default_arm() {
                    collect_step_lists(subtree, &format!("{}.{}.{}", path, field_id, DEFAULT_KEY), out);
                }
            }
        }
    }
}

/// Every leaf of a conditional value, with its document path.
fn collect_leaves<'a, T>(value: &'a ConditionalValue<T>, path: &str, out: &mut Vec<(String, &'a T)>) {
    match value {
        ConditionalValue::Leaf(leaf) => out.push((path.to_string(), leaf)),
        ConditionalValue::Branch(branch) => {
            for (key, arm) in branch.arms() {
                collect_leaves(arm, &format!("{}.{}", path, key), out);
            }
            if let Some(arm) = branch.default_arm() {
                collect_leaves(arm, &format!("{}.{}", path, DEFAULT_KEY), out);
            }
        }
    }
}

// ─── S-001 ──────────────────────────────────────────────────────────────────

fn s001_modes_non_empty(schema: &Schema, errors: &mut Vec<ValidationError>) {
    if schema.modes.is_empty() {
        errors.push(error("S-001", "modes", "modes must contain at least one entry"));
    }
}

// ─── S-002 ──────────────────────────────────────────────────────────────────

fn s002_unique_mode_ids(schema: &Schema, errors: &mut Vec<ValidationError>) {
    let mut seen = HashSet::new();
    for (i, mode) in schema.modes.iter().enumerate() {
        if !seen.insert(mode.id.as_str()) {
            errors.push(error(
                "S-002",
                format!("modes[{}].id", i),
                format!("duplicate mode id: {}", mode.id),
            ));
        }
    }
}

// ─── S-003 ──────────────────────────────────────────────────────────────────

fn s003_mode_fields_exist(schema: &Schema, errors: &mut Vec<ValidationError>) {
    for (i, mode) in schema.modes.iter().enumerate() {
        let mut seen = HashSet::new();
        for (j, field_id) in mode.fields.iter().enumerate() {
            let path = format!("modes[{}].fields[{}]", i, j);
            if !schema.fields.contains_key(field_id) {
                errors.push(error(
                    "S-003",
                    path,
                    format!("mode '{}' lists undeclared field '{}'", mode.id, field_id),
                ));
            } else if !seen.insert(field_id.as_str()) {
                errors.push(error(
                    "S-003",
                    path,
                    format!("mode '{}' lists field '{}' twice", mode.id, field_id),
                ));
            }
        }
    }
}

// ─── S-004 ──────────────────────────────────────────────────────────────────

fn s004_field_key_matches_id(schema: &Schema, errors: &mut Vec<ValidationError>) {
    for (key, field) in &schema.fields {
        if *key != field.id {
            errors.push(error(
                "S-004",
                format!("fields.{}.id", key),
                format!("field declared under '{}' has id '{}'", key, field.id),
            ));
        }
    }
}

// ─── S-005 ──────────────────────────────────────────────────────────────────

fn s005_identifier_format(schema: &Schema, errors: &mut Vec<ValidationError>) {
    for (i, mode) in schema.modes.iter().enumerate() {
        if !IDENTIFIER_RE.is_match(&mode.id) {
            errors.push(error(
                "S-005",
                format!("modes[{}].id", i),
                format!("mode id must match [a-zA-Z][a-zA-Z0-9_-]*, got '{}'", mode.id),
            ));
        }
    }
    for key in schema.fields.keys() {
        if key == MODE_KEY || key == DEFAULT_KEY {
            errors.push(error(
                "S-005",
                format!("fields.{}", key),
                format!("'{}' is reserved and cannot be used as a field id", key),
            ));
        } else if !IDENTIFIER_RE.is_match(key) {
            errors.push(error(
                "S-005",
                format!("fields.{}", key),
                format!("field id must match [a-zA-Z][a-zA-Z0-9_-]*, got '{}'", key),
            ));
        }
    }
}

// ─── S-006 ──────────────────────────────────────────────────────────────────

fn s006_depends_on_targets(schema: &Schema, errors: &mut Vec<ValidationError>) {
    for (key, field) in &schema.fields {
        let Some(deps) = &field.depends_on else {
            continue;
        };
        for (target, values) in deps {
            let path = format!("fields.{}.dependsOn.{}", key, target);
            if target == key {
                errors.push(error("S-006", path, "a field cannot depend on itself"));
            } else if !is_known_key(schema, target) {
                errors.push(error(
                    "S-006",
                    path,
                    format!("dependsOn references unknown field '{}'", target),
                ));
            } else if values.is_empty() {
                errors.push(error(
                    "S-006",
                    path,
                    "dependsOn must list at least one accepted value",
                ));
            }
        }
    }
}

// ─── S-007 ──────────────────────────────────────────────────────────────────

fn s007_default_value_type(schema: &Schema, errors: &mut Vec<ValidationError>) {
    for (key, field) in &schema.fields {
        let Some(default) = &field.default_value else {
            continue;
        };
        let matches = match field.field_type {
            FieldType::Switch => matches!(default, StateValue::Bool(_)),
            FieldType::MultiSelect => matches!(default, StateValue::List(_)),
            FieldType::RadioGrid | FieldType::RadioList | FieldType::Select => {
                matches!(default, StateValue::Text(_))
            }
        };
        if !matches {
            errors.push(error(
                "S-007",
                format!("fields.{}.defaultValue", key),
                format!(
                    "default value {:?} does not fit a {} field",
                    default,
                    field.field_type.as_str()
                ),
            ));
        }
    }
}

// ─── S-008 ──────────────────────────────────────────────────────────────────

fn s008_default_among_options(schema: &Schema, errors: &mut Vec<ValidationError>) {
    for (key, field) in &schema.fields {
        let (Some(default), Some(FieldOptions::Static(options))) = (&field.default_value, &field.options)
        else {
            continue;
        };
        let declared: HashSet<&str> = options.iter().map(|o| o.value.as_str()).collect();
        let missing: Vec<&str> = match default {
            StateValue::Text(value) => vec![value.as_str()],
            StateValue::List(values) => values.iter().map(String::as_str).collect(),
            StateValue::Bool(_) => Vec::new(),
        };
        for value in missing.into_iter().filter(|v| !declared.contains(v)) {
            errors.push(error(
                "S-008",
                format!("fields.{}.defaultValue", key),
                format!("default '{}' is not one of the declared options", value),
            ));
        }
    }
}

// ─── S-009 ──────────────────────────────────────────────────────────────────

fn s009_unique_step_ids(schema: &Schema, errors: &mut Vec<ValidationError>) {
    let mut lists = Vec::new();
    collect_step_lists(&schema.steps, "steps", &mut lists);
    for (path, steps) in lists {
        let mut seen = HashSet::new();
        for (i, step) in steps.iter().enumerate() {
            if !seen.insert(step.id.as_str()) {
                errors.push(error(
                    "S-009",
                    format!("{}[{}].id", path, i),
                    format!("duplicate step id: {}", step.id),
                ));
            }
        }
    }
}

// ─── S-010 ──────────────────────────────────────────────────────────────────

fn s010_option_source_names(schema: &Schema, errors: &mut Vec<ValidationError>) {
    for (key, field) in &schema.fields {
        if let Some(FieldOptions::Source { source }) = &field.options
            && !IDENTIFIER_RE.is_match(source)
        {
            errors.push(error(
                "S-010",
                format!("fields.{}.options.source", key),
                format!("option source must match [a-zA-Z][a-zA-Z0-9_-]*, got '{}'", source),
            ));
        }
    }
}

// ─── S-011 ──────────────────────────────────────────────────────────────────

fn s011_content_templates(schema: &Schema, errors: &mut Vec<ValidationError>) {
    let mut lists = Vec::new();
    collect_step_lists(&schema.steps, "steps", &mut lists);
    for (path, steps) in lists {
        for (i, step) in steps.iter().enumerate() {
            let mut leaves = Vec::new();
            collect_leaves(&step.content, &format!("{}[{}].content", path, i), &mut leaves);
            for (leaf_path, leaf) in leaves {
                if let Some(content) = leaf {
                    check_template_string(schema, content, &leaf_path, errors);
                }
            }
        }
    }
}

fn check_template_string(
    schema: &Schema,
    content: &str,
    path: &str,
    errors: &mut Vec<ValidationError>,
) {
    for captures in TEMPLATE_VAR_RE.captures_iter(content) {
        let name = &captures[1];
        let escaped = captures
            .get(0)
            .is_some_and(|m| content[..m.start()].ends_with('\\'));
        if !escaped && !is_known_key(schema, name) {
            errors.push(error(
                "S-011",
                path,
                format!("content template references unknown field '{}'", name),
            ));
        }
    }
    if has_unclosed_placeholder(content) {
        errors.push(error("S-011", path, "unclosed template expression"));
    }
}

fn has_unclosed_placeholder(content: &str) -> bool {
    let bytes = content.as_bytes();
    let mut i = 0;
    while i + 1 < bytes.len() {
        if bytes[i] == b'\\' && bytes[i + 1] == b'{' {
            i += 2;
            continue;
        }
        if bytes[i] == b'{' && bytes[i + 1] == b'{' {
            match content[i + 2..].find("}}") {
                Some(end) => i += end + 4,
                None => return true,
            }
            continue;
        }
        i += 1;
    }
    false
}

// ─── S-012 ──────────────────────────────────────────────────────────────────

fn s012_key_order(schema: &Schema, errors: &mut Vec<ValidationError>) {
    let Some(order) = &schema.key_order else {
        return;
    };
    if order.is_empty() {
        errors.push(error("S-012", "keyOrder", "keyOrder, when present, must not be empty"));
    }
    let mut seen = HashSet::new();
    for (i, key) in order.iter().enumerate() {
        if !seen.insert(key.as_str()) {
            errors.push(error(
                "S-012",
                format!("keyOrder[{}]", i),
                format!("duplicate key in keyOrder: {}", key),
            ));
        }
    }
}

// ─── Warnings ───────────────────────────────────────────────────────────────

fn w001_unused_fields(schema: &Schema, warnings: &mut Vec<Diagnostic>) {
    let used: HashSet<&str> = schema
        .modes
        .iter()
        .flat_map(|mode| mode.fields.iter().map(String::as_str))
        .collect();
    for key in schema.fields.keys() {
        if !used.contains(key.as_str()) {
            warnings.push(Diagnostic::warning(
                "W-001",
                Some(format!("fields.{}", key)),
                format!("field '{}' is not listed by any mode", key),
            ));
        }
    }
}

fn w002_conditional_options_default(schema: &Schema, warnings: &mut Vec<Diagnostic>) {
    for (key, field) in &schema.fields {
        if let Some(FieldOptions::Conditional(ConditionalValue::Branch(branch))) = &field.options
            && branch.default_arm().is_none()
        {
            warnings.push(Diagnostic::warning(
                "W-002",
                Some(format!("fields.{}.options", key)),
                format!(
                    "conditional options of '{}' have no DEFAULT and resolve to [] for unlisted values",
                    key
                ),
            ));
        }
    }
}

fn w003_step_branch_keys(schema: &Schema, warnings: &mut Vec<Diagnostic>) {
    fn walk(schema: &Schema, tree: &StepTree, path: &str, warnings: &mut Vec<Diagnostic>) {
        let StepTree::Branch(entries) = tree else {
            return;
        };
        for (field_id, branch) in entries {
            let here = format!("{}.{}", path, field_id);
            if !is_known_key(schema, field_id) {
                warnings.push(Diagnostic::warning(
                    "W-003",
                    Some(here.clone()),
                    format!("step branch keyed on unknown field '{}' only ever takes DEFAULT", field_id),
                ));
            }
            for (key, subtree) in branch.arms() {
                walk(schema, subtree, &format!("{}.{}", here, key), warnings);
            }
            if let Some(subtree) = branch.default_arm() {
                walk(schema, subtree, &format!("{}.{}", here, DEFAULT_KEY), warnings);
            }
        }
    }
    walk(schema, &schema.steps, "steps", warnings);
}
