use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::enums::FieldType;

/// Reserved branch key selected when no candidate value matches.
pub const DEFAULT_KEY: &str = "DEFAULT";

/// State key holding the current mode id.
pub const MODE_KEY: &str = "mode";

// ─── State ───────────────────────────────────────────────────────────────────

/// A single selection held in [`State`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StateValue {
    Bool(bool),
    Text(String),
    List(Vec<String>),
}

impl StateValue {
    /// String form used when comparing a selection with schema keys.
    ///
    /// Booleans become `"true"`/`"false"` and lists are joined with `,`.
    pub fn as_key(&self) -> String {
        match self {
            StateValue::Bool(b) => b.to_string(),
            StateValue::Text(s) => s.clone(),
            StateValue::List(items) => items.join(","),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            StateValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            StateValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl From<&str> for StateValue {
    fn from(s: &str) -> Self {
        StateValue::Text(s.to_string())
    }
}

impl From<String> for StateValue {
    fn from(s: String) -> Self {
        StateValue::Text(s)
    }
}

impl From<bool> for StateValue {
    fn from(b: bool) -> Self {
        StateValue::Bool(b)
    }
}

impl From<Vec<String>> for StateValue {
    fn from(items: Vec<String>) -> Self {
        StateValue::List(items)
    }
}

impl From<Vec<&str>> for StateValue {
    fn from(items: Vec<&str>) -> Self {
        StateValue::List(items.into_iter().map(str::to_string).collect())
    }
}

/// Flat wizard state: field id to selection. Absent keys mean "no value".
///
/// Keys are kept sorted so equal states always serialize identically.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct State {
    values: BTreeMap<String, StateValue>,
}

impl State {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`State::set`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<StateValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&StateValue> {
        self.values.get(key)
    }

    /// Stringified value for `key`, or `None` when the key is absent.
    pub fn key_of(&self, key: &str) -> Option<String> {
        self.values.get(key).map(StateValue::as_key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<StateValue>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<StateValue> {
        self.values.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Current mode id, if one is set.
    pub fn mode(&self) -> Option<&str> {
        self.values.get(MODE_KEY).and_then(StateValue::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StateValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<StateValue>> FromIterator<(K, V)> for State {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut state = State::new();
        for (k, v) in iter {
            state.set(k, v);
        }
        state
    }
}

// ─── Schema ──────────────────────────────────────────────────────────────────

/// The static declarative description of a wizard.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    pub modes: Vec<Mode>,
    #[serde(default)]
    pub fields: BTreeMap<String, FieldDefinition>,
    #[serde(default)]
    pub steps: StepTree,
    /// Candidate key order for conditional resolution. Falls back to
    /// [`crate::conditional::CANONICAL_KEY_ORDER`] when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_order: Option<Vec<String>>,
}

impl Schema {
    pub fn mode(&self, id: &str) -> Option<&Mode> {
        self.modes.iter().find(|m| m.id == id)
    }

    pub fn field(&self, id: &str) -> Option<&FieldDefinition> {
        self.fields.get(id)
    }

    /// The key order conditional values are resolved against.
    pub fn candidate_keys(&self) -> Vec<&str> {
        match &self.key_order {
            Some(order) => order.iter().map(String::as_str).collect(),
            None => crate::conditional::CANONICAL_KEY_ORDER.to_vec(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mode {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub fields: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Field id to accepted stringified values. Every entry must hold.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depends_on: Option<BTreeMap<String, Vec<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<StateValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<FieldOptions>,
}

impl FieldDefinition {
    /// Whether this field's visibility depends on `field_id`.
    pub fn depends_on_field(&self, field_id: &str) -> bool {
        self.depends_on
            .as_ref()
            .is_some_and(|deps| deps.contains_key(field_id))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    pub value: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl FieldOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        FieldOption {
            value: value.into(),
            label: label.into(),
            description: None,
            icon: None,
        }
    }
}

/// Where a field's options come from.
///
/// A YAML sequence is a static list, a mapping holding only a string `source`
/// is an external reference, and any other mapping is a conditional list.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldOptions {
    Static(Vec<FieldOption>),
    Source { source: String },
    Conditional(ConditionalValue<Vec<FieldOption>>),
}

impl Serialize for FieldOptions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        match self {
            FieldOptions::Static(options) => options.serialize(serializer),
            FieldOptions::Source { source } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("source", source)?;
                map.end()
            }
            FieldOptions::Conditional(value) => value.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for FieldOptions {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        if value.is_array() {
            return serde_json::from_value(value)
                .map(FieldOptions::Static)
                .map_err(serde::de::Error::custom);
        }
        if let Some(source) = source_reference(&value) {
            return Ok(FieldOptions::Source { source });
        }
        if value.is_object() {
            return ConditionalValue::from_value(value)
                .map(FieldOptions::Conditional)
                .map_err(serde::de::Error::custom);
        }
        Err(serde::de::Error::custom(
            "options must be a list, a {source} reference, or a conditional mapping",
        ))
    }
}

/// `{source: "name"}` and nothing else.
fn source_reference(value: &Value) -> Option<String> {
    let map = value.as_object()?;
    if map.len() != 1 {
        return None;
    }
    map.get("source")?.as_str().map(str::to_string)
}

// ─── Conditional values ──────────────────────────────────────────────────────

/// Ordered string-keyed alternatives with an optional `DEFAULT` fallback.
#[derive(Clone, Debug, PartialEq)]
pub struct Branch<V> {
    arms: Vec<(String, V)>,
    default: Option<Box<V>>,
}

impl<V> Default for Branch<V> {
    fn default() -> Self {
        Branch {
            arms: Vec::new(),
            default: None,
        }
    }
}

impl<V> Branch<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the arm for `key`. A `DEFAULT` key sets the fallback.
    pub fn arm(mut self, key: impl Into<String>, value: V) -> Self {
        let key = key.into();
        if key == DEFAULT_KEY {
            self.default = Some(Box::new(value));
            return self;
        }
        match self.arms.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.arms.push((key, value)),
        }
        self
    }

    pub fn with_default(mut self, value: V) -> Self {
        self.default = Some(Box::new(value));
        self
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.arms.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn default_arm(&self) -> Option<&V> {
        self.default.as_deref()
    }

    /// The arm for `key`, falling back to `DEFAULT`.
    pub fn get_or_default(&self, key: Option<&str>) -> Option<&V> {
        key.and_then(|k| self.get(k)).or_else(|| self.default_arm())
    }

    /// Arm keys in declaration order, excluding `DEFAULT`.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.arms.iter().map(|(k, _)| k.as_str())
    }

    pub fn arms(&self) -> impl Iterator<Item = (&str, &V)> {
        self.arms.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.arms.is_empty() && self.default.is_none()
    }

    pub(crate) fn from_json(
        value: Value,
        convert: impl Fn(Value) -> Result<V, String>,
    ) -> Result<Self, String> {
        let Value::Object(map) = value else {
            return Err(format!("expected a mapping, got {}", value));
        };
        let mut branch = Branch::new();
        for (key, entry) in map {
            let converted = convert(entry).map_err(|e| format!("{}: {}", key, e))?;
            branch = branch.arm(key, converted);
        }
        Ok(branch)
    }
}

impl<V: Serialize> Serialize for Branch<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let len = self.arms.len() + usize::from(self.default.is_some());
        let mut map = serializer.serialize_map(Some(len))?;
        for (key, value) in &self.arms {
            map.serialize_entry(key, value)?;
        }
        if let Some(default) = &self.default {
            map.serialize_entry(DEFAULT_KEY, default)?;
        }
        map.end()
    }
}

/// A value that is either fixed or branches on state before yielding a `T`.
#[derive(Clone, Debug, PartialEq)]
pub enum ConditionalValue<T> {
    Leaf(T),
    Branch(Branch<ConditionalValue<T>>),
}

impl<T> ConditionalValue<T> {
    pub fn leaf(value: T) -> Self {
        ConditionalValue::Leaf(value)
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, ConditionalValue::Leaf(_))
    }
}

impl<T> From<Branch<ConditionalValue<T>>> for ConditionalValue<T> {
    fn from(branch: Branch<ConditionalValue<T>>) -> Self {
        ConditionalValue::Branch(branch)
    }
}

/// Decides which document shapes are leaves for a given leaf type.
///
/// Everything that is not a leaf must be a mapping and is read as a branch,
/// so an object-shaped leaf type has to claim its shape here explicitly.
pub trait LeafShape: DeserializeOwned {
    fn is_leaf(value: &Value) -> bool;
}

impl LeafShape for String {
    fn is_leaf(value: &Value) -> bool {
        value.is_string()
    }
}

impl LeafShape for Option<String> {
    fn is_leaf(value: &Value) -> bool {
        value.is_string() || value.is_null()
    }
}

impl LeafShape for bool {
    fn is_leaf(value: &Value) -> bool {
        value.is_boolean()
    }
}

impl LeafShape for Vec<String> {
    fn is_leaf(value: &Value) -> bool {
        value.is_array()
    }
}

impl LeafShape for Vec<FieldOption> {
    fn is_leaf(value: &Value) -> bool {
        value.is_array()
    }
}

impl<T: LeafShape> ConditionalValue<T> {
    /// Build a conditional value from its document form.
    pub fn from_value(value: Value) -> Result<Self, String> {
        if T::is_leaf(&value) {
            return serde_json::from_value(value)
                .map(ConditionalValue::Leaf)
                .map_err(|e| e.to_string());
        }
        if value.is_object() {
            return Branch::from_json(value, ConditionalValue::from_value).map(ConditionalValue::Branch);
        }
        Err(format!(
            "expected a leaf value or a mapping of branches, got {}",
            value
        ))
    }
}

impl<T: Serialize> Serialize for ConditionalValue<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ConditionalValue::Leaf(value) => value.serialize(serializer),
            ConditionalValue::Branch(branch) => branch.serialize(serializer),
        }
    }
}

impl<'de, T: LeafShape> Deserialize<'de> for ConditionalValue<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        ConditionalValue::from_value(value).map_err(serde::de::Error::custom)
    }
}

// ─── Steps ───────────────────────────────────────────────────────────────────

/// One unit of instructional content. `content` is a content path for the
/// caller's loader and may resolve to nothing, which hides the step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StepDefinition {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub content: ConditionalValue<Option<String>>,
}

/// Step tree: a terminal list, or field-keyed value maps of nested trees.
///
/// Sibling entries of a branching node are independent and all contribute.
#[derive(Clone, Debug, PartialEq)]
pub enum StepTree {
    Steps(Vec<StepDefinition>),
    Branch(Vec<(String, Branch<StepTree>)>),
}

impl Default for StepTree {
    fn default() -> Self {
        StepTree::Steps(Vec::new())
    }
}

impl StepTree {
    pub fn from_value(value: Value) -> Result<Self, String> {
        if value.is_array() {
            return serde_json::from_value(value)
                .map(StepTree::Steps)
                .map_err(|e| e.to_string());
        }
        let Value::Object(map) = value else {
            return Err(format!(
                "step tree must be a list of steps or a mapping, got {}",
                value
            ));
        };
        let mut entries = Vec::with_capacity(map.len());
        for (field_id, value_map) in map {
            let branch = Branch::from_json(value_map, StepTree::from_value)
                .map_err(|e| format!("{}: {}", field_id, e))?;
            entries.push((field_id, branch));
        }
        Ok(StepTree::Branch(entries))
    }
}

impl Serialize for StepTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        match self {
            StepTree::Steps(steps) => steps.serialize(serializer),
            StepTree::Branch(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (field_id, branch) in entries {
                    map.serialize_entry(field_id, branch)?;
                }
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for StepTree {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        StepTree::from_value(value).map_err(serde::de::Error::custom)
    }
}

// ─── Resolution results ──────────────────────────────────────────────────────

/// An active field together with the options it currently offers.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedField {
    #[serde(flatten)]
    pub field: FieldDefinition,
    pub resolved_options: Vec<FieldOption>,
}

impl ResolvedField {
    pub fn id(&self) -> &str {
        &self.field.id
    }
}

/// A step whose content has been resolved to a concrete content path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedStep {
    pub id: String,
    pub title: String,
    pub description: String,
    pub content: String,
}
