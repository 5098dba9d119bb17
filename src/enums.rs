//! Closed enumerations used by the schema types.

use serde::{Deserialize, Serialize};

/// How a field is presented, which also fixes the shape of its state value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldType {
    RadioGrid,
    RadioList,
    Select,
    Switch,
    MultiSelect,
}

impl FieldType {
    /// Whether the field picks exactly one value out of an option list.
    pub fn is_single_choice(self) -> bool {
        matches!(
            self,
            FieldType::RadioGrid | FieldType::RadioList | FieldType::Select
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::RadioGrid => "radio-grid",
            FieldType::RadioList => "radio-list",
            FieldType::Select => "select",
            FieldType::Switch => "switch",
            FieldType::MultiSelect => "multi-select",
        }
    }
}
