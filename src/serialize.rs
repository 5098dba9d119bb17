//! [`Schema`] → YAML serialization.

use crate::error::SerializeError;
use crate::types::Schema;

/// Serialize a Schema to a YAML string.
///
/// Branch arms keep their declaration order with `DEFAULT` emitted last, so
/// the output parses back into an equal schema.
pub fn serialize(schema: &Schema) -> Result<String, SerializeError> {
    let value = serde_json::to_value(schema).map_err(|e| SerializeError {
        message: format!("failed to convert schema to JSON value: {}", e),
    })?;

    serde_saphyr::to_string(&value).map_err(|e| SerializeError {
        message: format!("failed to serialize to YAML: {}", e),
    })
}
