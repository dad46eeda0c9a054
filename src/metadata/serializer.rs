use serde_json::Value;
use std::collections::HashMap;

use crate::metadata::error::MetadataError;
use crate::metadata::schema::ChunkMetadata;

/// A value the storage backend accepts. The vector store rejects null,
/// nested-mapping and nested-sequence payload values, so flattening reduces
/// everything to these four scalars.
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

/// Flatten a nested record into a single-level mapping of scalar values.
///
/// Keys of nested mappings are joined with `_`, so
/// `{"contact": {"phone": "123"}}` becomes `{"contact_phone": "123"}`.
/// Null values and empty mappings/sequences are omitted entirely (the store
/// rejects nulls; absence carries the same meaning). Non-empty sequences are
/// kept whole, serialized to a JSON-array string under the flattened key.
///
/// Total over any JSON value: a non-mapping input yields an empty result,
/// and no input can make it fail.
pub fn flatten_metadata(metadata: &Value, prefix: &str) -> HashMap<String, MetadataValue> {
    let mut flattened = HashMap::new();
    let Some(object) = metadata.as_object() else {
        return flattened;
    };

    for (key, value) in object {
        let new_key = format!("{prefix}{key}");

        match value {
            Value::Null => {}
            Value::Object(map) if map.is_empty() => {}
            Value::Object(_) => {
                flattened.extend(flatten_metadata(value, &format!("{new_key}_")));
            }
            Value::Array(items) if items.is_empty() => {}
            Value::Array(_) => {
                flattened.insert(new_key, MetadataValue::Text(value.to_string()));
            }
            Value::Bool(b) => {
                flattened.insert(new_key, MetadataValue::Bool(*b));
            }
            Value::Number(n) => {
                // Integer check first so 3 stays an integer; 3.5 falls
                // through to float; anything else (u64 beyond i64 range)
                // falls back to its string form.
                let scalar = if let Some(i) = n.as_i64() {
                    MetadataValue::Integer(i)
                } else if let Some(f) = n.as_f64() {
                    MetadataValue::Float(f)
                } else {
                    MetadataValue::Text(n.to_string())
                };
                flattened.insert(new_key, scalar);
            }
            Value::String(s) => {
                flattened.insert(new_key, MetadataValue::Text(s.clone()));
            }
        }
    }

    flattened
}

/// Prepare a `ChunkMetadata` record for storage.
///
/// The typed record is converted to the generic JSON tree first, so typed
/// models and decoded model output go through the same flattening path.
pub fn prepare_chunk_metadata(
    chunk: &ChunkMetadata,
) -> Result<HashMap<String, MetadataValue>, MetadataError> {
    let value = serde_json::to_value(chunk)?;
    Ok(flatten_metadata(&value, ""))
}
