//! Flattened rows handed to the migration pipeline

use super::config::IdentityKeys;
use super::error::LoadError;
use crate::storage::{EntityId, FieldValue, RawRecord};
use serde::Serialize;
use serde_json::{Map, Value};

/// An entity with every identity key field collapsed to a scalar
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FlatRecord(Map<String, Value>);

impl FlatRecord {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.0.shift_remove(field)
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One emitted row: the entity ID and its flattened fields
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceRow {
    pub id: EntityId,
    pub record: FlatRecord,
}

impl SourceRow {
    /// Values of the identity key fields, in key order
    ///
    /// Keys absent from the record yield `Null`.
    pub fn identity(&self, keys: &IdentityKeys) -> Vec<Value> {
        keys.keys()
            .map(|key| self.record.get(key).cloned().unwrap_or(Value::Null))
            .collect()
    }
}

/// Collapse every key field of `raw` to a scalar
///
/// A wrapped key takes the `value` of its first wrapper. A missing key, an
/// empty wrapper list, a first wrapper without `value`, or a key whose first
/// element is not a wrapper is a malformed record. Non-key fields are copied
/// unchanged.
pub fn flatten(id: &str, raw: RawRecord, keys: &IdentityKeys) -> Result<FlatRecord, LoadError> {
    if let Some(field) = keys.keys().find(|key| !raw.contains(key)) {
        return Err(LoadError::MissingKey {
            id: id.to_string(),
            field: field.clone(),
        });
    }

    let mut flat = Map::new();
    for (name, value) in raw.into_fields() {
        let value = if keys.contains_key(&name) {
            flatten_key(id, &name, value)?
        } else {
            value.into_json()
        };
        flat.insert(name, value);
    }

    Ok(FlatRecord(flat))
}

fn flatten_key(id: &str, field: &str, value: FieldValue) -> Result<Value, LoadError> {
    let first = match value {
        FieldValue::Multi(wrappers) => wrappers.into_iter().next().map(Value::Object),
        FieldValue::Scalar(Value::Array(items)) => items.into_iter().next(),
        FieldValue::Scalar(Value::Object(_)) => {
            return Err(LoadError::NonScalarKey {
                id: id.to_string(),
                field: field.to_string(),
            });
        }
        FieldValue::Scalar(scalar) => return Ok(scalar),
    };

    match first {
        None => Err(LoadError::EmptyMultiValue {
            id: id.to_string(),
            field: field.to_string(),
        }),
        Some(Value::Object(mut wrapper)) => {
            wrapper
                .shift_remove("value")
                .ok_or_else(|| LoadError::MissingWrapperValue {
                    id: id.to_string(),
                    field: field.to_string(),
                })
        }
        Some(_) => Err(LoadError::NonScalarKey {
            id: id.to_string(),
            field: field.to_string(),
        }),
    }
}
