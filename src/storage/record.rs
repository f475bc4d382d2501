//! Raw entity records as loaded from storage

use serde_json::{Map, Value};

/// One entry of a multi-value field, e.g. `{"value": "9"}`
pub type WrapperMap = Map<String, Value>;

/// A field value, classified once when the record is loaded
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// A plain value (string, number, object, or an array of non-objects)
    Scalar(Value),
    /// A sequence of value wrappers; an empty JSON array lands here too
    Multi(Vec<WrapperMap>),
}

impl FieldValue {
    /// Convert back into plain JSON
    pub fn into_json(self) -> Value {
        match self {
            FieldValue::Scalar(value) => value,
            FieldValue::Multi(wrappers) => {
                Value::Array(wrappers.into_iter().map(Value::Object).collect())
            }
        }
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(items) if items.iter().all(Value::is_object) => FieldValue::Multi(
                items
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::Object(map) => Some(map),
                        _ => None,
                    })
                    .collect(),
            ),
            other => FieldValue::Scalar(other),
        }
    }
}

/// An entity as loaded: field name to classified value, in field order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    fields: Vec<(String, FieldValue)>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from a JSON object, classifying every field value
    ///
    /// # Errors
    /// Returns an error if `value` is not an object
    pub fn from_json(value: Value) -> eyre::Result<Self> {
        match value {
            Value::Object(map) => Ok(map
                .into_iter()
                .fold(Self::new(), |record, (name, value)| record.with(name, value))),
            other => eyre::bail!("Entity must be a JSON object, got: {}", other),
        }
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: Value) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert or replace a field, keeping the original position on replace
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        let value = FieldValue::from(value);
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Consume the record, yielding each field with its classified value
    pub fn into_fields(self) -> impl Iterator<Item = (String, FieldValue)> {
        self.fields.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_classify_values() {
        assert_eq!(FieldValue::from(json!("7")), FieldValue::Scalar(json!("7")));
        assert_eq!(FieldValue::from(json!(3)), FieldValue::Scalar(json!(3)));
        assert_eq!(
            FieldValue::from(json!(["a", "b"])),
            FieldValue::Scalar(json!(["a", "b"]))
        );
        assert_eq!(FieldValue::from(json!([])), FieldValue::Multi(vec![]));

        match FieldValue::from(json!([{"value": "9"}, {"value": "10"}])) {
            FieldValue::Multi(wrappers) => {
                assert_eq!(wrappers.len(), 2);
                assert_eq!(wrappers[0]["value"], "9");
            }
            other => panic!("expected multi value, got {:?}", other),
        }
    }

    #[test]
    fn test_mixed_array_is_scalar() {
        let value = json!([{"value": 1}, 2]);
        assert_eq!(FieldValue::from(value.clone()), FieldValue::Scalar(value));
    }

    #[test]
    fn test_into_json_round_trips_wrappers() {
        let value = json!([{"value": "x", "lang": "en"}]);
        assert_eq!(FieldValue::from(value.clone()).into_json(), value);
    }

    #[test]
    fn test_from_json_requires_object() {
        assert!(RawRecord::from_json(json!([1, 2])).is_err());

        let record = RawRecord::from_json(json!({"id": "7", "tags": [{"value": "a"}]})).unwrap();
        assert_eq!(record.len(), 2);
        assert_eq!(record.get("id"), Some(&FieldValue::Scalar(json!("7"))));
        assert!(matches!(record.get("tags"), Some(FieldValue::Multi(w)) if w.len() == 1));
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut record = RawRecord::new().with("a", json!(1)).with("b", json!(2));
        record.insert("a", json!(3));
        let fields: Vec<(String, FieldValue)> = record.into_fields().collect();
        assert_eq!(fields[0], ("a".to_string(), FieldValue::Scalar(json!(3))));
        assert_eq!(fields.len(), 2);
    }

    #[test]
    fn test_fields_keep_insertion_order() {
        let record = RawRecord::new()
            .with("zeta", json!(1))
            .with("alpha", json!(2));
        let names: Vec<String> = record.into_fields().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
    }
}
