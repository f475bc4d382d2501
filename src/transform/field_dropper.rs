//! Field dropper transformer
//!
//! Removes fields from emitted rows, typically bookkeeping fields that the
//! destination has no use for.

use crate::etl::Transformer;
use crate::source::SourceRow;
use eyre::Result;

/// Transformer that drops named fields from each row's record
///
/// # Example
/// ```
/// use entity_source::etl::Transformer;
/// use entity_source::source::{SourceRow, flatten};
/// use entity_source::storage::RawRecord;
/// use entity_source::transform::FieldDropper;
/// use serde_json::{Map, json};
///
/// let keys: Map<String, serde_json::Value> = [("id".to_string(), json!({}))].into_iter().collect();
/// let raw = RawRecord::new().with("id", json!("7")).with("changed", json!(1700000000));
/// let row = SourceRow { id: "7".into(), record: flatten("7", raw, &keys).unwrap() };
///
/// let row = FieldDropper::new(vec!["changed"]).transform(row).unwrap();
/// assert!(row.record.get("changed").is_none());
/// assert_eq!(row.record.get("id"), Some(&json!("7")));
/// ```
#[derive(Debug, Clone, Default)]
pub struct FieldDropper {
    fields: Vec<String>,
}

impl FieldDropper {
    /// Create a new field dropper with the specified fields to remove
    pub fn new<I, F>(fields: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Drop the revision bookkeeping fields content repositories attach to entities
    ///
    /// Drops: revision_id, revision_created, revision_user, revision_log_message, changed
    pub fn revision_fields() -> Self {
        Self::new([
            "revision_id",
            "revision_created",
            "revision_user",
            "revision_log_message",
            "changed",
        ])
    }

    /// Also drop `fields`
    pub fn with_fields<I, F>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<String>,
    {
        self.fields.extend(fields.into_iter().map(Into::into));
        self
    }
}

impl Transformer for FieldDropper {
    type Input = SourceRow;
    type Output = SourceRow;

    fn transform(&self, mut input: Self::Input) -> Result<Self::Output> {
        for field in &self.fields {
            if input.record.remove(field).is_some() {
                log::trace!("Dropped field '{}' from row {}", field, input.id);
            }
        }
        Ok(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{IdentityKeys, flatten};
    use crate::storage::RawRecord;
    use serde_json::json;

    fn row(id: &str, raw: RawRecord) -> SourceRow {
        let keys: IdentityKeys = [("id".to_string(), json!({}))].into_iter().collect();
        SourceRow {
            id: id.to_string(),
            record: flatten(id, raw, &keys).unwrap(),
        }
    }

    #[test]
    fn test_drop_fields() {
        let dropper = FieldDropper::new(vec!["changed", "not_there"]);
        let input = row(
            "7",
            RawRecord::new()
                .with("id", json!("7"))
                .with("changed", json!(1))
                .with("title", json!("Seven")),
        );

        let output = dropper.transform(input).unwrap();

        assert!(output.record.get("changed").is_none());
        assert_eq!(output.record.get("title"), Some(&json!("Seven")));
        assert_eq!(output.record.len(), 2);
    }

    #[test]
    fn test_revision_fields() {
        let input = row(
            "7",
            RawRecord::new()
                .with("id", json!("7"))
                .with("revision_id", json!([{"value": 3}]))
                .with("revision_user", json!([{"target_id": 1}]))
                .with("changed", json!([{"value": 1700000000}])),
        );

        let output = FieldDropper::revision_fields().transform(input).unwrap();
        let names: Vec<&String> = output.record.fields().keys().collect();
        assert_eq!(names, vec!["id"]);
    }

    #[test]
    fn test_with_fields_extends_preset() {
        let dropper = FieldDropper::revision_fields().with_fields(["title"]);
        let input = row(
            "7",
            RawRecord::new()
                .with("id", json!("7"))
                .with("title", json!("Seven"))
                .with("changed", json!(1)),
        );

        let output = dropper.transform(input).unwrap();
        let names: Vec<&String> = output.record.fields().keys().collect();
        assert_eq!(names, vec!["id"]);
    }

    #[test]
    fn test_empty_dropper_is_noop() {
        let dropper = FieldDropper::default();

        let input = row("1", RawRecord::new().with("id", json!(1)));
        assert_eq!(dropper.transform(input.clone()).unwrap(), input);
    }
}
