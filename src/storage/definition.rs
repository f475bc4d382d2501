//! Entity type and field definitions
//!
//! Types are stored as YAML by [`DirectoryStorage`](super::DirectoryStorage):
//! ```yaml
//! id: widget
//! label: Widget
//! fields:
//!   - name: id
//!     label: ID
//!     description: The widget ID.
//!   - name: tags
//!     label: Tags
//!     description: Free tagging.
//!     cardinality: multiple
//! ```

use serde::{Deserialize, Serialize};

/// Whether a field holds one value or a sequence of value wrappers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cardinality {
    #[default]
    Single,
    Multiple,
}

/// A base field declared by an entity type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cardinality: Cardinality,
}

impl FieldDefinition {
    /// Create a single-value field definition
    pub fn new(
        name: impl Into<String>,
        label: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            description: description.into(),
            cardinality: Cardinality::Single,
        }
    }

    /// Mark this field as multi-value
    pub fn multiple(mut self) -> Self {
        self.cardinality = Cardinality::Multiple;
        self
    }

    /// Human-readable `"label: description"` rendering
    pub fn display_text(&self) -> String {
        format!("{}: {}", self.label, self.description)
    }
}

/// A resolved entity type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityTypeDescriptor {
    /// Unique type identifier; taken from the file name when omitted
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
    /// Base fields, in declared order
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

impl EntityTypeDescriptor {
    pub fn new(id: impl Into<String>, fields: Vec<FieldDefinition>) -> Self {
        Self {
            id: id.into(),
            label: None,
            fields,
        }
    }

    /// Look up a base field by name
    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_type_yaml() {
        let yaml = r#"
id: widget
label: Widget
fields:
  - name: id
    label: ID
    description: The widget ID.
  - name: tags
    label: Tags
    description: Free tagging.
    cardinality: multiple
"#;
        let descriptor: EntityTypeDescriptor = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(descriptor.id, "widget");
        assert_eq!(descriptor.label.as_deref(), Some("Widget"));
        assert_eq!(descriptor.fields.len(), 2);
        assert_eq!(descriptor.fields[0].cardinality, Cardinality::Single);
        assert_eq!(descriptor.field("tags").unwrap().cardinality, Cardinality::Multiple);
        assert!(descriptor.field("missing").is_none());
    }

    #[test]
    fn test_display_text() {
        let field = FieldDefinition::new("uuid", "UUID", "The entity UUID.");
        assert_eq!(field.display_text(), "UUID: The entity UUID.");
    }
}
