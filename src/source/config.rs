//! Source configuration and migration definition files
//!
//! A migration file names the entity type to read and the fields that
//! identify each row:
//! ```yaml
//! id: widgets
//! label: Widgets
//! source:
//!   entity_type: widget
//!   keys:
//!     id:
//!       type: string
//! ```

use super::SourceError;
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

/// Opaque per-key information, passed through to the migration engine
pub type KeyInfo = Value;

/// Identity key fields, in configured order
pub type IdentityKeys = Map<String, KeyInfo>;

/// Configuration of a single record source
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceConfiguration {
    /// Entity type to enumerate
    #[serde(default)]
    pub entity_type: String,
    /// Fields identifying a row; also the fields that get flattened
    #[serde(default)]
    pub keys: IdentityKeys,
}

impl SourceConfiguration {
    /// Configuration with the given key field names and empty key info
    pub fn new<I, K>(entity_type: impl Into<String>, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Self {
            entity_type: entity_type.into(),
            keys: keys
                .into_iter()
                .map(|k| (k.into(), Value::Object(Map::new())))
                .collect(),
        }
    }

    /// Check the fields every source needs
    pub fn validate(&self) -> std::result::Result<(), SourceError> {
        if self.entity_type.trim().is_empty() {
            return Err(SourceError::Configuration(
                "entity_type is required".to_string(),
            ));
        }
        if self.keys.is_empty() {
            return Err(SourceError::Configuration(format!(
                "at least one key is required for entity type '{}'",
                self.entity_type
            )));
        }
        Ok(())
    }
}

/// A migration file wrapping a source configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MigrationDefinition {
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
    pub source: SourceConfiguration,
}

impl MigrationDefinition {
    /// Read a migration file
    ///
    /// `.yml`/`.yaml` files are parsed as YAML, anything else as JSON5.
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read migration file: {}", path.display()))?;

        let is_yaml = path
            .extension()
            .and_then(|s| s.to_str())
            .is_some_and(|ext| matches!(ext, "yml" | "yaml"));

        let definition: Self = if is_yaml {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse migration YAML: {}", path.display()))?
        } else {
            json5::from_str(&content)
                .with_context(|| format!("Failed to parse migration JSON: {}", path.display()))?
        };

        log::debug!(
            "Read migration '{}' for entity type '{}'",
            definition.id,
            definition.source.entity_type
        );

        Ok(definition)
    }

    /// Label for display, falling back to the ID
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.id)
    }
}
