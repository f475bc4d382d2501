//! Directory-backed entity storage
//!
//! Layout of a repository directory:
//! ```text
//! repository/
//!   ├── types/
//!   │   └── widget.yml      (type definition)
//!   └── entities/
//!       └── widget/
//!           ├── 7.json      (one entity per file, JSON5 accepted)
//!           └── 9.json
//! ```

use super::{EntityId, EntityStorage, EntityTypeDescriptor, RawRecord};
use eyre::{Context, Result};
use std::path::{Path, PathBuf};

const ENTITY_EXTENSIONS: [&str; 2] = ["json", "json5"];
const TYPE_EXTENSIONS: [&str; 2] = ["yml", "yaml"];

/// Read entity types and entities from a repository directory
#[derive(Debug, Clone)]
pub struct DirectoryStorage {
    root: PathBuf,
}

impl DirectoryStorage {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn types_dir(&self) -> PathBuf {
        self.root.join("types")
    }

    fn entities_dir(&self, type_id: &str) -> PathBuf {
        self.root.join("entities").join(type_id)
    }

    fn type_path(&self, type_id: &str) -> Result<Option<PathBuf>> {
        check_segment("entity type", type_id)?;
        Ok(TYPE_EXTENSIONS
            .iter()
            .map(|ext| self.types_dir().join(format!("{}.{}", type_id, ext)))
            .find(|path| path.is_file()))
    }

    fn entity_path(&self, type_id: &str, id: &str) -> Result<Option<PathBuf>> {
        check_segment("entity type", type_id)?;
        check_segment("entity ID", id)?;
        Ok(ENTITY_EXTENSIONS
            .iter()
            .map(|ext| self.entities_dir(type_id).join(format!("{}.{}", id, ext)))
            .find(|path| path.is_file()))
    }
}

/// Type IDs and entity IDs name a single file or directory under the root
fn check_segment(kind: &str, value: &str) -> Result<()> {
    let invalid = value.is_empty()
        || value == "."
        || value == ".."
        || value.contains(['/', '\\', '\0']);

    if invalid {
        eyre::bail!("Invalid {} '{}': must be a single path segment", kind, value);
    }
    Ok(())
}

/// File stems of every matching file in `dir`, sorted; a missing directory is empty
fn list_stems(dir: &Path, extensions: &[&str]) -> Result<Vec<String>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut stems = Vec::new();
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory: {}", dir.display()))?
    {
        let path = entry?.path();
        let matches = path
            .extension()
            .and_then(|s| s.to_str())
            .is_some_and(|ext| extensions.contains(&ext));

        if matches && let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            stems.push(stem.to_string());
        }
    }

    stems.sort();
    stems.dedup();
    Ok(stems)
}

impl EntityStorage for DirectoryStorage {
    fn resolve_type(&self, type_id: &str) -> Result<Option<EntityTypeDescriptor>> {
        let Some(path) = self.type_path(type_id)? else {
            log::debug!("No type definition for '{}' in {}", type_id, self.types_dir().display());
            return Ok(None);
        };

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read type definition: {}", path.display()))?;
        let mut descriptor: EntityTypeDescriptor = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse type definition: {}", path.display()))?;

        if descriptor.id.is_empty() {
            descriptor.id = type_id.to_string();
        } else if descriptor.id != type_id {
            eyre::bail!(
                "Type definition {} declares id '{}', expected '{}'",
                path.display(),
                descriptor.id,
                type_id
            );
        }

        Ok(Some(descriptor))
    }

    /// IDs are entity file stems, sorted lexically
    fn query_ids(&self, type_id: &str) -> Result<Vec<EntityId>> {
        check_segment("entity type", type_id)?;
        let dir = self.entities_dir(type_id);
        let ids = list_stems(&dir, &ENTITY_EXTENSIONS)?;
        log::debug!("Found {} '{}' entities in {}", ids.len(), type_id, dir.display());
        Ok(ids)
    }

    fn load(&self, type_id: &str, id: &str) -> Result<Option<RawRecord>> {
        let Some(path) = self.entity_path(type_id, id)? else {
            return Ok(None);
        };

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read entity: {}", path.display()))?;
        let value: serde_json::Value = json5::from_str(&content)
            .with_context(|| format!("Failed to parse entity: {}", path.display()))?;

        RawRecord::from_json(value).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{Cardinality, FieldValue};
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn repository() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("types")).unwrap();
        fs::create_dir_all(root.join("entities/widget")).unwrap();

        fs::write(
            root.join("types/widget.yml"),
            "label: Widget\nfields:\n  - name: id\n    label: ID\n    description: The widget ID.\n  - name: tags\n    label: Tags\n    description: Tags.\n    cardinality: multiple\n",
        )
        .unwrap();
        fs::write(root.join("entities/widget/9.json"), r#"{"id": [{"value": "9"}]}"#).unwrap();
        fs::write(
            root.join("entities/widget/7.json"),
            "{\n  // lenient\n  id: \"7\",\n  tags: [{value: \"a\"},],\n}",
        )
        .unwrap();
        fs::write(root.join("entities/widget/notes.txt"), "ignored").unwrap();

        temp
    }

    #[test]
    fn test_resolve_type_fills_id_from_filename() {
        let temp = repository();
        let storage = DirectoryStorage::new(temp.path());

        let descriptor = storage.resolve_type("widget").unwrap().unwrap();
        assert_eq!(descriptor.id, "widget");
        assert_eq!(descriptor.fields[1].cardinality, Cardinality::Multiple);
        assert!(storage.resolve_type("gadget").unwrap().is_none());
    }

    #[test]
    fn test_resolve_type_rejects_mismatched_id() {
        let temp = repository();
        fs::write(temp.path().join("types/gadget.yaml"), "id: widget\n").unwrap();

        let storage = DirectoryStorage::new(temp.path());
        assert!(storage.resolve_type("gadget").is_err());
    }

    #[test]
    fn test_query_ids_sorted_and_filtered() {
        let temp = repository();
        let storage = DirectoryStorage::new(temp.path());

        assert_eq!(storage.query_ids("widget").unwrap(), vec!["7", "9"]);
        assert!(storage.query_ids("gadget").unwrap().is_empty());
    }

    #[test]
    fn test_load_json5_entity() {
        let temp = repository();
        let storage = DirectoryStorage::new(temp.path());

        let seven = storage.load("widget", "7").unwrap().unwrap();
        assert_eq!(seven.get("id"), Some(&FieldValue::Scalar(json!("7"))));
        assert!(matches!(seven.get("tags"), Some(FieldValue::Multi(w)) if w[0]["value"] == "a"));

        assert!(storage.load("widget", "8").unwrap().is_none());
    }

    #[test]
    fn test_rejects_path_segments() {
        let temp = repository();
        let storage = DirectoryStorage::new(temp.path().join("entities"));

        assert!(storage.resolve_type("../types/widget").is_err());
        assert!(storage.resolve_type("..").is_err());
        assert!(storage.query_ids("widget/../widget").is_err());
        assert!(storage.load("widget", "..\\7").is_err());
        assert!(storage.load("widget", "").is_err());

        let storage = DirectoryStorage::new(temp.path());
        assert!(storage.load("widget", "7").unwrap().is_some());
        assert!(storage.resolve_type("widget.v2").unwrap().is_none());
    }

    #[test]
    fn test_load_rejects_non_object() {
        let temp = repository();
        fs::write(temp.path().join("entities/widget/bad.json"), "[1, 2]").unwrap();

        let storage = DirectoryStorage::new(temp.path());
        assert!(storage.load("widget", "bad").is_err());
    }
}
