//! Entity record source
//!
//! Enumerates every entity of one type and emits flattened rows. The ID
//! query runs eagerly when a pass starts; entities are loaded one per pull.

use super::config::{IdentityKeys, SourceConfiguration};
use super::error::{LoadError, SourceError};
use super::row::{SourceRow, flatten};
use crate::etl::Extractor;
use crate::storage::{Cardinality, EntityId, EntityStorage, EntityTypeDescriptor};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

type Result<T> = std::result::Result<T, SourceError>;

/// Where a stateful source is in its iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceState {
    /// No query issued; the next pull starts a pass
    Unstarted,
    /// Query issued, cursor over the ID list active
    Iterating,
}

/// Field name to `"label: description"`, in declared order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldDescriptions(Vec<(String, String)>);

impl FieldDescriptions {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, text)| text.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(name, text)| (name.as_str(), text.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Pending IDs of one pass
#[derive(Debug)]
struct Cursor {
    ids: std::vec::IntoIter<EntityId>,
}

/// Reads every entity of a configured type and flattens it into a [`SourceRow`]
///
/// # Example
/// ```
/// use entity_source::source::{RecordSource, SourceConfiguration};
/// use entity_source::storage::{EntityTypeDescriptor, FieldDefinition, MemoryStorage, RawRecord};
/// use serde_json::json;
///
/// let mut storage = MemoryStorage::new();
/// storage.define(EntityTypeDescriptor::new(
///     "widget",
///     vec![FieldDefinition::new("id", "ID", "The widget ID.")],
/// ));
/// storage.insert("widget", "9", RawRecord::new().with("id", json!([{"value": "9"}]))).unwrap();
///
/// let source = RecordSource::new(SourceConfiguration::new("widget", ["id"]), storage).unwrap();
/// let rows = source.records().unwrap().collect::<Result<Vec<_>, _>>().unwrap();
///
/// assert_eq!(rows[0].id, "9");
/// assert_eq!(rows[0].record.get("id"), Some(&json!("9")));
/// ```
pub struct RecordSource<S> {
    config: SourceConfiguration,
    storage: S,
    descriptor: OnceLock<EntityTypeDescriptor>,
    cursor: Option<Cursor>,
}

impl<S: EntityStorage> RecordSource<S> {
    /// Create a source; storage is not contacted until first use
    ///
    /// # Errors
    /// [`SourceError::Configuration`] if the entity type or the keys are missing
    pub fn new(config: SourceConfiguration, storage: S) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            storage,
            descriptor: OnceLock::new(),
            cursor: None,
        })
    }

    pub fn entity_type(&self) -> &str {
        &self.config.entity_type
    }

    pub fn configuration(&self) -> &SourceConfiguration {
        &self.config
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// The resolved type, looked up once and cached
    pub fn descriptor(&self) -> Result<&EntityTypeDescriptor> {
        if let Some(descriptor) = self.descriptor.get() {
            return Ok(descriptor);
        }

        let type_id = self.entity_type();
        let resolved = self
            .storage
            .resolve_type(type_id)
            .map_err(|e| SourceError::UnknownType {
                type_id: type_id.to_string(),
                source: Some(e.into()),
            })?
            .ok_or_else(|| SourceError::UnknownType {
                type_id: type_id.to_string(),
                source: None,
            })?;

        log::debug!("Resolved entity type '{}'", resolved.id);
        Ok(self.descriptor.get_or_init(|| resolved))
    }

    /// Describe every base field of the type as `"label: description"`
    pub fn describe_fields(&self) -> Result<FieldDescriptions> {
        let descriptor = self.descriptor()?;
        Ok(FieldDescriptions(
            self.storage
                .base_field_definitions(descriptor)
                .into_iter()
                .map(|field| {
                    let text = field.display_text();
                    (field.name, text)
                })
                .collect(),
        ))
    }

    /// The configured identity keys, verbatim
    pub fn identity_keys(&self) -> &IdentityKeys {
        &self.config.keys
    }

    /// Fail if any identity key is not a base field of the type
    ///
    /// Keys declared multi-value are accepted; only their first value
    /// identifies the row, which is logged as a warning.
    pub fn validate_keys(&self) -> Result<()> {
        let descriptor = self.descriptor()?;
        for key in self.identity_keys().keys() {
            if descriptor
                .field(key)
                .is_some_and(|field| field.cardinality == Cardinality::Multiple)
            {
                log::warn!(
                    "Key field '{}' of '{}' is multi-value; only its first value is used",
                    key,
                    self.entity_type()
                );
            }
        }

        let fields = self.describe_fields()?;
        let unknown: Vec<&str> = self
            .identity_keys()
            .keys()
            .map(String::as_str)
            .filter(|key| !fields.contains(key))
            .collect();

        if unknown.is_empty() {
            Ok(())
        } else {
            Err(SourceError::Configuration(format!(
                "key field(s) {} are not defined on entity type '{}'",
                unknown.join(", "),
                self.entity_type()
            )))
        }
    }

    /// Number of rows a pass would produce
    pub fn count(&self) -> Result<usize> {
        self.query().map(|ids| ids.len())
    }

    /// Start an independent pass over every entity
    ///
    /// The ID query runs now; each `next()` loads one entity. Calling this
    /// again re-runs the query and reloads everything.
    pub fn records(&self) -> Result<Records<'_, S>> {
        Ok(Records {
            source: self,
            cursor: Some(self.start()?),
        })
    }

    pub fn state(&self) -> SourceState {
        match self.cursor {
            Some(_) => SourceState::Iterating,
            None => SourceState::Unstarted,
        }
    }

    /// Discard any active cursor and re-issue the query
    pub fn rewind(&mut self) -> Result<()> {
        self.cursor = None;
        self.cursor = Some(self.start()?);
        Ok(())
    }

    /// Pull the next row, starting a pass if none is active
    ///
    /// The end of a pass returns `None` and leaves the source ready to
    /// start over. An error also ends the pass.
    pub fn next_row(&mut self) -> Option<Result<SourceRow>> {
        if self.cursor.is_none()
            && let Err(e) = self.rewind()
        {
            return Some(Err(e));
        }

        let mut cursor = self.cursor.take()?;
        let next = self.pull(&mut cursor);
        if matches!(next, Some(Ok(_))) {
            self.cursor = Some(cursor);
        } else if next.is_none() {
            log::debug!("Finished pass over '{}' entities", self.entity_type());
        }
        next
    }

    /// Capture everything needed to rebuild this source, without the cursor
    pub fn snapshot(&self) -> SourceSnapshot {
        SourceSnapshot {
            config: self.config.clone(),
        }
    }

    /// Resolve the type, then fetch every ID of it
    fn query(&self) -> Result<Vec<EntityId>> {
        self.descriptor()?;
        let type_id = self.entity_type();
        self.storage
            .query_ids(type_id)
            .map_err(|e| SourceError::Query {
                type_id: type_id.to_string(),
                source: e.into(),
            })
    }

    fn start(&self) -> Result<Cursor> {
        let ids = self.query()?;
        log::info!("Starting pass over {} '{}' entities", ids.len(), self.entity_type());
        Ok(Cursor {
            ids: ids.into_iter(),
        })
    }

    fn pull(&self, cursor: &mut Cursor) -> Option<Result<SourceRow>> {
        let id = cursor.ids.next()?;
        Some(self.load_row(id))
    }

    fn load_row(&self, id: EntityId) -> Result<SourceRow> {
        let type_id = self.entity_type();
        log::debug!("Loading '{}' entity {}", type_id, id);

        let raw = self
            .storage
            .load(type_id, &id)
            .map_err(|e| LoadError::Storage {
                type_id: type_id.to_string(),
                id: id.clone(),
                source: e.into(),
            })?
            .ok_or_else(|| LoadError::NotFound {
                type_id: type_id.to_string(),
                id: id.clone(),
            })?;

        let record = flatten(&id, raw, self.identity_keys())?;
        Ok(SourceRow { id, record })
    }
}

impl<S> fmt::Display for RecordSource<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" entity source", self.config.entity_type)
    }
}

impl<S> fmt::Debug for RecordSource<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordSource")
            .field("config", &self.config)
            .field("resolved", &self.descriptor.get().is_some())
            .field("iterating", &self.cursor.is_some())
            .finish()
    }
}

/// One pass over a [`RecordSource`], created by [`RecordSource::records`]
///
/// Yields `Err` at most once; the pass ends after the first failure.
pub struct Records<'a, S> {
    source: &'a RecordSource<S>,
    cursor: Option<Cursor>,
}

impl<S: EntityStorage> Iterator for Records<'_, S> {
    type Item = Result<SourceRow>;

    fn next(&mut self) -> Option<Self::Item> {
        let cursor = self.cursor.as_mut()?;
        let next = self.source.pull(cursor);
        if !matches!(next, Some(Ok(_))) {
            self.cursor = None;
        }
        next
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.cursor {
            Some(cursor) => (0, Some(cursor.ids.len())),
            None => (0, Some(0)),
        }
    }
}

impl<S> Extractor for RecordSource<S>
where
    S: EntityStorage + Send + Sync,
{
    type Item = SourceRow;

    async fn extract(&self) -> eyre::Result<Vec<Self::Item>> {
        let rows = self.records()?.collect::<Result<Vec<_>>>()?;
        log::info!("Extracted {} rows from {}", rows.len(), self);
        Ok(rows)
    }
}

/// Persisted form of a [`RecordSource`]: configuration only
///
/// Resuming always starts from the first entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSnapshot {
    pub config: SourceConfiguration,
}

impl SourceSnapshot {
    /// Rebuild an unstarted source over `storage`
    pub fn resume<S: EntityStorage>(self, storage: S) -> Result<RecordSource<S>> {
        RecordSource::new(self.config, storage)
    }
}
