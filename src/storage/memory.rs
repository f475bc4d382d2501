//! In-memory entity storage

use super::{EntityId, EntityStorage, EntityTypeDescriptor, RawRecord};
use eyre::Result;

#[derive(Debug, Clone)]
struct TypeEntry {
    descriptor: EntityTypeDescriptor,
    entities: Vec<(EntityId, RawRecord)>,
}

/// Entity storage held entirely in memory
///
/// IDs are returned in insertion order.
///
/// # Example
/// ```
/// use entity_source::storage::{
///     EntityStorage, EntityTypeDescriptor, FieldDefinition, MemoryStorage, RawRecord,
/// };
/// use serde_json::json;
///
/// let mut storage = MemoryStorage::new();
/// storage.define(EntityTypeDescriptor::new(
///     "widget",
///     vec![FieldDefinition::new("id", "ID", "The widget ID.")],
/// ));
/// storage.insert("widget", "7", RawRecord::new().with("id", json!("7"))).unwrap();
///
/// assert_eq!(storage.query_ids("widget").unwrap(), vec!["7".to_string()]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    types: Vec<TypeEntry>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or redefine) an entity type, keeping existing entities
    pub fn define(&mut self, descriptor: EntityTypeDescriptor) {
        match self.entry_mut(&descriptor.id) {
            Some(entry) => entry.descriptor = descriptor,
            None => self.types.push(TypeEntry {
                descriptor,
                entities: Vec::new(),
            }),
        }
    }

    /// Insert or replace an entity of a defined type
    ///
    /// # Errors
    /// Returns an error if the type has not been defined
    pub fn insert(
        &mut self,
        type_id: &str,
        id: impl Into<EntityId>,
        record: RawRecord,
    ) -> Result<()> {
        let entry = self
            .entry_mut(type_id)
            .ok_or_else(|| eyre::eyre!("Entity type '{}' is not defined", type_id))?;
        let id = id.into();

        match entry.entities.iter_mut().find(|(existing, _)| *existing == id) {
            Some((_, slot)) => *slot = record,
            None => entry.entities.push((id, record)),
        }
        Ok(())
    }

    /// Remove an entity, returning it if it existed
    pub fn remove(&mut self, type_id: &str, id: &str) -> Option<RawRecord> {
        let entry = self.entry_mut(type_id)?;
        let index = entry.entities.iter().position(|(existing, _)| existing == id)?;
        Some(entry.entities.remove(index).1)
    }

    fn entry(&self, type_id: &str) -> Option<&TypeEntry> {
        self.types.iter().find(|e| e.descriptor.id == type_id)
    }

    fn entry_mut(&mut self, type_id: &str) -> Option<&mut TypeEntry> {
        self.types.iter_mut().find(|e| e.descriptor.id == type_id)
    }
}

impl EntityStorage for MemoryStorage {
    fn resolve_type(&self, type_id: &str) -> Result<Option<EntityTypeDescriptor>> {
        Ok(self.entry(type_id).map(|e| e.descriptor.clone()))
    }

    fn query_ids(&self, type_id: &str) -> Result<Vec<EntityId>> {
        Ok(self
            .entry(type_id)
            .map(|e| e.entities.iter().map(|(id, _)| id.clone()).collect())
            .unwrap_or_default())
    }

    fn load(&self, type_id: &str, id: &str) -> Result<Option<RawRecord>> {
        Ok(self.entry(type_id).and_then(|e| {
            e.entities
                .iter()
                .find(|(existing, _)| existing == id)
                .map(|(_, record)| record.clone())
        }))
    }
}
