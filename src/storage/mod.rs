//! Entity storage collaborators
//!
//! This module holds everything a [`RecordSource`](crate::source::RecordSource)
//! reads from or writes to:
//! - The [`EntityStorage`] trait and the type/field definitions it serves
//! - In-memory and directory-backed storages
//! - NDJSON row output

mod definition;
mod directory;
mod memory;
mod ndjson;
mod record;

pub use definition::{Cardinality, EntityTypeDescriptor, FieldDefinition};
pub use directory::DirectoryStorage;
pub use memory::MemoryStorage;
pub use ndjson::NdjsonWriter;
pub use record::{FieldValue, RawRecord, WrapperMap};

use eyre::Result;

/// Identifier of a single entity within its type
pub type EntityId = String;

/// Storage collaborator queried by a record source
///
/// Faults of the backing store are reported as `Err`; absence is `Ok(None)`.
/// The record source decides which of those are fatal.
pub trait EntityStorage {
    /// Look up the definition of an entity type
    fn resolve_type(&self, type_id: &str) -> Result<Option<EntityTypeDescriptor>>;

    /// Every entity ID of the given type
    ///
    /// No ordering is guaranteed beyond what the implementation documents.
    fn query_ids(&self, type_id: &str) -> Result<Vec<EntityId>>;

    /// Load one entity by ID
    fn load(&self, type_id: &str, id: &str) -> Result<Option<RawRecord>>;

    /// The base fields declared by a type, in declared order
    fn base_field_definitions(&self, descriptor: &EntityTypeDescriptor) -> Vec<FieldDefinition> {
        descriptor.fields.clone()
    }
}

impl<S: EntityStorage + ?Sized> EntityStorage for &S {
    fn resolve_type(&self, type_id: &str) -> Result<Option<EntityTypeDescriptor>> {
        (**self).resolve_type(type_id)
    }

    fn query_ids(&self, type_id: &str) -> Result<Vec<EntityId>> {
        (**self).query_ids(type_id)
    }

    fn load(&self, type_id: &str, id: &str) -> Result<Option<RawRecord>> {
        (**self).load(type_id, id)
    }

    fn base_field_definitions(&self, descriptor: &EntityTypeDescriptor) -> Vec<FieldDefinition> {
        (**self).base_field_definitions(descriptor)
    }
}
