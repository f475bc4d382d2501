//! Entity record source
//!
//! Turns the entities of one configured type into flat rows for a migration
//! pipeline:
//! - [`SourceConfiguration`] / [`MigrationDefinition`]: what to read
//! - [`RecordSource`]: field metadata, identity keys and row passes
//! - [`SourceRow`] / [`FlatRecord`]: what gets emitted

mod config;
mod entity;
mod error;
mod row;

pub use config::{IdentityKeys, KeyInfo, MigrationDefinition, SourceConfiguration};
pub use entity::{FieldDescriptions, RecordSource, Records, SourceSnapshot, SourceState};
pub use error::{BoxError, LoadError, SourceError};
pub use row::{FlatRecord, SourceRow, flatten};
