//! Entity Source
//!
//! A typed record source that enumerates the entities of one configured type,
//! flattens their identity key fields, and feeds the rows to a migration
//! pipeline.

pub mod cli;
pub mod etl;
pub mod source;
pub mod storage;
pub mod transform;

// Re-exports for convenience
pub use etl::{Extractor, Loader, Pipeline, Transformer};
pub use source::{
    FlatRecord, LoadError, MigrationDefinition, RecordSource, SourceConfiguration, SourceError,
    SourceRow,
};
pub use storage::{DirectoryStorage, EntityStorage, MemoryStorage, NdjsonWriter};
