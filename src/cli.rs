//! CLI helper functions

use crate::{
    etl::{Pipeline, Transformer},
    source::{FieldDescriptions, IdentityKeys, MigrationDefinition, RecordSource},
    storage::{DirectoryStorage, NdjsonWriter},
    transform::{FieldDropper, RowEncoder},
};
use eyre::{Context, Result};
use std::path::{Path, PathBuf};

/// Environment variable naming the default repository directory
pub const REPOSITORY_ENV: &str = "ENTSRC_REPOSITORY";

/// Resolve the repository directory
///
/// Order: explicit argument, then `ENTSRC_REPOSITORY`, then the current directory.
pub fn repository_dir(explicit: Option<&str>) -> PathBuf {
    explicit
        .map(str::to_string)
        .or_else(|| std::env::var(REPOSITORY_ENV).ok())
        .filter(|dir| !dir.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Read a migration file and build its record source over a repository directory
pub fn open_source(
    migration: impl AsRef<Path>,
    repository: impl AsRef<Path>,
) -> Result<(MigrationDefinition, RecordSource<DirectoryStorage>)> {
    let migration = migration.as_ref();
    let definition = MigrationDefinition::read(migration)?;
    let storage = DirectoryStorage::new(repository);

    log::debug!(
        "Opening {} from repository {}",
        definition.display_label(),
        storage.root().display()
    );

    let source = RecordSource::new(definition.source.clone(), storage)
        .with_context(|| format!("Invalid source in migration {}", migration.display()))?;
    Ok((definition, source))
}

/// Field descriptions of the migration's entity type
pub fn describe_fields(
    migration: impl AsRef<Path>,
    repository: impl AsRef<Path>,
) -> Result<FieldDescriptions> {
    let (_, source) = open_source(migration, repository)?;
    Ok(source.describe_fields()?)
}

/// The migration's identity keys
pub fn identity_keys(
    migration: impl AsRef<Path>,
    repository: impl AsRef<Path>,
) -> Result<IdentityKeys> {
    let (definition, _) = open_source(migration, repository)?;
    Ok(definition.source.keys)
}

/// Number of rows the migration's source would produce
pub fn count_rows(migration: impl AsRef<Path>, repository: impl AsRef<Path>) -> Result<usize> {
    let (_, source) = open_source(migration, repository)?;
    Ok(source.count()?)
}

/// Check that the type resolves and every key is one of its base fields
///
/// Returns the source label on success.
pub fn check(migration: impl AsRef<Path>, repository: impl AsRef<Path>) -> Result<String> {
    let (_, source) = open_source(migration, repository)?;
    source.validate_keys()?;
    log::info!("{} is valid", source);
    Ok(source.to_string())
}

/// Options for [`export`]
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// NDJSON file to write; stdout when `None`
    pub output: Option<PathBuf>,
    /// Fields removed from every row
    pub drop: Vec<String>,
    /// Also remove the revision bookkeeping fields (see [`FieldDropper::revision_fields`])
    pub drop_revision: bool,
    /// Validate keys against the type before reading any entity
    pub strict: bool,
}

/// Export every row of the migration's source as NDJSON
///
/// Pipeline: RecordSource → FieldDropper → RowEncoder → NdjsonWriter
pub async fn export(
    migration: impl AsRef<Path>,
    repository: impl AsRef<Path>,
    options: ExportOptions,
) -> Result<usize> {
    let (_, source) = open_source(migration, repository)?;

    if options.strict {
        source.validate_keys()?;
    }

    let encoder = RowEncoder::with_identity(source.identity_keys().clone());
    let dropper = match options.drop_revision {
        true => FieldDropper::revision_fields(),
        false => FieldDropper::default(),
    };
    let transformer = dropper.with_fields(options.drop).then(encoder);

    let writer = match &options.output {
        Some(path) => NdjsonWriter::new(path),
        None => NdjsonWriter::stdout(),
    };

    log::info!("Exporting {}", source);
    let pipeline = Pipeline::new(source, transformer, writer);
    let count = pipeline.run().await?;

    match &options.output {
        Some(path) => log::info!("✓ Exported {} row(s) to {}", count, path.display()),
        None => log::info!("✓ Exported {} row(s)", count),
    }

    Ok(count)
}
