//! Record source errors

use crate::storage::EntityId;
use thiserror::Error;

/// Boxed storage fault carried as an error source
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised by a [`RecordSource`](super::RecordSource)
///
/// None of these are retried; the caller decides whether to abort the run.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Invalid source configuration: {0}")]
    Configuration(String),

    #[error("Unknown entity type '{type_id}'")]
    UnknownType {
        type_id: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("Failed to query '{type_id}' entities")]
    Query {
        type_id: String,
        #[source]
        source: BoxError,
    },

    #[error(transparent)]
    Load(#[from] LoadError),
}

/// Failure to turn one queried ID into a row
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Entity '{type_id}' {id} was queried but could not be loaded")]
    NotFound { type_id: String, id: EntityId },

    #[error("Failed to load entity '{type_id}' {id}")]
    Storage {
        type_id: String,
        id: EntityId,
        #[source]
        source: BoxError,
    },

    #[error("Entity {id} has no key field '{field}'")]
    MissingKey { id: EntityId, field: String },

    #[error("Entity {id} has an empty multi-value key field '{field}'")]
    EmptyMultiValue { id: EntityId, field: String },

    #[error("Entity {id} key field '{field}' has no 'value' in its first entry")]
    MissingWrapperValue { id: EntityId, field: String },

    #[error("Entity {id} key field '{field}' does not hold a scalar or value wrapper")]
    NonScalarKey { id: EntityId, field: String },
}

impl LoadError {
    /// The entity loaded but its shape does not fit the configured keys
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            LoadError::MissingKey { .. }
                | LoadError::EmptyMultiValue { .. }
                | LoadError::MissingWrapperValue { .. }
                | LoadError::NonScalarKey { .. }
        )
    }

    /// The entity this error is about
    pub fn id(&self) -> &str {
        match self {
            LoadError::NotFound { id, .. }
            | LoadError::Storage { id, .. }
            | LoadError::MissingKey { id, .. }
            | LoadError::EmptyMultiValue { id, .. }
            | LoadError::MissingWrapperValue { id, .. }
            | LoadError::NonScalarKey { id, .. } => id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_classification() {
        let not_found = LoadError::NotFound {
            type_id: "widget".into(),
            id: "7".into(),
        };
        let missing = LoadError::MissingKey {
            id: "7".into(),
            field: "id".into(),
        };

        assert!(!not_found.is_malformed());
        assert!(missing.is_malformed());
        assert_eq!(missing.id(), "7");
    }

    #[test]
    fn test_storage_fault_keeps_source() {
        let err = SourceError::Query {
            type_id: "widget".into(),
            source: eyre::eyre!("disk on fire").into(),
        };

        assert_eq!(err.to_string(), "Failed to query 'widget' entities");
        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "disk on fire");
    }

    #[test]
    fn test_converts_into_report() {
        let err: SourceError = LoadError::NotFound {
            type_id: "widget".into(),
            id: "9".into(),
        }
        .into();
        let report = eyre::Report::new(err);
        assert_eq!(
            report.to_string(),
            "Entity 'widget' 9 was queried but could not be loaded"
        );
    }
}
