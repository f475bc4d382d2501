//! Extractor trait for pulling items out of a source

use eyre::Result;

/// Extractor trait for extracting items from a source
///
/// The entity [`RecordSource`](crate::source::RecordSource) is the main
/// implementor: one call runs one full pass over the configured entity type.
///
/// # Example
/// ```no_run
/// use entity_source::etl::Extractor;
/// use eyre::Result;
///
/// struct Fixed(Vec<u32>);
///
/// impl Extractor for Fixed {
///     type Item = u32;
///
///     async fn extract(&self) -> Result<Vec<Self::Item>> {
///         Ok(self.0.clone())
///     }
/// }
/// ```
pub trait Extractor: Send + Sync {
    /// The type of items extracted
    type Item: Send;

    /// Extract every item from the source
    ///
    /// # Errors
    /// Returns an error if the source cannot be queried or an item cannot be read
    fn extract(&self) -> impl std::future::Future<Output = Result<Vec<Self::Item>>> + Send;
}
