//! Loader trait for handing rows to a destination

use eyre::Result;

/// Loader trait for loading items to a destination
///
/// # Example
/// ```no_run
/// use entity_source::etl::Loader;
/// use eyre::Result;
///
/// struct Discard;
///
/// impl Loader for Discard {
///     type Item = serde_json::Value;
///
///     async fn load(&self, items: Vec<Self::Item>) -> Result<usize> {
///         Ok(items.len())
///     }
/// }
/// ```
pub trait Loader: Send + Sync {
    /// The type of items to load
    type Item: Send;

    /// Load items to the destination
    ///
    /// Returns the number of items written
    ///
    /// # Errors
    /// Returns an error if the destination rejects the items (I/O, serialization)
    fn load(
        &self,
        items: Vec<Self::Item>,
    ) -> impl std::future::Future<Output = Result<usize>> + Send;
}
