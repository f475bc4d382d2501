//! Pipeline orchestration for feeding source rows into a loader

use super::{Extractor, Loader, Transformer};
use eyre::Result;

/// Pipeline that drives one extract pass through a transformer into a loader
///
/// # Example
/// ```no_run
/// use entity_source::etl::Pipeline;
/// use entity_source::source::{RecordSource, SourceConfiguration};
/// use entity_source::storage::{DirectoryStorage, NdjsonWriter};
/// use entity_source::transform::RowEncoder;
///
/// # async fn example() -> eyre::Result<()> {
/// let config = SourceConfiguration::new("widget", ["id"]);
/// let source = RecordSource::new(config, DirectoryStorage::new("./repository"))?;
///
/// let pipeline = Pipeline::new(source, RowEncoder::new(), NdjsonWriter::stdout());
/// let count = pipeline.run().await?;
/// println!("Exported {} rows", count);
/// # Ok(())
/// # }
/// ```
pub struct Pipeline<E, T, L> {
    extractor: E,
    transformer: T,
    loader: L,
}

impl<E, T, L> Pipeline<E, T, L>
where
    E: Extractor,
    T: Transformer<Input = E::Item>,
    L: Loader<Item = T::Output>,
{
    /// Create a new pipeline
    pub fn new(extractor: E, transformer: T, loader: L) -> Self {
        Self {
            extractor,
            transformer,
            loader,
        }
    }

    /// Run one pass: extract every row, transform it, load the result
    ///
    /// The loader is called even for an empty pass, so destinations that
    /// replace their contents end up empty rather than stale.
    ///
    /// Returns the number of rows loaded
    ///
    /// # Errors
    /// Returns the first error of any stage; nothing is loaded if extraction
    /// or transformation fails.
    pub async fn run(&self) -> Result<usize> {
        log::info!("Starting pipeline");

        log::debug!("Extracting rows...");
        let items = self.extractor.extract().await?;
        log::info!("Extracted {} rows", items.len());

        if items.is_empty() {
            log::warn!("No rows extracted, loading an empty batch");
        }

        log::debug!("Transforming rows...");
        let transformed = self.transformer.transform_many(items)?;
        log::info!("Transformed {} rows", transformed.len());

        log::debug!("Loading rows...");
        let count = self.loader.load(transformed).await?;
        log::info!("Loaded {} rows", count);

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct MockExtractor(Vec<i32>);

    impl Extractor for MockExtractor {
        type Item = i32;
        async fn extract(&self) -> Result<Vec<Self::Item>> {
            Ok(self.0.clone())
        }
    }

    struct FailingExtractor;

    impl Extractor for FailingExtractor {
        type Item = i32;
        async fn extract(&self) -> Result<Vec<Self::Item>> {
            eyre::bail!("storage offline")
        }
    }

    struct DoubleTransformer;

    impl Transformer for DoubleTransformer {
        type Input = i32;
        type Output = i32;
        fn transform(&self, input: Self::Input) -> Result<Self::Output> {
            Ok(input * 2)
        }
    }

    struct SumLoader(Arc<Mutex<Option<i32>>>);

    impl Loader for SumLoader {
        type Item = i32;
        async fn load(&self, items: Vec<Self::Item>) -> Result<usize> {
            *self.0.lock().unwrap() = Some(items.iter().sum());
            Ok(items.len())
        }
    }

    #[tokio::test]
    async fn test_pipeline() {
        let result = Arc::new(Mutex::new(None));

        let pipeline = Pipeline::new(
            MockExtractor(vec![1, 2, 3]),
            DoubleTransformer,
            SumLoader(result.clone()),
        );

        let count = pipeline.run().await.unwrap();
        assert_eq!(count, 3);
        assert_eq!(*result.lock().unwrap(), Some(12));
    }

    #[tokio::test]
    async fn test_empty_pipeline_still_loads() {
        let result = Arc::new(Mutex::new(None));

        let pipeline = Pipeline::new(
            MockExtractor(vec![]),
            DoubleTransformer,
            SumLoader(result.clone()),
        );

        assert_eq!(pipeline.run().await.unwrap(), 0);
        assert_eq!(*result.lock().unwrap(), Some(0));
    }

    #[tokio::test]
    async fn test_extract_failure_is_fatal() {
        let result = Arc::new(Mutex::new(None));

        let pipeline = Pipeline::new(FailingExtractor, DoubleTransformer, SumLoader(result.clone()));

        let err = pipeline.run().await.unwrap_err();
        assert_eq!(err.to_string(), "storage offline");
        assert_eq!(*result.lock().unwrap(), None);
    }
}
