//! Transformer trait for per-row transformation

use eyre::Result;

/// Transformer trait for transforming rows between pipeline stages
///
/// # Example
/// ```
/// use entity_source::etl::Transformer;
/// use eyre::Result;
///
/// struct Upper;
///
/// impl Transformer for Upper {
///     type Input = String;
///     type Output = String;
///
///     fn transform(&self, input: Self::Input) -> Result<Self::Output> {
///         Ok(input.to_uppercase())
///     }
/// }
///
/// assert_eq!(Upper.transform("id".to_string()).unwrap(), "ID");
/// ```
pub trait Transformer: Send + Sync {
    /// Input item type
    type Input: Send;

    /// Output item type after transformation
    type Output: Send;

    /// Transform a single item
    ///
    /// # Errors
    /// Returns an error if the item cannot be converted
    fn transform(&self, input: Self::Input) -> Result<Self::Output>;

    /// Transform multiple items, stopping at the first failure
    fn transform_many(&self, inputs: Vec<Self::Input>) -> Result<Vec<Self::Output>> {
        inputs.into_iter().map(|i| self.transform(i)).collect()
    }

    /// Feed the output of this transformer into `next`
    fn then<T>(self, next: T) -> Chain<Self, T>
    where
        Self: Sized,
        T: Transformer<Input = Self::Output>,
    {
        Chain {
            first: self,
            second: next,
        }
    }
}

/// Two transformers applied one after the other, built with [`Transformer::then`]
pub struct Chain<A, B> {
    first: A,
    second: B,
}

impl<A, B> Transformer for Chain<A, B>
where
    A: Transformer,
    B: Transformer<Input = A::Output>,
{
    type Input = A::Input;
    type Output = B::Output;

    fn transform(&self, input: Self::Input) -> Result<Self::Output> {
        self.second.transform(self.first.transform(input)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AddOne;

    impl Transformer for AddOne {
        type Input = i32;
        type Output = i32;
        fn transform(&self, input: i32) -> Result<i32> {
            Ok(input + 1)
        }
    }

    struct Reject;

    impl Transformer for Reject {
        type Input = i32;
        type Output = i32;
        fn transform(&self, input: i32) -> Result<i32> {
            eyre::bail!("rejected {}", input)
        }
    }

    #[test]
    fn test_chain_applies_in_order() {
        let chain = AddOne.then(AddOne).then(AddOne);
        assert_eq!(chain.transform_many(vec![1, 5]).unwrap(), vec![4, 8]);
    }

    #[test]
    fn test_chain_stops_on_error() {
        let chain = AddOne.then(Reject);
        let err = chain.transform(1).unwrap_err();
        assert_eq!(err.to_string(), "rejected 2");
    }
}
