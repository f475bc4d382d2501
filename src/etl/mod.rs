//! Extract, Transform, Load abstractions
//!
//! A [`RecordSource`](crate::source::RecordSource) is an [`Extractor`]; rows
//! flow through [`Transformer`]s into a [`Loader`], orchestrated by a
//! [`Pipeline`].

mod extract;
mod load;
mod pipeline;
mod transform;

pub use extract::Extractor;
pub use load::Loader;
pub use pipeline::Pipeline;
pub use transform::{Chain, Transformer};
