//! Row transformers
//!
//! Transformers applied to [`SourceRow`](crate::source::SourceRow)s between
//! the record source and a loader.

mod field_dropper;
mod row_encoder;

pub use field_dropper::FieldDropper;
pub use row_encoder::RowEncoder;
