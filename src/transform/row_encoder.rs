//! Row encoder transformer
//!
//! Turns a [`SourceRow`] into the JSON row written by loaders:
//! ```json
//! {"id": "9", "identity": ["9"], "record": {"id": "9", "tags": [{"value": "a"}]}}
//! ```
//! `identity` is only present when the encoder knows the identity keys.

use crate::etl::Transformer;
use crate::source::{IdentityKeys, SourceRow};
use eyre::Result;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default)]
pub struct RowEncoder {
    keys: Option<IdentityKeys>,
}

impl RowEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also emit the identity key values of each row
    pub fn with_identity(keys: IdentityKeys) -> Self {
        Self { keys: Some(keys) }
    }
}

impl Transformer for RowEncoder {
    type Input = SourceRow;
    type Output = Value;

    fn transform(&self, input: Self::Input) -> Result<Self::Output> {
        let mut row = Map::new();
        row.insert("id".to_string(), Value::String(input.id.clone()));
        if let Some(keys) = &self.keys {
            row.insert("identity".to_string(), Value::Array(input.identity(keys)));
        }
        row.insert("record".to_string(), Value::Object(input.record.into_map()));
        Ok(Value::Object(row))
    }
}
