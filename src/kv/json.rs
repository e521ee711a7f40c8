//! JSON adapter for attribute trees.
//!
//! Tools and tests describe definitions as JSON dumps; this converts them
//! into the same [`KvObject`] tree the asset loader would hand over.

use std::path::Path;

use super::{KvObject, KvValue};
use crate::util::{Error, Result};

impl From<serde_json::Value> for KvValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value as J;
        match value {
            J::Null => Self::Null,
            J::Bool(b) => Self::Bool(b),
            J::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Self::UInt(u)
                } else {
                    Self::Float(n.as_f64().unwrap_or(0.0))
                }
            }
            J::String(s) => Self::String(s),
            J::Array(items) => Self::Array(items.into_iter().map(Self::from).collect()),
            J::Object(map) => {
                Self::Object(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl TryFrom<serde_json::Value> for KvObject {
    type Error = Error;

    fn try_from(value: serde_json::Value) -> Result<Self> {
        match KvValue::from(value) {
            KvValue::Object(obj) => Ok(obj),
            other => Err(Error::mismatch("<root>", "object", other.type_name())),
        }
    }
}

impl KvObject {
    /// Parse a JSON document whose root is an object.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(s)?;
        Self::try_from(value)
    }

    /// Read and parse a JSON file whose root is an object.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}
