//! Attribute tree: the schema-less key/value data a particle definition is
//! authored in.
//!
//! - [`KvValue`] - one leaf or branch of the tree
//! - [`KvObject`] - an ordered node of key/value pairs
//! - [`FromKv`] - conversion of a single value into a typed scalar

mod value;
mod json;

pub use value::{FromKv, KvObject, KvValue};
