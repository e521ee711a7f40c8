//! Typed reading of particle definitions.
//!
//! - [`DefinitionParser`] - typed getters and the provider factory
//! - [`KvEnum`] / [`KvFlags`] - enumerations and flag sets in the tree
//! - [`DiagnosticSink`] - side channel for degrade-path events

mod definition;
mod diagnostics;
mod enums;

pub use definition::{DefinitionParser, NUMBER_LITERAL_KEY, TYPE_KEY, VECTOR_LITERAL_KEY};
pub use diagnostics::{CollectingSink, Diagnostic, DiagnosticSink, TracingSink, TRACING_SINK};
pub use enums::{normalize_enum_name, KvEnum, KvFlags};
