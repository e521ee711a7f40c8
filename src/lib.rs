//! # particle-def
//!
//! Typed access to particle system definitions and construction of the
//! runtime value providers they describe.
//!
//! Definitions arrive as a schema-less key/value tree. This crate wraps
//! tree nodes in a typed accessor, builds number and vector providers from
//! their `m_nType` discriminators, and resolves animation channel codec
//! names to element layouts.
//!
//! ## Modules
//!
//! - [`kv`] - Attribute tree values and the JSON adapter
//! - [`parser`] - Typed accessor, provider factory, enums and diagnostics
//! - [`provider`] - Number and vector providers and the state they read
//! - [`anim`] - Animation codec registry and motion flags
//! - [`settings`] - Persistent settings and logging setup
//! - [`util`] - Errors and math helpers
//!
//! ## Example
//!
//! ```
//! use particle_def::prelude::*;
//!
//! let tree = KvObject::from_json_str(r#"{
//!     "m_flRadius": {"m_nType": "PF_TYPE_RANDOM_UNIFORM", "m_flRandomMin": 2, "m_flRandomMax": 4}
//! }"#)?;
//! let parse = DefinitionParser::new(&tree);
//! let radius = parse.number_provider("m_flRadius")?;
//! assert_eq!(radius, NumberProvider::RandomUniform { min: 2.0, max: 4.0 });
//! # Ok::<(), particle_def::Error>(())
//! ```

pub mod util;
pub mod kv;
pub mod parser;
pub mod provider;
pub mod anim;
pub mod settings;

// Re-export commonly used types
pub use util::{Error, ProviderKind, Result};
pub use parser::DefinitionParser;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::util::{Error, ProviderKind, Result, Quat, Vec3};
    pub use crate::kv::{KvObject, KvValue};
    pub use crate::parser::{
        CollectingSink, DefinitionParser, Diagnostic, DiagnosticSink, KvEnum, KvFlags,
    };
    pub use crate::provider::{
        ControlPoint, NumberProvider, NumberProviderType, Particle, ParticleField,
        SystemRenderState, VectorProvider, VectorProviderType,
    };
    pub use crate::anim::{AnimDecoderType, DecoderDescriptor, MotionFlags};
}
