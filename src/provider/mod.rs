//! Value providers: runtime-evaluated numbers and vectors.
//!
//! A provider is built once from a definition sub-tree by
//! [`crate::parser::DefinitionParser`] and then evaluated per particle
//! against a [`Particle`] and a [`SystemRenderState`]. Built providers own
//! all their parameters and keep no reference to the source tree.

mod field;
mod gradient;
mod mapping;
mod number;
mod state;
mod vector;

pub use field::ParticleField;
pub use gradient::{ColorGradient, GradientStop};
pub use mapping::{Curve, CurvePoint, NumberProviderMapping, PfBiasType, PfInputMode, PfMapType};
pub use number::{NumberProvider, NumberProviderType};
pub use state::{ControlPoint, Particle, SystemRenderState};
pub use vector::{VectorProvider, VectorProviderType};
