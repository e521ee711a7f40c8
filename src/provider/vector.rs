//! Vector providers (`PVEC_TYPE_*`).

use rand::Rng;

use super::{ColorGradient, NumberProvider, Particle, ParticleField, SystemRenderState};
use crate::parser::{DefinitionParser, KvEnum, VECTOR_LITERAL_KEY};
use crate::util::{inverse_lerp, Result, Vec3};

/// Discriminator values with a dedicated [`VectorProvider`] variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VectorProviderType {
    Literal,
    LiteralColor,
    ParticleVector,
    ParticleVelocity,
    ControlPointValue,
    ControlPointRelativePosition,
    ControlPointRelativeDirection,
    FloatComponents,
    FloatInterpClamped,
    FloatInterpOpen,
    FloatInterpGradient,
}

impl KvEnum for VectorProviderType {
    const NAME: &'static str = "VectorProviderType";
    const PREFIX: &'static str = "PVEC_TYPE_";
    const MEMBERS: &'static [(&'static str, i64, Self)] = &[
        ("PVEC_TYPE_LITERAL", 0, Self::Literal),
        ("PVEC_TYPE_LITERAL_COLOR", 1, Self::LiteralColor),
        ("PVEC_TYPE_PARTICLE_VECTOR", 2, Self::ParticleVector),
        ("PVEC_TYPE_PARTICLE_VELOCITY", 3, Self::ParticleVelocity),
        ("PVEC_TYPE_CP_VALUE", 4, Self::ControlPointValue),
        ("PVEC_TYPE_CP_RELATIVE_POSITION", 5, Self::ControlPointRelativePosition),
        ("PVEC_TYPE_CP_RELATIVE_DIR", 6, Self::ControlPointRelativeDirection),
        ("PVEC_TYPE_FLOAT_COMPONENTS", 7, Self::FloatComponents),
        ("PVEC_TYPE_FLOAT_INTERP_CLAMPED", 8, Self::FloatInterpClamped),
        ("PVEC_TYPE_FLOAT_INTERP_OPEN", 9, Self::FloatInterpOpen),
        ("PVEC_TYPE_FLOAT_INTERP_GRADIENT", 10, Self::FloatInterpGradient),
    ];
}

/// A value source evaluated to one [`Vec3`] per request.
#[derive(Clone, Debug, PartialEq)]
pub enum VectorProvider {
    /// Constant vector
    Literal(Vec3),
    /// Constant color in unit range
    LiteralColor(Vec3),
    /// A particle attribute, scaled per component
    PerParticleVector { field: ParticleField, scale: Vec3 },
    /// Particle velocity
    ParticleVelocity,
    /// Control point position, scaled per component
    ControlPointValue { control_point: usize, scale: Vec3 },
    /// Offset in the control point's frame, in world space
    ControlPointRelativePosition { control_point: usize, offset: Vec3 },
    /// Direction in the control point's frame, in world space, normalized
    ControlPointRelativeDirection { control_point: usize, direction: Vec3 },
    /// One number provider per component
    FloatComponents {
        x: NumberProvider,
        y: NumberProvider,
        z: NumberProvider,
    },
    /// Linear interpolation between two vectors driven by a number provider
    FloatInterpolation {
        input: NumberProvider,
        input0: f32,
        input1: f32,
        output0: Vec3,
        output1: Vec3,
        clamped: bool,
    },
    /// Gradient lookup driven by a number provider
    ColorGradient {
        input: NumberProvider,
        input0: f32,
        input1: f32,
        gradient: ColorGradient,
    },
}

impl Default for VectorProvider {
    fn default() -> Self {
        Self::Literal(Vec3::ZERO)
    }
}

impl VectorProvider {
    /// Build the variant for `ty` from its parameter sub-tree.
    pub fn build(ty: VectorProviderType, parse: &DefinitionParser<'_>) -> Result<Self> {
        let zero = NumberProvider::Literal(0.0);
        Ok(match ty {
            VectorProviderType::Literal => Self::Literal(parse.vector3(VECTOR_LITERAL_KEY)?),
            VectorProviderType::LiteralColor => {
                Self::LiteralColor(parse.color24("m_LiteralColor")?)
            }
            VectorProviderType::ParticleVector => Self::PerParticleVector {
                field: parse.particle_field_or("m_nVectorAttribute", ParticleField::Position)?,
                scale: parse.vector3_or("m_vVectorScale", Vec3::ONE)?,
            },
            VectorProviderType::ParticleVelocity => Self::ParticleVelocity,
            VectorProviderType::ControlPointValue => Self::ControlPointValue {
                control_point: parse.scalar_or("m_nControlPoint", 0)?,
                scale: parse.vector3_or("m_vCPValueScale", Vec3::ONE)?,
            },
            VectorProviderType::ControlPointRelativePosition => Self::ControlPointRelativePosition {
                control_point: parse.scalar_or("m_nControlPoint", 0)?,
                offset: parse.vector3_or("m_vCPRelativePosition", Vec3::ZERO)?,
            },
            VectorProviderType::ControlPointRelativeDirection => {
                Self::ControlPointRelativeDirection {
                    control_point: parse.scalar_or("m_nControlPoint", 0)?,
                    direction: parse.vector3_or("m_vCPRelativeDir", Vec3::X)?,
                }
            }
            VectorProviderType::FloatComponents => Self::FloatComponents {
                x: parse.number_provider_or("m_FloatComponentX", zero.clone())?,
                y: parse.number_provider_or("m_FloatComponentY", zero.clone())?,
                z: parse.number_provider_or("m_FloatComponentZ", zero)?,
            },
            VectorProviderType::FloatInterpClamped | VectorProviderType::FloatInterpOpen => {
                Self::FloatInterpolation {
                    input: parse.number_provider_or("m_FloatInterp", zero)?,
                    input0: parse.float_or("m_flInterpInput0", 0.0)?,
                    input1: parse.float_or("m_flInterpInput1", 1.0)?,
                    output0: parse.vector3_or("m_vInterpOutput0", Vec3::ZERO)?,
                    output1: parse.vector3_or("m_vInterpOutput1", Vec3::ONE)?,
                    clamped: ty == VectorProviderType::FloatInterpClamped,
                }
            }
            VectorProviderType::FloatInterpGradient => Self::ColorGradient {
                input: parse.number_provider_or("m_FloatInterp", zero)?,
                input0: parse.float_or("m_flInterpInput0", 0.0)?,
                input1: parse.float_or("m_flInterpInput1", 1.0)?,
                gradient: ColorGradient::from_parser(&parse.object("m_Gradient")?)?,
            },
        })
    }

    /// Discriminator this variant is built from.
    pub fn provider_type(&self) -> VectorProviderType {
        match self {
            Self::Literal(_) => VectorProviderType::Literal,
            Self::LiteralColor(_) => VectorProviderType::LiteralColor,
            Self::PerParticleVector { .. } => VectorProviderType::ParticleVector,
            Self::ParticleVelocity => VectorProviderType::ParticleVelocity,
            Self::ControlPointValue { .. } => VectorProviderType::ControlPointValue,
            Self::ControlPointRelativePosition { .. } => {
                VectorProviderType::ControlPointRelativePosition
            }
            Self::ControlPointRelativeDirection { .. } => {
                VectorProviderType::ControlPointRelativeDirection
            }
            Self::FloatComponents { .. } => VectorProviderType::FloatComponents,
            Self::FloatInterpolation { clamped: true, .. } => {
                VectorProviderType::FloatInterpClamped
            }
            Self::FloatInterpolation { clamped: false, .. } => VectorProviderType::FloatInterpOpen,
            Self::ColorGradient { .. } => VectorProviderType::FloatInterpGradient,
        }
    }

    /// True when the value depends on neither state nor randomness.
    pub fn is_constant(&self) -> bool {
        match self {
            Self::Literal(_) | Self::LiteralColor(_) => true,
            Self::FloatComponents { x, y, z } => {
                x.is_constant() && y.is_constant() && z.is_constant()
            }
            _ => false,
        }
    }

    /// Evaluate for one particle.
    pub fn next_vector<R: Rng>(
        &self,
        rng: &mut R,
        particle: &Particle,
        state: &SystemRenderState,
    ) -> Vec3 {
        match self {
            Self::Literal(value) | Self::LiteralColor(value) => *value,
            Self::PerParticleVector { field, scale } => particle.vector(*field) * *scale,
            Self::ParticleVelocity => particle.velocity,
            Self::ControlPointValue { control_point, scale } => {
                state.control_point(*control_point).position * *scale
            }
            Self::ControlPointRelativePosition { control_point, offset } => {
                let cp = state.control_point(*control_point);
                cp.position + cp.orientation * *offset
            }
            Self::ControlPointRelativeDirection {
                control_point,
                direction,
            } => (state.control_point(*control_point).orientation * *direction).normalize_or_zero(),
            Self::FloatComponents { x, y, z } => Vec3::new(
                x.next_number(rng, particle, state),
                y.next_number(rng, particle, state),
                z.next_number(rng, particle, state),
            ),
            Self::FloatInterpolation {
                input,
                input0,
                input1,
                output0,
                output1,
                clamped,
            } => {
                let mut t = inverse_lerp(*input0, *input1, input.next_number(rng, particle, state));
                if *clamped {
                    t = t.clamp(0.0, 1.0);
                }
                output0.lerp(*output1, t)
            }
            Self::ColorGradient {
                input,
                input0,
                input1,
                gradient,
            } => {
                let t = inverse_lerp(*input0, *input1, input.next_number(rng, particle, state));
                gradient.evaluate(t)
            }
        }
    }
}

impl From<Vec3> for VectorProvider {
    fn from(value: Vec3) -> Self {
        Self::Literal(value)
    }
}
