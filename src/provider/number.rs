//! Number providers (`PF_TYPE_*`).

use rand::Rng;

use super::{NumberProviderMapping, PfBiasType, Particle, ParticleField, SystemRenderState};
use crate::parser::{DefinitionParser, KvEnum, NUMBER_LITERAL_KEY};
use crate::util::{lerp, Result};

/// Discriminator values with a dedicated [`NumberProvider`] variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NumberProviderType {
    Literal,
    RandomUniform,
    RandomBiased,
    CollectionAge,
    ControlPointComponent,
    DetailLevel,
    ParticleAge,
    ParticleAgeNormalized,
    ParticleFloat,
    ParticleVectorComponent,
    ParticleSpeed,
    ParticleNumber,
    ParticleNumberNormalized,
}

impl KvEnum for NumberProviderType {
    const NAME: &'static str = "NumberProviderType";
    const PREFIX: &'static str = "PF_TYPE_";
    const MEMBERS: &'static [(&'static str, i64, Self)] = &[
        ("PF_TYPE_LITERAL", 0, Self::Literal),
        ("PF_TYPE_RANDOM_UNIFORM", 1, Self::RandomUniform),
        ("PF_TYPE_RANDOM_BIASED", 2, Self::RandomBiased),
        ("PF_TYPE_COLLECTION_AGE", 3, Self::CollectionAge),
        ("PF_TYPE_CONTROL_POINT_COMPONENT", 4, Self::ControlPointComponent),
        ("PF_TYPE_PARTICLE_DETAIL_LEVEL", 5, Self::DetailLevel),
        ("PF_TYPE_PARTICLE_AGE", 6, Self::ParticleAge),
        ("PF_TYPE_PARTICLE_AGE_NORMALIZED", 7, Self::ParticleAgeNormalized),
        ("PF_TYPE_PARTICLE_FLOAT", 8, Self::ParticleFloat),
        ("PF_TYPE_PARTICLE_VECTOR_COMPONENT", 9, Self::ParticleVectorComponent),
        ("PF_TYPE_PARTICLE_SPEED", 10, Self::ParticleSpeed),
        ("PF_TYPE_PARTICLE_NUMBER", 11, Self::ParticleNumber),
        ("PF_TYPE_PARTICLE_NUMBER_NORMALIZED", 12, Self::ParticleNumberNormalized),
    ];
}

/// A value source evaluated to one `f32` per request.
#[derive(Clone, Debug, PartialEq)]
pub enum NumberProvider {
    /// Constant value
    Literal(f32),
    /// Uniform random value in `[min, max]`
    RandomUniform { min: f32, max: f32 },
    /// Random value in `[min, max]` shaped by a bias curve
    RandomBiased {
        min: f32,
        max: f32,
        bias_type: PfBiasType,
        bias_parameter: f32,
    },
    /// Age of the particle system
    CollectionAge,
    /// One component of a control point position
    ControlPointComponent {
        control_point: usize,
        component: usize,
        mapping: NumberProviderMapping,
    },
    /// One value per detail level
    DetailLevel { lod_values: [f32; 4] },
    /// Particle age in seconds
    ParticleAge { mapping: NumberProviderMapping },
    /// Particle age as a fraction of its lifetime
    ParticleAgeNormalized { mapping: NumberProviderMapping },
    /// A scalar particle attribute
    PerParticle {
        field: ParticleField,
        mapping: NumberProviderMapping,
    },
    /// One component of a vector particle attribute
    PerParticleVectorComponent {
        field: ParticleField,
        component: usize,
        mapping: NumberProviderMapping,
    },
    /// Particle speed
    PerParticleSpeed { mapping: NumberProviderMapping },
    /// Particle index within the system
    PerParticleCount { mapping: NumberProviderMapping },
    /// Particle index divided by the particle count
    PerParticleCountNormalized { mapping: NumberProviderMapping },
}

impl Default for NumberProvider {
    fn default() -> Self {
        Self::Literal(0.0)
    }
}

impl NumberProvider {
    /// Build the variant for `ty` from its parameter sub-tree.
    pub fn build(ty: NumberProviderType, parse: &DefinitionParser<'_>) -> Result<Self> {
        Ok(match ty {
            NumberProviderType::Literal => Self::Literal(parse.float(NUMBER_LITERAL_KEY)?),
            NumberProviderType::RandomUniform => Self::RandomUniform {
                min: parse.float_or("m_flRandomMin", 0.0)?,
                max: parse.float_or("m_flRandomMax", 1.0)?,
            },
            NumberProviderType::RandomBiased => Self::RandomBiased {
                min: parse.float_or("m_flRandomMin", 0.0)?,
                max: parse.float_or("m_flRandomMax", 1.0)?,
                bias_type: parse.enum_normalized_or("m_nBiasType", PfBiasType::Standard)?,
                bias_parameter: parse.float_or("m_flBiasParameter", 0.5)?,
            },
            NumberProviderType::CollectionAge => Self::CollectionAge,
            NumberProviderType::ControlPointComponent => Self::ControlPointComponent {
                control_point: parse.scalar_or("m_nControlPoint", 0)?,
                component: parse.scalar_or::<usize>("m_nVectorComponent", 0)?.min(2),
                mapping: NumberProviderMapping::from_parser(parse)?,
            },
            NumberProviderType::DetailLevel => Self::DetailLevel {
                lod_values: [
                    parse.float_or("m_flLOD0", 0.0)?,
                    parse.float_or("m_flLOD1", 0.0)?,
                    parse.float_or("m_flLOD2", 0.0)?,
                    parse.float_or("m_flLOD3", 0.0)?,
                ],
            },
            NumberProviderType::ParticleAge => Self::ParticleAge {
                mapping: NumberProviderMapping::from_parser(parse)?,
            },
            NumberProviderType::ParticleAgeNormalized => Self::ParticleAgeNormalized {
                mapping: NumberProviderMapping::from_parser(parse)?,
            },
            NumberProviderType::ParticleFloat => Self::PerParticle {
                field: parse.particle_field_or("m_nScalarAttribute", ParticleField::Radius)?,
                mapping: NumberProviderMapping::from_parser(parse)?,
            },
            NumberProviderType::ParticleVectorComponent => Self::PerParticleVectorComponent {
                field: parse.particle_field_or("m_nVectorAttribute", ParticleField::Position)?,
                component: parse.scalar_or::<usize>("m_nVectorComponent", 0)?.min(2),
                mapping: NumberProviderMapping::from_parser(parse)?,
            },
            NumberProviderType::ParticleSpeed => Self::PerParticleSpeed {
                mapping: NumberProviderMapping::from_parser(parse)?,
            },
            NumberProviderType::ParticleNumber => Self::PerParticleCount {
                mapping: NumberProviderMapping::from_parser(parse)?,
            },
            NumberProviderType::ParticleNumberNormalized => Self::PerParticleCountNormalized {
                mapping: NumberProviderMapping::from_parser(parse)?,
            },
        })
    }

    /// Discriminator this variant is built from.
    pub fn provider_type(&self) -> NumberProviderType {
        match self {
            Self::Literal(_) => NumberProviderType::Literal,
            Self::RandomUniform { .. } => NumberProviderType::RandomUniform,
            Self::RandomBiased { .. } => NumberProviderType::RandomBiased,
            Self::CollectionAge => NumberProviderType::CollectionAge,
            Self::ControlPointComponent { .. } => NumberProviderType::ControlPointComponent,
            Self::DetailLevel { .. } => NumberProviderType::DetailLevel,
            Self::ParticleAge { .. } => NumberProviderType::ParticleAge,
            Self::ParticleAgeNormalized { .. } => NumberProviderType::ParticleAgeNormalized,
            Self::PerParticle { .. } => NumberProviderType::ParticleFloat,
            Self::PerParticleVectorComponent { .. } => NumberProviderType::ParticleVectorComponent,
            Self::PerParticleSpeed { .. } => NumberProviderType::ParticleSpeed,
            Self::PerParticleCount { .. } => NumberProviderType::ParticleNumber,
            Self::PerParticleCountNormalized { .. } => NumberProviderType::ParticleNumberNormalized,
        }
    }

    /// True when the value depends on neither state nor randomness.
    pub fn is_constant(&self) -> bool {
        matches!(self, Self::Literal(_))
    }

    /// Evaluate for one particle.
    pub fn next_number<R: Rng>(
        &self,
        rng: &mut R,
        particle: &Particle,
        state: &SystemRenderState,
    ) -> f32 {
        match self {
            Self::Literal(value) => *value,
            Self::RandomUniform { min, max } => lerp(*min, *max, rng.gen::<f32>()),
            Self::RandomBiased {
                min,
                max,
                bias_type,
                bias_parameter,
            } => lerp(*min, *max, bias_type.apply(rng.gen::<f32>(), *bias_parameter)),
            Self::CollectionAge => state.age,
            Self::ControlPointComponent {
                control_point,
                component,
                mapping,
            } => mapping.apply(state.control_point(*control_point).position[*component]),
            Self::DetailLevel { lod_values } => lod_values[state.detail_level.min(3)],
            Self::ParticleAge { mapping } => mapping.apply(particle.age),
            Self::ParticleAgeNormalized { mapping } => mapping.apply(particle.normalized_age()),
            Self::PerParticle { field, mapping } => mapping.apply(particle.scalar(*field)),
            Self::PerParticleVectorComponent {
                field,
                component,
                mapping,
            } => mapping.apply(particle.vector(*field)[*component]),
            Self::PerParticleSpeed { mapping } => mapping.apply(particle.speed()),
            Self::PerParticleCount { mapping } => mapping.apply(particle.index as f32),
            Self::PerParticleCountNormalized { mapping } => {
                let normalized = if state.particle_count == 0 {
                    0.0
                } else {
                    particle.index as f32 / state.particle_count as f32
                };
                mapping.apply(normalized)
            }
        }
    }
}

impl From<f32> for NumberProvider {
    fn from(value: f32) -> Self {
        Self::Literal(value)
    }
}
