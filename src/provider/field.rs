//! Particle attribute identifiers.

use crate::parser::KvEnum;

/// A per-particle attribute, as referenced by `m_nScalarAttribute` and
/// `m_nVectorAttribute`.
///
/// Definitions store these as integers; the names are accepted too.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ParticleField {
    /// Current position (vector)
    #[default]
    Position,
    /// Total lifetime in seconds
    LifeDuration,
    /// Position on the previous step (vector)
    PositionPrevious,
    /// Radius
    Radius,
    /// Roll angle
    Roll,
    /// Roll angular speed
    RollSpeed,
    /// Tint color (vector)
    Color,
    /// Alpha
    Alpha,
    /// Simulation time the particle was created at
    CreationTime,
    /// Sprite sheet sequence
    SequenceNumber,
    /// Trail length
    TrailLength,
    /// Stable particle id
    ParticleId,
    /// Yaw angle
    Yaw,
    /// Secondary sprite sheet sequence
    SecondSequenceNumber,
    /// Hitbox index (not tracked)
    HitboxIndex,
    /// Hitbox-relative position (vector, not tracked)
    HitboxOffsetPosition,
    /// Secondary alpha
    Alpha2,
    /// Scratch vector
    ScratchVector,
    /// Scratch float
    ScratchFloat,
    /// Pitch angle
    Pitch,
    /// Normal (vector)
    Normal,
    /// Glow color (vector)
    GlowRgb,
    /// Glow alpha
    GlowAlpha,
}

impl KvEnum for ParticleField {
    const NAME: &'static str = "ParticleField";
    const PREFIX: &'static str = "PARTICLE_ATTRIBUTE_";
    const MEMBERS: &'static [(&'static str, i64, Self)] = &[
        ("PARTICLE_ATTRIBUTE_XYZ", 0, Self::Position),
        ("PARTICLE_ATTRIBUTE_LIFE_DURATION", 1, Self::LifeDuration),
        ("PARTICLE_ATTRIBUTE_PREV_XYZ", 2, Self::PositionPrevious),
        ("PARTICLE_ATTRIBUTE_RADIUS", 3, Self::Radius),
        ("PARTICLE_ATTRIBUTE_ROTATION", 4, Self::Roll),
        ("PARTICLE_ATTRIBUTE_ROTATION_SPEED", 5, Self::RollSpeed),
        ("PARTICLE_ATTRIBUTE_TINT_RGB", 6, Self::Color),
        ("PARTICLE_ATTRIBUTE_ALPHA", 7, Self::Alpha),
        ("PARTICLE_ATTRIBUTE_CREATION_TIME", 8, Self::CreationTime),
        ("PARTICLE_ATTRIBUTE_SEQUENCE_NUMBER", 9, Self::SequenceNumber),
        ("PARTICLE_ATTRIBUTE_TRAIL_LENGTH", 10, Self::TrailLength),
        ("PARTICLE_ATTRIBUTE_PARTICLE_ID", 11, Self::ParticleId),
        ("PARTICLE_ATTRIBUTE_YAW", 12, Self::Yaw),
        ("PARTICLE_ATTRIBUTE_SEQUENCE_NUMBER1", 13, Self::SecondSequenceNumber),
        ("PARTICLE_ATTRIBUTE_HITBOX_INDEX", 14, Self::HitboxIndex),
        ("PARTICLE_ATTRIBUTE_HITBOX_RELATIVE_XYZ", 15, Self::HitboxOffsetPosition),
        ("PARTICLE_ATTRIBUTE_ALPHA2", 16, Self::Alpha2),
        ("PARTICLE_ATTRIBUTE_SCRATCH_VEC", 17, Self::ScratchVector),
        ("PARTICLE_ATTRIBUTE_SCRATCH_FLOAT", 18, Self::ScratchFloat),
        ("PARTICLE_ATTRIBUTE_PITCH", 20, Self::Pitch),
        ("PARTICLE_ATTRIBUTE_NORMAL", 21, Self::Normal),
        ("PARTICLE_ATTRIBUTE_GLOW_RGB", 22, Self::GlowRgb),
        ("PARTICLE_ATTRIBUTE_GLOW_ALPHA", 23, Self::GlowAlpha),
    ];
}
