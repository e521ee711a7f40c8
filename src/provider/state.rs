//! Simulation state providers are evaluated against.
//!
//! The simulation itself lives elsewhere; these are the read-only views it
//! passes in when asking a provider for a value.

use super::ParticleField;
use crate::util::{Quat, Vec3};

/// One particle's attributes.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    /// Index of the particle within its system ("particle number").
    pub index: usize,
    pub position: Vec3,
    pub position_previous: Vec3,
    pub velocity: Vec3,
    /// Total lifetime in seconds.
    pub lifetime: f32,
    /// Seconds since creation.
    pub age: f32,
    pub creation_time: f32,
    pub radius: f32,
    pub roll: f32,
    pub roll_speed: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub color: Vec3,
    pub alpha: f32,
    pub alpha2: f32,
    pub sequence: f32,
    pub sequence2: f32,
    pub trail_length: f32,
    pub particle_id: u32,
    pub normal: Vec3,
    pub glow_rgb: Vec3,
    pub glow_alpha: f32,
    pub scratch_vector: Vec3,
    pub scratch_float: f32,
}

impl Default for Particle {
    fn default() -> Self {
        Self {
            index: 0,
            position: Vec3::ZERO,
            position_previous: Vec3::ZERO,
            velocity: Vec3::ZERO,
            lifetime: 1.0,
            age: 0.0,
            creation_time: 0.0,
            radius: 5.0,
            roll: 0.0,
            roll_speed: 0.0,
            yaw: 0.0,
            pitch: 0.0,
            color: Vec3::ONE,
            alpha: 1.0,
            alpha2: 1.0,
            sequence: 0.0,
            sequence2: 0.0,
            trail_length: 1.0,
            particle_id: 0,
            normal: Vec3::Z,
            glow_rgb: Vec3::ONE,
            glow_alpha: 1.0,
            scratch_vector: Vec3::ZERO,
            scratch_float: 0.0,
        }
    }
}

impl Particle {
    /// Create a particle with default attributes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Age as a fraction of lifetime, clamped to [0, 1].
    ///
    /// A particle with no lifetime counts as fully aged.
    pub fn normalized_age(&self) -> f32 {
        if self.lifetime <= 0.0 {
            1.0
        } else {
            (self.age / self.lifetime).clamp(0.0, 1.0)
        }
    }

    /// Speed (length of velocity).
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Read a scalar attribute.
    ///
    /// Vector attributes and untracked attributes read as 0.
    pub fn scalar(&self, field: ParticleField) -> f32 {
        match field {
            ParticleField::LifeDuration => self.lifetime,
            ParticleField::Radius => self.radius,
            ParticleField::Roll => self.roll,
            ParticleField::RollSpeed => self.roll_speed,
            ParticleField::Alpha => self.alpha,
            ParticleField::CreationTime => self.creation_time,
            ParticleField::SequenceNumber => self.sequence,
            ParticleField::TrailLength => self.trail_length,
            ParticleField::ParticleId => self.particle_id as f32,
            ParticleField::Yaw => self.yaw,
            ParticleField::SecondSequenceNumber => self.sequence2,
            ParticleField::Alpha2 => self.alpha2,
            ParticleField::ScratchFloat => self.scratch_float,
            ParticleField::Pitch => self.pitch,
            ParticleField::GlowAlpha => self.glow_alpha,
            ParticleField::HitboxIndex
            | ParticleField::Position
            | ParticleField::PositionPrevious
            | ParticleField::Color
            | ParticleField::HitboxOffsetPosition
            | ParticleField::ScratchVector
            | ParticleField::Normal
            | ParticleField::GlowRgb => 0.0,
        }
    }

    /// Read a vector attribute.
    ///
    /// Scalar attributes are splatted across all three components.
    pub fn vector(&self, field: ParticleField) -> Vec3 {
        match field {
            ParticleField::Position => self.position,
            ParticleField::PositionPrevious => self.position_previous,
            ParticleField::Color => self.color,
            ParticleField::ScratchVector => self.scratch_vector,
            ParticleField::Normal => self.normal,
            ParticleField::GlowRgb => self.glow_rgb,
            ParticleField::HitboxOffsetPosition => Vec3::ZERO,
            scalar => Vec3::splat(self.scalar(scalar)),
        }
    }
}

/// Position and orientation of one control point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControlPoint {
    pub position: Vec3,
    pub orientation: Quat,
}

impl ControlPoint {
    /// Control point at the origin with identity orientation.
    pub const ORIGIN: Self = Self {
        position: Vec3::ZERO,
        orientation: Quat::IDENTITY,
    };

    /// Control point at `position` with identity orientation.
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            orientation: Quat::IDENTITY,
        }
    }
}

impl Default for ControlPoint {
    fn default() -> Self {
        Self::ORIGIN
    }
}

/// System-wide state shared by every particle in one step.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SystemRenderState {
    /// Seconds since the system started.
    pub age: f32,
    /// Control points by index.
    pub control_points: Vec<ControlPoint>,
    /// Level of detail, 0 (highest) to 3.
    pub detail_level: usize,
    /// Number of live particles.
    pub particle_count: usize,
}

impl SystemRenderState {
    /// Create an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style age setter.
    pub fn with_age(mut self, age: f32) -> Self {
        self.age = age;
        self
    }

    /// Builder-style detail level setter.
    pub fn with_detail_level(mut self, level: usize) -> Self {
        self.detail_level = level;
        self
    }

    /// Builder-style particle count setter.
    pub fn with_particle_count(mut self, count: usize) -> Self {
        self.particle_count = count;
        self
    }

    /// Builder-style control point setter; grows the list as needed.
    pub fn with_control_point(mut self, index: usize, cp: ControlPoint) -> Self {
        if self.control_points.len() <= index {
            self.control_points.resize(index + 1, ControlPoint::ORIGIN);
        }
        self.control_points[index] = cp;
        self
    }

    /// Control point by index; unset control points sit at the origin.
    pub fn control_point(&self, index: usize) -> ControlPoint {
        self.control_points.get(index).copied().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_age() {
        let mut p = Particle::new();
        p.lifetime = 4.0;
        p.age = 1.0;
        assert_eq!(p.normalized_age(), 0.25);
        p.age = 10.0;
        assert_eq!(p.normalized_age(), 1.0);
        p.lifetime = 0.0;
        assert_eq!(p.normalized_age(), 1.0);
    }

    #[test]
    fn test_field_access() {
        let mut p = Particle::new();
        p.radius = 7.0;
        p.position = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(p.scalar(ParticleField::Radius), 7.0);
        assert_eq!(p.scalar(ParticleField::Position), 0.0);
        assert_eq!(p.vector(ParticleField::Position), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(p.vector(ParticleField::Radius), Vec3::splat(7.0));
    }

    #[test]
    fn test_control_points() {
        let state = SystemRenderState::new().with_control_point(2, ControlPoint::at(Vec3::X));
        assert_eq!(state.control_points.len(), 3);
        assert_eq!(state.control_point(2).position, Vec3::X);
        assert_eq!(state.control_point(0), ControlPoint::ORIGIN);
        assert_eq!(state.control_point(9), ControlPoint::ORIGIN);
    }
}
