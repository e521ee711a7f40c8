//! Math type re-exports and scalar helpers used by providers.
//!
//! Vector and quaternion types come from `glam`; the free functions here
//! are the interpolation and bias curves shared by number mappings,
//! biased random providers and vector interpolation.

// Re-export glam types
pub use glam::{Quat, Vec3};

/// Linear interpolation between `a` and `b`.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Position of `x` inside `[a, b]` as a fraction.
///
/// A degenerate range returns 0.
#[inline]
pub fn inverse_lerp(a: f32, b: f32, x: f32) -> f32 {
    let range = b - a;
    if range.abs() <= f32::EPSILON {
        0.0
    } else {
        (x - a) / range
    }
}

/// Schlick bias: bends `x` in [0, 1] towards 0 or 1, identity at `b = 0.5`.
#[inline]
pub fn bias(x: f32, b: f32) -> f32 {
    let b = b.clamp(0.0001, 0.9999);
    x.powf(b.ln() / 0.5f32.ln())
}

/// Gain: bias applied symmetrically around 0.5, identity at `g = 0.5`.
#[inline]
pub fn gain(x: f32, g: f32) -> f32 {
    if x < 0.5 {
        0.5 * bias(2.0 * x, 1.0 - g)
    } else {
        1.0 - 0.5 * bias(2.0 - 2.0 * x, 1.0 - g)
    }
}

/// Exponential bias, `(e^(k x) - 1) / (e^k - 1)`; identity when `k` is ~0.
#[inline]
pub fn exponential_bias(x: f32, k: f32) -> f32 {
    if k.abs() < 1e-4 {
        x
    } else {
        (k * x).exp_m1() / k.exp_m1()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(2.0, 4.0, 0.5), 3.0);
        assert_eq!(lerp(2.0, 4.0, 0.0), 2.0);
        assert_eq!(lerp(2.0, 4.0, 1.0), 4.0);
    }

    #[test]
    fn test_inverse_lerp() {
        assert_eq!(inverse_lerp(0.0, 10.0, 2.5), 0.25);
        assert_eq!(inverse_lerp(5.0, 5.0, 7.0), 0.0);
    }

    #[test]
    fn test_bias_identity_at_half() {
        for x in [0.0, 0.1, 0.5, 0.9, 1.0] {
            assert_relative_eq!(bias(x, 0.5), x, epsilon = 1e-5);
            assert_relative_eq!(gain(x, 0.5), x, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_bias_endpoints() {
        for b in [0.1, 0.3, 0.7, 0.9] {
            assert_relative_eq!(bias(0.0, b), 0.0, epsilon = 1e-6);
            assert_relative_eq!(bias(1.0, b), 1.0, epsilon = 1e-6);
        }
        // Low bias pulls towards zero
        assert!(bias(0.5, 0.2) < 0.5);
        assert!(bias(0.5, 0.8) > 0.5);
    }

    #[test]
    fn test_exponential_bias() {
        assert_relative_eq!(exponential_bias(0.3, 0.0), 0.3);
        assert_relative_eq!(exponential_bias(0.0, 2.0), 0.0, epsilon = 1e-6);
        assert_relative_eq!(exponential_bias(1.0, 2.0), 1.0, epsilon = 1e-6);
        assert!(exponential_bias(0.5, 2.0) < 0.5);
    }
}
