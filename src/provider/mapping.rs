//! Input-to-output mapping shared by the state-driven number providers.
//!
//! A provider such as `PF_TYPE_PARTICLE_AGE` reads a raw input from the
//! simulation and then runs it through its mapping: pass-through, a
//! multiplier, a linear (optionally biased) remap, or a curve.

use smallvec::SmallVec;

use crate::parser::{DefinitionParser, KvEnum};
use crate::util::{bias, exponential_bias, gain, inverse_lerp, lerp, Result};

/// How the raw input is turned into the output (`m_nMapType`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PfMapType {
    /// Unset in the source data; behaves like `Direct`.
    Invalid,
    /// Output equals input.
    #[default]
    Direct,
    /// Output is input times `m_flMultFactor`.
    Mult,
    /// Linear remap from `[m_flInput0, m_flInput1]` to `[m_flOutput0, m_flOutput1]`.
    Remap,
    /// `Remap` with a bias curve applied to the normalized input.
    RemapBiased,
    /// Piecewise curve lookup.
    Curve,
    /// Unset in the source data; behaves like `Direct`.
    NotInitialized,
}

impl KvEnum for PfMapType {
    const NAME: &'static str = "PfMapType";
    const PREFIX: &'static str = "PF_MAP_TYPE_";
    const MEMBERS: &'static [(&'static str, i64, Self)] = &[
        ("PF_MAP_TYPE_INVALID", -1, Self::Invalid),
        ("PF_MAP_TYPE_DIRECT", 0, Self::Direct),
        ("PF_MAP_TYPE_MULT", 1, Self::Mult),
        ("PF_MAP_TYPE_REMAP", 2, Self::Remap),
        ("PF_MAP_TYPE_REMAP_BIASED", 3, Self::RemapBiased),
        ("PF_MAP_TYPE_CURVE", 4, Self::Curve),
        ("PF_MAP_TYPE_NOTINITIALIZED", 5, Self::NotInitialized),
    ];
}

/// Treatment of inputs outside the mapped range (`m_nInputMode`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PfInputMode {
    /// Clamp to the range.
    #[default]
    Clamped,
    /// Wrap around the range.
    Looped,
}

impl PfInputMode {
    /// Apply to an input already normalized to [0, 1].
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        match self {
            Self::Clamped => t.clamp(0.0, 1.0),
            Self::Looped => t.rem_euclid(1.0),
        }
    }
}

impl KvEnum for PfInputMode {
    const NAME: &'static str = "PfInputMode";
    const PREFIX: &'static str = "PF_INPUT_MODE_";
    const MEMBERS: &'static [(&'static str, i64, Self)] = &[
        ("PF_INPUT_MODE_CLAMPED", 0, Self::Clamped),
        ("PF_INPUT_MODE_LOOPED", 1, Self::Looped),
    ];
}

/// Bias curve family (`m_nBiasType`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PfBiasType {
    /// Unset; no bias.
    Invalid,
    /// Schlick bias.
    #[default]
    Standard,
    /// Symmetric gain.
    Gain,
    /// Exponential ease.
    Exponential,
}

impl PfBiasType {
    /// Apply the curve to `x` in [0, 1] with the given parameter.
    #[inline]
    pub fn apply(self, x: f32, parameter: f32) -> f32 {
        match self {
            Self::Invalid => x,
            Self::Standard => bias(x, parameter),
            Self::Gain => gain(x, parameter),
            Self::Exponential => exponential_bias(x, parameter),
        }
    }
}

impl KvEnum for PfBiasType {
    const NAME: &'static str = "PfBiasType";
    const PREFIX: &'static str = "PF_BIAS_TYPE_";
    const MEMBERS: &'static [(&'static str, i64, Self)] = &[
        ("PF_BIAS_TYPE_INVALID", -1, Self::Invalid),
        ("PF_BIAS_TYPE_STANDARD", 0, Self::Standard),
        ("PF_BIAS_TYPE_GAIN", 1, Self::Gain),
        ("PF_BIAS_TYPE_EXPONENTIAL", 2, Self::Exponential),
    ];
}

/// One point of a mapping curve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CurvePoint {
    pub x: f32,
    pub y: f32,
}

/// Piecewise-linear curve (`m_Curve`).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Curve {
    points: SmallVec<[CurvePoint; 8]>,
    domain_min: f32,
    domain_max: f32,
}

impl Curve {
    /// Build from points; the domain spans the first to the last point.
    pub fn new(points: impl IntoIterator<Item = CurvePoint>) -> Self {
        let mut points: SmallVec<[CurvePoint; 8]> = points.into_iter().collect();
        points.sort_by(|a, b| a.x.total_cmp(&b.x));
        let domain_min = points.first().map_or(0.0, |p| p.x);
        let domain_max = points.last().map_or(1.0, |p| p.x);
        Self {
            points,
            domain_min,
            domain_max,
        }
    }

    /// Read `m_spline` points (`x`, `y`) and the optional
    /// `m_vDomainMins` / `m_vDomainMaxs` input range.
    pub fn from_parser(parse: &DefinitionParser<'_>) -> Result<Self> {
        let points = parse
            .array("m_spline")?
            .iter()
            .map(|p| -> Result<CurvePoint> {
                Ok(CurvePoint { x: p.float("x")?, y: p.float("y")? })
            })
            .collect::<Result<Vec<_>>>()?;
        let first = |key: &str, default: f64| -> Result<f32> {
            let values = parse.data().get_number_array(key)?;
            Ok(values.first().copied().unwrap_or(default) as f32)
        };
        let mut curve = Self::new(points);
        if parse.contains("m_vDomainMins") {
            curve.domain_min = first("m_vDomainMins", 0.0)?;
        }
        if parse.contains("m_vDomainMaxs") {
            curve.domain_max = first("m_vDomainMaxs", 1.0)?;
        }
        Ok(curve)
    }

    /// Evaluate at `x`, folding `x` into the domain with `mode` first.
    pub fn evaluate(&self, x: f32, mode: PfInputMode) -> f32 {
        let (first, last) = match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return 0.0,
        };
        let t = mode.apply(inverse_lerp(self.domain_min, self.domain_max, x));
        let x = lerp(self.domain_min, self.domain_max, t);

        if x <= first.x {
            return first.y;
        }
        if x >= last.x {
            return last.y;
        }
        for pair in self.points.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if x <= b.x {
                return lerp(a.y, b.y, inverse_lerp(a.x, b.x, x));
            }
        }
        last.y
    }
}

/// Mapping parameters of a number provider.
#[derive(Clone, Debug, PartialEq)]
pub struct NumberProviderMapping {
    pub map_type: PfMapType,
    pub input0: f32,
    pub input1: f32,
    pub output0: f32,
    pub output1: f32,
    pub mult_factor: f32,
    pub bias_parameter: f32,
    pub input_mode: PfInputMode,
    pub curve: Option<Curve>,
}

impl Default for NumberProviderMapping {
    fn default() -> Self {
        Self {
            map_type: PfMapType::Direct,
            input0: 0.0,
            input1: 1.0,
            output0: 0.0,
            output1: 1.0,
            mult_factor: 1.0,
            bias_parameter: 0.5,
            input_mode: PfInputMode::Clamped,
            curve: None,
        }
    }
}

impl NumberProviderMapping {
    /// Read the mapping fields of a provider sub-tree.
    ///
    /// `m_Curve` is required only when the map type is `PF_MAP_TYPE_CURVE`.
    pub fn from_parser(parse: &DefinitionParser<'_>) -> Result<Self> {
        let defaults = Self::default();
        let map_type = parse.enum_normalized_or("m_nMapType", defaults.map_type)?;
        let curve = match map_type {
            PfMapType::Curve => Some(Curve::from_parser(&parse.object("m_Curve")?)?),
            _ => None,
        };

        Ok(Self {
            map_type,
            input0: parse.float_or("m_flInput0", defaults.input0)?,
            input1: parse.float_or("m_flInput1", defaults.input1)?,
            output0: parse.float_or("m_flOutput0", defaults.output0)?,
            output1: parse.float_or("m_flOutput1", defaults.output1)?,
            mult_factor: parse.float_or("m_flMultFactor", defaults.mult_factor)?,
            bias_parameter: parse.float_or("m_flBiasParameter", defaults.bias_parameter)?,
            input_mode: parse.enum_normalized_or("m_nInputMode", defaults.input_mode)?,
            curve,
        })
    }

    /// Map a raw input value.
    pub fn apply(&self, value: f32) -> f32 {
        match self.map_type {
            PfMapType::Direct | PfMapType::Invalid | PfMapType::NotInitialized => value,
            PfMapType::Mult => value * self.mult_factor,
            PfMapType::Remap => {
                let t = self.input_mode.apply(inverse_lerp(self.input0, self.input1, value));
                lerp(self.output0, self.output1, t)
            }
            PfMapType::RemapBiased => {
                let t = self.input_mode.apply(inverse_lerp(self.input0, self.input1, value));
                lerp(self.output0, self.output1, bias(t, self.bias_parameter))
            }
            PfMapType::Curve => match &self.curve {
                Some(curve) => curve.evaluate(value, self.input_mode),
                None => value,
            },
        }
    }
}
