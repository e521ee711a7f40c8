//! Color gradients (`m_Gradient`).

use smallvec::SmallVec;

use crate::parser::DefinitionParser;
use crate::util::{inverse_lerp, Result, Vec3};

/// One gradient stop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientStop {
    /// Position along the gradient, nominally [0, 1].
    pub position: f32,
    /// Color in unit range.
    pub color: Vec3,
}

/// Linear color gradient, clamped at the first and last stop.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ColorGradient {
    stops: SmallVec<[GradientStop; 4]>,
}

impl ColorGradient {
    /// Build from stops in any order.
    pub fn new(stops: impl IntoIterator<Item = GradientStop>) -> Self {
        let mut stops: SmallVec<[GradientStop; 4]> = stops.into_iter().collect();
        stops.sort_by(|a, b| a.position.total_cmp(&b.position));
        Self { stops }
    }

    /// Read `m_Stops`, each with `m_flPosition` and a packed `m_Color`.
    pub fn from_parser(parse: &DefinitionParser<'_>) -> Result<Self> {
        let stops = parse
            .array("m_Stops")?
            .iter()
            .map(|stop| -> Result<GradientStop> {
                Ok(GradientStop {
                    position: stop.float("m_flPosition")?,
                    color: stop.color24("m_Color")?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(stops))
    }

    /// Stops sorted by position.
    pub fn stops(&self) -> &[GradientStop] {
        &self.stops
    }

    /// Color at `t`. An empty gradient is white.
    pub fn evaluate(&self, t: f32) -> Vec3 {
        let (first, last) = match (self.stops.first(), self.stops.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Vec3::ONE,
        };
        if t <= first.position {
            return first.color;
        }
        if t >= last.position {
            return last.color;
        }
        for pair in self.stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t <= b.position {
                return a.color.lerp(b.color, inverse_lerp(a.position, b.position, t));
            }
        }
        last.color
    }
}
