//! Root motion flags of an animation.

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

use crate::parser::KvFlags;

/// Which root motion components an animation drives.
///
/// Read with [`crate::parser::DefinitionParser::bitmask`]; bits without a
/// name are kept as they are.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct MotionFlags(u32);

impl MotionFlags {
    pub const EMPTY: Self = Self(0);
    /// Translation along X
    pub const TX: Self = Self(64);
    /// Translation along Y
    pub const TY: Self = Self(128);
    /// Translation along Z
    pub const TZ: Self = Self(256);
    /// Rotation around Z
    pub const RZ: Self = Self(2048);
    /// Linear interpolation between motion keys
    pub const LINEAR: Self = Self(4096);

    const NAMED: [(&'static str, Self); 5] = [
        ("TX", Self::TX),
        ("TY", Self::TY),
        ("TZ", Self::TZ),
        ("RZ", Self::RZ),
        ("LINEAR", Self::LINEAR),
    ];

    /// Raw bits.
    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Build from raw bits, keeping unnamed ones.
    #[inline]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// True if every bit of `other` is set.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Bits not covered by any named flag.
    pub fn unknown_bits(self) -> u32 {
        let known = Self::NAMED.iter().fold(0, |acc, (_, f)| acc | f.0);
        self.0 & !known
    }
}

impl KvFlags for MotionFlags {
    const EXPECTED: &'static str = "32-bit flags";

    fn try_from_bits(bits: u64) -> Option<Self> {
        u32::try_from(bits).ok().map(Self)
    }
}

impl BitOr for MotionFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for MotionFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for MotionFlags {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl fmt::Debug for MotionFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = Self::NAMED
            .iter()
            .filter(|(_, flag)| self.contains(*flag))
            .map(|(name, _)| name.to_string())
            .collect();
        let unknown = self.unknown_bits();
        if unknown != 0 {
            parts.push(format!("{unknown:#x}"));
        }
        if parts.is_empty() {
            parts.push("EMPTY".to_string());
        }
        write!(f, "MotionFlags({})", parts.join(" | "))
    }
}
