//! Enumerations and flag sets stored in the attribute tree.
//!
//! Enumerations are authored either as their integer value or as their
//! upper-snake-case name (`PF_MAP_TYPE_REMAP`). Every enum the parser can
//! read implements [`KvEnum`] with an explicit member table.

use crate::kv::KvValue;

/// An enumeration readable from the attribute tree.
pub trait KvEnum: Copy + PartialEq + 'static {
    /// Type name used in [`crate::Error::UnknownEnumValue`].
    const NAME: &'static str;

    /// Common prefix shared by the member names, stripped during
    /// normalized matching.
    const PREFIX: &'static str = "";

    /// `(name, integer value, member)` for every member.
    const MEMBERS: &'static [(&'static str, i64, Self)];

    /// Member with this exact name.
    fn from_name(name: &str) -> Option<Self> {
        Self::MEMBERS
            .iter()
            .find(|(n, _, _)| *n == name)
            .map(|&(_, _, m)| m)
    }

    /// Member with this integer value.
    fn from_index(index: i64) -> Option<Self> {
        Self::MEMBERS
            .iter()
            .find(|(_, i, _)| *i == index)
            .map(|&(_, _, m)| m)
    }

    /// Member whose normalized name equals the normalized `name`.
    ///
    /// See [`normalize_enum_name`].
    fn from_normalized_name(name: &str) -> Option<Self> {
        let wanted = normalize_enum_name(name, Self::PREFIX);
        Self::MEMBERS
            .iter()
            .find(|(n, _, _)| normalize_enum_name(n, Self::PREFIX) == wanted)
            .map(|&(_, _, m)| m)
    }

    /// Canonical name of this member.
    fn name(self) -> &'static str {
        Self::MEMBERS
            .iter()
            .find(|(_, _, m)| *m == self)
            .map(|(n, _, _)| *n)
            .unwrap_or("UNKNOWN")
    }

    /// Integer value of this member.
    fn index(self) -> i64 {
        Self::MEMBERS
            .iter()
            .find(|(_, _, m)| *m == self)
            .map(|(_, i, _)| *i)
            .unwrap_or(-1)
    }

    /// Exact match on a string name or integer value.
    fn from_kv(value: &KvValue) -> Option<Self> {
        match value {
            KvValue::String(s) => Self::from_name(s),
            other => other.as_i64().and_then(Self::from_index),
        }
    }

    /// Normalized match on a string name, exact match on an integer value.
    fn from_kv_normalized(value: &KvValue) -> Option<Self> {
        match value {
            KvValue::String(s) => Self::from_normalized_name(s),
            other => other.as_i64().and_then(Self::from_index),
        }
    }
}

/// Normalize an enum member name for tolerant matching.
///
/// The name is ASCII upper-cased and stripped of every non-alphanumeric
/// character; then `prefix`, normalized the same way, is removed from the
/// front if present and something remains after it. `"pf_type_literal"`,
/// `"PF_TYPE_LITERAL"` and `"Literal"` all normalize to `"LITERAL"` under
/// the prefix `"PF_TYPE_"`.
pub fn normalize_enum_name(name: &str, prefix: &str) -> String {
    fn squash(s: &str) -> String {
        s.chars()
            .filter(char::is_ascii_alphanumeric)
            .map(|c| c.to_ascii_uppercase())
            .collect()
    }

    let name = squash(name);
    let prefix = squash(prefix);
    if !prefix.is_empty() {
        if let Some(rest) = name.strip_prefix(prefix.as_str()) {
            if !rest.is_empty() {
                return rest.to_string();
            }
        }
    }
    name
}

/// A flag set read from a raw integer.
///
/// Bits with no named flag are retained, not rejected. Bits that do not
/// fit the flag set's width are an error, never dropped.
pub trait KvFlags: Copy {
    /// Description used in type mismatch errors.
    const EXPECTED: &'static str;

    /// Build from raw bits without validating flag names; `None` when the
    /// bits do not fit.
    fn try_from_bits(bits: u64) -> Option<Self>;
}

impl KvFlags for u64 {
    const EXPECTED: &'static str = "64-bit flags";

    fn try_from_bits(bits: u64) -> Option<Self> {
        Some(bits)
    }
}

impl KvFlags for u32 {
    const EXPECTED: &'static str = "32-bit flags";

    fn try_from_bits(bits: u64) -> Option<Self> {
        u32::try_from(bits).ok()
    }
}
