//! Attribute tree values.
//!
//! A parsed particle definition is a tree of [`KvObject`]s whose leaves are
//! [`KvValue`]s. The tree is produced by the asset loader and is read-only
//! from this crate's point of view.

use std::fmt;

use crate::util::{Error, Result};

/// A single value in the attribute tree.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum KvValue {
    /// Explicit null
    #[default]
    Null,
    /// Boolean
    Bool(bool),
    /// Signed integer
    Int(i64),
    /// Unsigned integer that does not fit in `i64`
    UInt(u64),
    /// Floating point
    Float(f64),
    /// UTF-8 string (also used for enum names and resource references)
    String(String),
    /// Ordered array of values
    Array(Vec<KvValue>),
    /// Nested sub-tree
    Object(KvObject),
}

impl KvValue {
    /// Short name of the value's shape, used in type mismatch messages.
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::UInt(_) => "uint",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
        }
    }

    /// Numeric value as `f64`. Booleans convert to 0/1; numeric strings
    /// are parsed.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Self::Int(v) => Some(*v as f64),
            Self::UInt(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            Self::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Integral value as `i64`.
    ///
    /// Floats, and strings holding a float, are accepted only when they
    /// hold an exact integer.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            Self::UInt(v) => i64::try_from(*v).ok(),
            Self::Float(v) => float_to_i64(*v),
            Self::String(s) => {
                let s = s.trim();
                s.parse().ok().or_else(|| s.parse().ok().and_then(float_to_i64))
            }
            _ => None,
        }
    }

    /// Integral value reinterpreted as raw `u64` bits.
    pub fn as_bits(&self) -> Option<u64> {
        match self {
            Self::Int(v) => Some(*v as u64),
            Self::UInt(v) => Some(*v),
            _ => None,
        }
    }

    /// Boolean value. Integers convert with non-zero meaning true.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Int(v) => Some(*v != 0),
            Self::UInt(v) => Some(*v != 0),
            _ => None,
        }
    }

    /// String contents.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Array elements.
    pub fn as_array(&self) -> Option<&[KvValue]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Sub-tree.
    pub fn as_object(&self) -> Option<&KvObject> {
        match self {
            Self::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Element at `index` of an array, or of an array-like object keyed
    /// `"0"`, `"1"`, ...
    pub fn element(&self, index: usize) -> Option<&KvValue> {
        match self {
            Self::Array(items) => items.get(index),
            Self::Object(obj) => obj.get(&index.to_string()),
            _ => None,
        }
    }

    /// Number of elements of an array or array-like object.
    pub fn element_count(&self) -> usize {
        match self {
            Self::Array(items) => items.len(),
            Self::Object(obj) => (0..).take_while(|i| obj.contains_key(&i.to_string())).count(),
            _ => 0,
        }
    }
}

fn float_to_i64(v: f64) -> Option<i64> {
    let in_range = v >= i64::MIN as f64 && v <= i64::MAX as f64;
    (v.fract() == 0.0 && in_range).then_some(v as i64)
}

impl From<bool> for KvValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for KvValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for KvValue {
    fn from(v: i32) -> Self {
        Self::Int(v as i64)
    }
}

impl From<f64> for KvValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<f32> for KvValue {
    fn from(v: f32) -> Self {
        Self::Float(v as f64)
    }
}

impl From<&str> for KvValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for KvValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<KvObject> for KvValue {
    fn from(v: KvObject) -> Self {
        Self::Object(v)
    }
}

impl From<Vec<KvValue>> for KvValue {
    fn from(v: Vec<KvValue>) -> Self {
        Self::Array(v)
    }
}

/// An ordered collection of key/value pairs; one node of the attribute tree.
///
/// Lookup is linear: definition nodes hold a handful of keys each.
#[derive(Clone, Default, PartialEq)]
pub struct KvObject {
    entries: Vec<(String, KvValue)>,
}

impl KvObject {
    /// Create an empty object.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<KvValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace a value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<KvValue>) {
        let key = key.into();
        let value = value.into();

        // Update existing or add new
        for (k, v) in &mut self.entries {
            if k == &key {
                *v = value;
                return;
            }
        }
        self.entries.push((key, value));
    }

    /// Get a value by key.
    pub fn get(&self, key: &str) -> Option<&KvValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Check if a key exists.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Get the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over key-value pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &KvValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterate over keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    // === Typed extraction ===

    /// Get a value, failing with [`Error::MissingKey`] if absent.
    pub fn require(&self, key: &str) -> Result<&KvValue> {
        self.get(key).ok_or_else(|| Error::missing(key))
    }

    /// Get and convert a scalar value.
    pub fn get_scalar<T: FromKv>(&self, key: &str) -> Result<T> {
        let value = self.require(key)?;
        T::from_kv(value).ok_or_else(|| Error::mismatch(key, T::EXPECTED, value.type_name()))
    }

    /// Get a string value.
    pub fn get_str(&self, key: &str) -> Result<&str> {
        let value = self.require(key)?;
        value
            .as_str()
            .ok_or_else(|| Error::mismatch(key, "string", value.type_name()))
    }

    /// Get an array value.
    pub fn get_array(&self, key: &str) -> Result<&[KvValue]> {
        let value = self.require(key)?;
        value
            .as_array()
            .ok_or_else(|| Error::mismatch(key, "array", value.type_name()))
    }

    /// Get a nested sub-tree.
    pub fn get_object(&self, key: &str) -> Result<&KvObject> {
        let value = self.require(key)?;
        value
            .as_object()
            .ok_or_else(|| Error::mismatch(key, "object", value.type_name()))
    }

    /// Get an array of numbers as `f64`.
    ///
    /// Accepts arrays and array-like objects.
    pub fn get_number_array(&self, key: &str) -> Result<Vec<f64>> {
        let value = self.require(key)?;
        if !matches!(value, KvValue::Array(_) | KvValue::Object(_)) {
            return Err(Error::mismatch(key, "numeric array", value.type_name()));
        }
        (0..value.element_count())
            .map(|i| {
                value
                    .element(i)
                    .and_then(KvValue::as_f64)
                    .ok_or_else(|| Error::mismatch(key, "numeric array", "mixed array"))
            })
            .collect()
    }
}

impl fmt::Debug for KvObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(k, v)| (k, v)))
            .finish()
    }
}

impl FromIterator<(String, KvValue)> for KvObject {
    fn from_iter<T: IntoIterator<Item = (String, KvValue)>>(iter: T) -> Self {
        let mut obj = Self::new();
        for (k, v) in iter {
            obj.insert(k, v);
        }
        obj
    }
}

// === Scalar conversion ===

/// Types that can be read out of a single [`KvValue`].
pub trait FromKv: Sized {
    /// Human-readable type name for mismatch errors.
    const EXPECTED: &'static str;

    /// Convert, returning `None` when the value has the wrong shape.
    fn from_kv(value: &KvValue) -> Option<Self>;
}

impl FromKv for f32 {
    const EXPECTED: &'static str = "float";

    fn from_kv(value: &KvValue) -> Option<Self> {
        value.as_f64().map(|v| v as f32)
    }
}

impl FromKv for f64 {
    const EXPECTED: &'static str = "double";

    fn from_kv(value: &KvValue) -> Option<Self> {
        value.as_f64()
    }
}

impl FromKv for i64 {
    const EXPECTED: &'static str = "integer";

    fn from_kv(value: &KvValue) -> Option<Self> {
        value.as_i64()
    }
}

impl FromKv for i32 {
    const EXPECTED: &'static str = "int32";

    fn from_kv(value: &KvValue) -> Option<Self> {
        value.as_i64().and_then(|v| i32::try_from(v).ok())
    }
}

impl FromKv for u32 {
    const EXPECTED: &'static str = "uint32";

    fn from_kv(value: &KvValue) -> Option<Self> {
        value.as_i64().and_then(|v| u32::try_from(v).ok())
    }
}

impl FromKv for u64 {
    const EXPECTED: &'static str = "uint64";

    fn from_kv(value: &KvValue) -> Option<Self> {
        match value {
            KvValue::UInt(v) => Some(*v),
            _ => value.as_i64().and_then(|v| u64::try_from(v).ok()),
        }
    }
}

impl FromKv for usize {
    const EXPECTED: &'static str = "index";

    fn from_kv(value: &KvValue) -> Option<Self> {
        value.as_i64().and_then(|v| usize::try_from(v).ok())
    }
}

impl FromKv for bool {
    const EXPECTED: &'static str = "bool";

    fn from_kv(value: &KvValue) -> Option<Self> {
        value.as_bool()
    }
}

impl FromKv for String {
    const EXPECTED: &'static str = "string";

    fn from_kv(value: &KvValue) -> Option<Self> {
        value.as_str().map(str::to_string)
    }
}

impl FromKv for crate::util::Vec3 {
    const EXPECTED: &'static str = "vector3";

    fn from_kv(value: &KvValue) -> Option<Self> {
        let c = |i: usize| value.element(i).and_then(KvValue::as_f64).map(|v| v as f32);
        Some(Self::new(c(0)?, c(1)?, c(2)?))
    }
}
