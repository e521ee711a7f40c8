//! Typed accessor over one node of a particle definition.
//!
//! [`DefinitionParser`] borrows a [`KvObject`] and a [`DiagnosticSink`] and
//! offers typed getters in two forms: `float(key)` fails when the key is
//! absent, `float_or(key, default)` returns the default instead. Every
//! default form goes through [`DefinitionParser::value_or_default`], so a
//! present key with the wrong shape is an error either way.
//!
//! The accessor is also the provider factory: [`DefinitionParser::number_provider`]
//! and [`DefinitionParser::vector_provider`] read the `m_nType`
//! discriminator of a sub-tree and build the matching provider.

use std::fmt;

use tracing::{debug, trace};

use super::diagnostics::{Diagnostic, DiagnosticSink, TRACING_SINK};
use super::enums::{KvEnum, KvFlags};
use crate::kv::{FromKv, KvObject, KvValue};
use crate::provider::{
    NumberProvider, NumberProviderType, ParticleField, VectorProvider, VectorProviderType,
};
use crate::util::{Error, ProviderKind, Result, Vec3};

/// Discriminator key inside a provider sub-tree.
pub const TYPE_KEY: &str = "m_nType";
/// Fallback value of an unsupported number provider.
pub const NUMBER_LITERAL_KEY: &str = "m_flLiteralValue";
/// Fallback value of an unsupported vector provider.
pub const VECTOR_LITERAL_KEY: &str = "m_vLiteralValue";

/// Read-only typed view of one attribute tree node.
#[derive(Clone, Copy)]
pub struct DefinitionParser<'a> {
    data: &'a KvObject,
    sink: &'a dyn DiagnosticSink,
}

impl fmt::Debug for DefinitionParser<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefinitionParser").field("data", self.data).finish_non_exhaustive()
    }
}

impl<'a> DefinitionParser<'a> {
    /// Wrap a node, reporting diagnostics through `tracing`.
    pub fn new(data: &'a KvObject) -> Self {
        Self::with_sink(data, &TRACING_SINK)
    }

    /// Wrap a node with an explicit diagnostic sink.
    pub fn with_sink(data: &'a KvObject, sink: &'a dyn DiagnosticSink) -> Self {
        Self { data, sink }
    }

    /// Accessor for a child node sharing this accessor's sink.
    fn child(&self, data: &'a KvObject) -> Self {
        Self { data, sink: self.sink }
    }

    /// The wrapped node.
    pub fn data(&self) -> &'a KvObject {
        self.data
    }

    /// Check if `key` is present.
    pub fn contains(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Raw value at `key`.
    pub fn value(&self, key: &str) -> Result<&'a KvValue> {
        self.data.require(key)
    }

    /// Send a diagnostic to the sink.
    pub fn report(&self, diagnostic: Diagnostic) {
        self.sink.report(diagnostic);
    }

    /// Default contract shared by every `_or` getter: return `default` when
    /// `key` is absent, otherwise delegate to `parse`.
    pub fn value_or_default<T>(
        &self,
        key: &str,
        parse: impl FnOnce(&Self, &str) -> Result<T>,
        default: T,
    ) -> Result<T> {
        if self.contains(key) {
            parse(self, key)
        } else {
            Ok(default)
        }
    }

    // === Scalars ===

    /// Read and convert a scalar.
    pub fn scalar<T: FromKv>(&self, key: &str) -> Result<T> {
        self.data.get_scalar(key)
    }

    /// Read and convert a scalar, or `default` if absent.
    pub fn scalar_or<T: FromKv>(&self, key: &str, default: T) -> Result<T> {
        self.value_or_default(key, Self::scalar, default)
    }

    pub fn float(&self, key: &str) -> Result<f32> {
        self.scalar(key)
    }

    pub fn float_or(&self, key: &str, default: f32) -> Result<f32> {
        self.value_or_default(key, Self::float, default)
    }

    pub fn int32(&self, key: &str) -> Result<i32> {
        self.scalar(key)
    }

    pub fn int32_or(&self, key: &str, default: i32) -> Result<i32> {
        self.value_or_default(key, Self::int32, default)
    }

    pub fn long(&self, key: &str) -> Result<i64> {
        self.scalar(key)
    }

    pub fn long_or(&self, key: &str, default: i64) -> Result<i64> {
        self.value_or_default(key, Self::long, default)
    }

    pub fn boolean(&self, key: &str) -> Result<bool> {
        self.scalar(key)
    }

    pub fn boolean_or(&self, key: &str, default: bool) -> Result<bool> {
        self.value_or_default(key, Self::boolean, default)
    }

    /// Read a string, borrowed from the tree.
    pub fn string(&self, key: &str) -> Result<&'a str> {
        self.data.get_str(key)
    }

    pub fn string_or(&self, key: &str, default: &'a str) -> Result<&'a str> {
        self.value_or_default(key, Self::string, default)
    }

    /// Read a 3-component vector from an array or an array-like object.
    pub fn vector3(&self, key: &str) -> Result<Vec3> {
        self.scalar(key)
    }

    pub fn vector3_or(&self, key: &str, default: Vec3) -> Result<Vec3> {
        self.value_or_default(key, Self::vector3, default)
    }

    /// Read a packed 8-bit color (`[r, g, b]` or `[r, g, b, a]`) as unit
    /// range RGB. Alpha is ignored.
    pub fn color24(&self, key: &str) -> Result<Vec3> {
        let channels = self.data.get_number_array(key)?;
        if channels.len() < 3 {
            let actual = format!("{}-element array", channels.len());
            return Err(Error::mismatch(key, "color (3 or 4 channels)", actual));
        }
        Ok(Vec3::new(channels[0] as f32, channels[1] as f32, channels[2] as f32) / 255.0)
    }

    pub fn color24_or(&self, key: &str, default: Vec3) -> Result<Vec3> {
        self.value_or_default(key, Self::color24, default)
    }

    // === Nested nodes ===

    /// One accessor per element of the array at `key`.
    ///
    /// An absent key is an empty array. Elements must be sub-trees.
    pub fn array(&self, key: &str) -> Result<Vec<DefinitionParser<'a>>> {
        if !self.contains(key) {
            return Ok(Vec::new());
        }
        self.data
            .get_array(key)?
            .iter()
            .map(|item| {
                item.as_object()
                    .map(|obj| self.child(obj))
                    .ok_or_else(|| {
                        let actual = format!("array of {}", item.type_name());
                        Error::mismatch(key, "array of objects", actual)
                    })
            })
            .collect()
    }

    /// Accessor for the sub-tree at `key`.
    pub fn object(&self, key: &str) -> Result<DefinitionParser<'a>> {
        Ok(self.child(self.data.get_object(key)?))
    }

    // === Enums and flags ===

    fn enum_with<E: KvEnum>(&self, key: &str, lookup: fn(&KvValue) -> Option<E>) -> Result<E> {
        let value = self.value(key)?;
        if let Some(member) = lookup(value) {
            return Ok(member);
        }
        let shown = match value {
            KvValue::String(s) => s.clone(),
            other => match other.as_i64() {
                Some(i) => i.to_string(),
                None => return Err(Error::mismatch(key, E::NAME, value.type_name())),
            },
        };
        Err(Error::UnknownEnumValue {
            enum_name: E::NAME,
            value: shown,
        })
    }

    /// Read an enum member by exact name or integer value.
    pub fn enum_value<E: KvEnum>(&self, key: &str) -> Result<E> {
        self.enum_with(key, E::from_kv)
    }

    pub fn enum_or<E: KvEnum>(&self, key: &str, default: E) -> Result<E> {
        self.value_or_default(key, Self::enum_value, default)
    }

    /// Read an enum member by normalized name or integer value.
    ///
    /// See [`super::normalize_enum_name`].
    pub fn enum_normalized<E: KvEnum>(&self, key: &str) -> Result<E> {
        self.enum_with(key, E::from_kv_normalized)
    }

    pub fn enum_normalized_or<E: KvEnum>(&self, key: &str, default: E) -> Result<E> {
        self.value_or_default(key, Self::enum_normalized, default)
    }

    /// Read a particle attribute index.
    pub fn particle_field(&self, key: &str) -> Result<ParticleField> {
        self.enum_normalized(key)
    }

    pub fn particle_field_or(&self, key: &str, default: ParticleField) -> Result<ParticleField> {
        self.value_or_default(key, Self::particle_field, default)
    }

    /// Read an integer as raw flag bits.
    pub fn bitmask_raw(&self, key: &str) -> Result<u64> {
        let value = self.value(key)?;
        value
            .as_bits()
            .ok_or_else(|| Error::mismatch(key, "integer flags", value.type_name()))
    }

    /// Read an integer as a flag set. Unknown bits are kept; bits wider
    /// than the flag set are a type mismatch.
    pub fn bitmask<F: KvFlags>(&self, key: &str) -> Result<F> {
        let bits = self.bitmask_raw(key)?;
        F::try_from_bits(bits)
            .ok_or_else(|| Error::mismatch(key, F::EXPECTED, format!("{bits:#x}")))
    }

    pub fn bitmask_or<F: KvFlags>(&self, key: &str, default: F) -> Result<F> {
        self.value_or_default(key, Self::bitmask, default)
    }

    // === Providers ===

    /// Build the number provider at `key`.
    ///
    /// A plain number (or bool) is a literal. A sub-tree is dispatched on
    /// its `m_nType`; an unsupported type falls back to its
    /// `m_flLiteralValue` with a diagnostic, or fails if it has none.
    pub fn number_provider(&self, key: &str) -> Result<NumberProvider> {
        let value = self.value(key)?;
        let Some(params) = value.as_object() else {
            return value
                .as_f64()
                .map(|v| NumberProvider::Literal(v as f32))
                .ok_or_else(|| Error::mismatch(key, "number provider", value.type_name()));
        };

        let parse = self.child(params);
        let type_name = parse.string(TYPE_KEY)?;
        match NumberProviderType::from_name(type_name) {
            Some(ty) => {
                debug!("building number provider '{key}' as {type_name}");
                NumberProvider::build(ty, &parse)
            }
            None if parse.contains(NUMBER_LITERAL_KEY) => {
                let literal = parse.float(NUMBER_LITERAL_KEY)?;
                self.report(Diagnostic::LiteralFallback {
                    kind: ProviderKind::Number,
                    type_name: type_name.to_string(),
                    key: key.to_string(),
                });
                Ok(NumberProvider::Literal(literal))
            }
            None => Err(Error::UnsupportedProviderType {
                kind: ProviderKind::Number,
                type_name: type_name.to_string(),
            }),
        }
    }

    pub fn number_provider_or(&self, key: &str, default: NumberProvider) -> Result<NumberProvider> {
        self.value_or_default(key, Self::number_provider, default)
    }

    /// Build the vector provider at `key`.
    ///
    /// Anything other than a sub-tree carrying `m_nType` is read as inline
    /// vector data. Unsupported types fall back to `m_vLiteralValue` with a
    /// diagnostic, or fail if it has none.
    pub fn vector_provider(&self, key: &str) -> Result<VectorProvider> {
        let params = match self.value(key)?.as_object() {
            Some(obj) if obj.contains_key(TYPE_KEY) => obj,
            _ => {
                trace!("vector provider '{key}' is inline data");
                return Ok(VectorProvider::Literal(self.vector3(key)?));
            }
        };

        let parse = self.child(params);
        let type_name = parse.string(TYPE_KEY)?;
        match VectorProviderType::from_name(type_name) {
            Some(ty) => {
                debug!("building vector provider '{key}' as {type_name}");
                VectorProvider::build(ty, &parse)
            }
            None if parse.contains(VECTOR_LITERAL_KEY) => {
                let literal = parse.vector3(VECTOR_LITERAL_KEY)?;
                self.report(Diagnostic::LiteralFallback {
                    kind: ProviderKind::Vector,
                    type_name: type_name.to_string(),
                    key: key.to_string(),
                });
                Ok(VectorProvider::Literal(literal))
            }
            None => Err(Error::UnsupportedProviderType {
                kind: ProviderKind::Vector,
                type_name: type_name.to_string(),
            }),
        }
    }

    pub fn vector_provider_or(&self, key: &str, default: VectorProvider) -> Result<VectorProvider> {
        self.value_or_default(key, Self::vector_provider, default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::CollectingSink;
    use approx::assert_relative_eq;
    use serde_json::json;

    fn tree(value: serde_json::Value) -> KvObject {
        KvObject::try_from(value).unwrap()
    }

    #[test]
    fn test_scalar_defaults() {
        let obj = tree(json!({"m_flRadius": 3.0}));
        let parse = DefinitionParser::new(&obj);
        assert_eq!(parse.float("m_flRadius").unwrap(), 3.0);
        assert_eq!(parse.float_or("m_flRadius", 9.0).unwrap(), 3.0);
        assert_eq!(parse.float_or("m_flAbsent", 9.0).unwrap(), 9.0);
        assert_eq!(parse.int32_or("m_nAbsent", -2).unwrap(), -2);
        assert_eq!(parse.long_or("m_nAbsent", 1 << 40).unwrap(), 1 << 40);
        assert!(parse.boolean_or("m_bAbsent", true).unwrap());
        assert_eq!(parse.string_or("m_name", "none").unwrap(), "none");
        assert_eq!(parse.vector3_or("m_v", Vec3::ONE).unwrap(), Vec3::ONE);
        assert!(parse.float("m_flAbsent").unwrap_err().is_missing_key());
    }

    #[test]
    fn test_wrong_shape_fails_both_forms() {
        let obj = tree(json!({"m_flRadius": "big"}));
        let parse = DefinitionParser::new(&obj);
        assert!(parse.float("m_flRadius").unwrap_err().is_type_mismatch());
        assert!(parse.float_or("m_flRadius", 1.0).unwrap_err().is_type_mismatch());
    }

    #[test]
    fn test_array_children() {
        let obj = tree(json!({
            "m_Children": [{"m_flDelay": 1.0}, {"m_flDelay": 2.0}],
            "m_Numbers": [1, 2],
        }));
        let parse = DefinitionParser::new(&obj);
        let children = parse.array("m_Children").unwrap();
        assert_eq!(children.len(), 2);
        assert_eq!(children[1].float("m_flDelay").unwrap(), 2.0);
        assert!(parse.array("m_Missing").unwrap().is_empty());
        assert!(parse.array("m_Numbers").unwrap_err().is_type_mismatch());
    }

    #[test]
    fn test_color24() {
        let obj = tree(json!({"rgb": [255, 128, 0], "rgba": [0, 0, 255, 10], "short": [1, 2]}));
        let parse = DefinitionParser::new(&obj);
        let c = parse.color24("rgb").unwrap();
        assert_relative_eq!(c.x, 1.0, epsilon = 1e-3);
        assert_relative_eq!(c.y, 0.502, epsilon = 1e-3);
        assert_relative_eq!(c.z, 0.0, epsilon = 1e-3);
        assert_eq!(parse.color24("rgba").unwrap(), Vec3::Z);
        assert!(parse.color24("short").unwrap_err().is_type_mismatch());
        assert_eq!(parse.color24_or("absent", Vec3::ONE).unwrap(), Vec3::ONE);
    }

    #[test]
    fn test_enum_errors() {
        let obj = tree(json!({"a": "PARTICLE_ATTRIBUTE_NOPE", "b": 19, "c": [1]}));
        let parse = DefinitionParser::new(&obj);
        assert!(matches!(
            parse.particle_field("a"),
            Err(Error::UnknownEnumValue { enum_name: "ParticleField", .. })
        ));
        assert!(matches!(parse.particle_field("b"), Err(Error::UnknownEnumValue { .. })));
        assert!(parse.particle_field("c").unwrap_err().is_type_mismatch());
        assert_eq!(
            parse.particle_field_or("d", ParticleField::Alpha).unwrap(),
            ParticleField::Alpha
        );
    }

    #[test]
    fn test_bitmask() {
        let obj = tree(json!({"m_nFlags": 0x1_0040_u64}));
        let parse = DefinitionParser::new(&obj);
        assert_eq!(parse.bitmask_raw("m_nFlags").unwrap(), 0x1_0040);
        assert_eq!(parse.bitmask::<u32>("m_nFlags").unwrap(), 0x1_0040);
        assert_eq!(parse.bitmask_or::<u64>("absent", 7).unwrap(), 7);
    }

    #[test]
    fn test_number_literal_short_circuit() {
        let obj = tree(json!({"m_flRate": 5.0, "m_bOn": true, "m_s": "x"}));
        let parse = DefinitionParser::new(&obj);
        assert_eq!(parse.number_provider("m_flRate").unwrap(), NumberProvider::Literal(5.0));
        assert_eq!(parse.number_provider("m_bOn").unwrap(), NumberProvider::Literal(1.0));
        assert!(parse.number_provider("m_s").unwrap_err().is_type_mismatch());
    }

    #[test]
    fn test_number_from_numeric_string() {
        let obj = tree(json!({"m_flRate": "5.0", "m_nCount": " 12 ", "m_flBad": "big"}));
        let parse = DefinitionParser::new(&obj);
        assert_eq!(parse.number_provider("m_flRate").unwrap(), NumberProvider::Literal(5.0));
        assert_eq!(parse.int32("m_nCount").unwrap(), 12);
        assert!(parse.number_provider("m_flBad").unwrap_err().is_type_mismatch());
    }

    #[test]
    fn test_number_missing_discriminator() {
        let obj = tree(json!({"m_flRate": {"m_flLiteralValue": 1.0}}));
        let parse = DefinitionParser::new(&obj);
        assert!(parse.number_provider("m_flRate").unwrap_err().is_missing_key());
    }

    #[test]
    fn test_fallback_reports_once() {
        let obj = tree(json!({
            "n": {"m_nType": "PF_TYPE_ENDCAP_AGE", "m_flLiteralValue": 2.0},
            "v": {"m_nType": "PVEC_TYPE_RANDOM_UNIFORM", "m_vLiteralValue": [1, 2, 3]},
        }));
        let sink = CollectingSink::new();
        let parse = DefinitionParser::with_sink(&obj, &sink);

        assert_eq!(parse.number_provider("n").unwrap(), NumberProvider::Literal(2.0));
        assert_eq!(sink.len(), 1);
        assert_eq!(
            parse.vector_provider("v").unwrap(),
            VectorProvider::Literal(Vec3::new(1.0, 2.0, 3.0))
        );
        let diagnostics = sink.take();
        assert_eq!(diagnostics.len(), 2);
        assert!(matches!(
            &diagnostics[1],
            Diagnostic::LiteralFallback { kind: ProviderKind::Vector, key, .. } if key == "v"
        ));
    }

    #[test]
    fn test_vector_inline_data() {
        let obj = tree(json!({
            "arr": [1, 2, 3],
            "obj": {"0": 4, "1": 5, "2": 6},
        }));
        let parse = DefinitionParser::new(&obj);
        let literal = |x, y, z| VectorProvider::Literal(Vec3::new(x, y, z));
        assert_eq!(parse.vector_provider("arr").unwrap(), literal(1.0, 2.0, 3.0));
        assert_eq!(parse.vector_provider("obj").unwrap(), literal(4.0, 5.0, 6.0));
        assert_eq!(
            parse.vector_provider_or("absent", VectorProvider::Literal(Vec3::X)).unwrap(),
            VectorProvider::Literal(Vec3::X)
        );
    }
}
