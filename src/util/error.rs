//! Error types for particle definition parsing.

use thiserror::Error;

/// Which provider family a factory call was building.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    /// Scalar providers (`PF_TYPE_*`).
    Number,
    /// Vector providers (`PVEC_TYPE_*`).
    Vector,
}

impl ProviderKind {
    /// Lower-case name used in messages.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::Vector => "vector",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Main error type for particle definition operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A getter without a default was called on an absent key
    #[error("Missing key: {key}")]
    MissingKey { key: String },

    /// Value is present but cannot be converted to the requested type
    #[error("Type mismatch for '{key}': expected {expected}, got {actual}")]
    TypeMismatch {
        key: String,
        expected: String,
        actual: String,
    },

    /// Integer or string does not name any member of the enumeration
    #[error("Unknown {enum_name} value: {value}")]
    UnknownEnumValue { enum_name: &'static str, value: String },

    /// Provider discriminator is not in the dispatch table and no literal fallback exists
    #[error("Could not create {kind} provider of type {type_name}")]
    UnsupportedProviderType { kind: ProviderKind, type_name: String },

    /// Channel data shorter than one element
    #[error("Buffer too small: need {expected} bytes, got {actual}")]
    BufferTooSmall { expected: usize, actual: usize },

    /// Decoder kind has no element layout
    #[error("Unsupported decoder: {0}")]
    UnsupportedDecoder(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a missing key error.
    pub fn missing(key: impl Into<String>) -> Self {
        Self::MissingKey { key: key.into() }
    }

    /// Create a type mismatch error.
    pub fn mismatch(
        key: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::TypeMismatch {
            key: key.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// True for [`Error::MissingKey`].
    pub fn is_missing_key(&self) -> bool {
        matches!(self, Self::MissingKey { .. })
    }

    /// True for [`Error::TypeMismatch`].
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, Self::TypeMismatch { .. })
    }
}

/// Result type alias for particle definition operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let e = Error::missing("m_flRadius");
        assert!(e.to_string().contains("m_flRadius"));

        let e = Error::UnsupportedProviderType {
            kind: ProviderKind::Number,
            type_name: "PF_TYPE_ENDCAP_AGE".into(),
        };
        assert_eq!(e.to_string(), "Could not create number provider of type PF_TYPE_ENDCAP_AGE");

        let e = Error::mismatch("m_vColor", "vector3", "string");
        assert!(e.to_string().contains("vector3"));
        assert!(e.to_string().contains("string"));
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_error_predicates() {
        assert!(Error::missing("a").is_missing_key());
        assert!(!Error::missing("a").is_type_mismatch());
        assert!(Error::mismatch("a", "float", "string").is_type_mismatch());
    }
}
