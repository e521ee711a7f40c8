//! Animation channel codecs.
//!
//! Compressed animation data names the codec of each channel by its class
//! name (`CCompressedAnimQuaternion`, ...). [`AnimDecoderType`] is the closed
//! set of codecs this crate knows, [`DecoderDescriptor`] pairs one with its
//! element size and decodes raw channel bytes.

use std::fmt;

use byteorder::{ByteOrder, LittleEndian};
use half::f16;
use tracing::debug;

use crate::parser::{Diagnostic, DiagnosticSink};
use crate::util::{Error, Quat, Result, Vec3};

/// Known animation channel codecs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AnimDecoderType {
    /// Anything unrecognized; the channel is skipped
    #[default]
    Ignore,
    CCompressedStaticFullVector3,
    /// Three `f32` per frame
    CCompressedFullVector3,
    CCompressedDeltaVector3,
    /// Three `f32` per frame
    CCompressedAnimVector3,
    /// Three `f16`
    CCompressedStaticVector,
    /// 48-bit packed quaternion per frame
    CCompressedAnimQuaternion,
}

impl AnimDecoderType {
    /// Every recognized codec.
    pub const ALL: [Self; 6] = [
        Self::CCompressedStaticFullVector3,
        Self::CCompressedFullVector3,
        Self::CCompressedDeltaVector3,
        Self::CCompressedAnimVector3,
        Self::CCompressedStaticVector,
        Self::CCompressedAnimQuaternion,
    ];

    /// Codec for a class name. Unrecognized names map to [`Self::Ignore`].
    pub fn from_name(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|ty| ty.name() == name)
            .unwrap_or(Self::Ignore)
    }

    /// Class name of the codec.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Ignore => "Ignore",
            Self::CCompressedStaticFullVector3 => "CCompressedStaticFullVector3",
            Self::CCompressedFullVector3 => "CCompressedFullVector3",
            Self::CCompressedDeltaVector3 => "CCompressedDeltaVector3",
            Self::CCompressedAnimVector3 => "CCompressedAnimVector3",
            Self::CCompressedStaticVector => "CCompressedStaticVector",
            Self::CCompressedAnimQuaternion => "CCompressedAnimQuaternion",
        }
    }

    /// Bytes per element; 0 for codecs without a fixed layout.
    #[inline]
    pub const fn size(self) -> usize {
        match self {
            Self::CCompressedFullVector3 | Self::CCompressedAnimVector3 => 12,
            Self::CCompressedStaticVector | Self::CCompressedAnimQuaternion => 6,
            Self::Ignore | Self::CCompressedStaticFullVector3 | Self::CCompressedDeltaVector3 => 0,
        }
    }

    /// True for [`Self::Ignore`].
    #[inline]
    pub const fn is_ignored(self) -> bool {
        matches!(self, Self::Ignore)
    }
}

impl fmt::Display for AnimDecoderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One decoded channel element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DecodedElement {
    Vector(Vec3),
    Quaternion(Quat),
}

/// A resolved codec and its element size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct DecoderDescriptor {
    pub kind: AnimDecoderType,
    pub element_byte_size: usize,
}

impl DecoderDescriptor {
    /// Describe `kind`.
    pub const fn new(kind: AnimDecoderType) -> Self {
        Self {
            kind,
            element_byte_size: kind.size(),
        }
    }

    /// Resolve a codec class name. Never fails.
    pub fn resolve(name: &str) -> Self {
        let descriptor = Self::new(AnimDecoderType::from_name(name));
        if descriptor.kind.is_ignored() {
            debug!("unknown animation decoder '{name}'");
        }
        descriptor
    }

    /// [`Self::resolve`], reporting unrecognized names to `sink`.
    pub fn resolve_reported(name: &str, sink: &dyn DiagnosticSink) -> Self {
        let descriptor = Self::new(AnimDecoderType::from_name(name));
        if descriptor.kind.is_ignored() {
            sink.report(Diagnostic::IgnoredDecoder { name: name.to_string() });
        }
        descriptor
    }

    /// Decode the first element of `bytes`.
    pub fn decode_element(&self, bytes: &[u8]) -> Result<DecodedElement> {
        let size = self.element_byte_size;
        if size == 0 {
            return Err(Error::UnsupportedDecoder(self.kind.name().to_string()));
        }
        if bytes.len() < size {
            return Err(Error::BufferTooSmall {
                expected: size,
                actual: bytes.len(),
            });
        }

        Ok(match self.kind {
            AnimDecoderType::CCompressedStaticVector => DecodedElement::Vector(Vec3::new(
                f16::from_bits(LittleEndian::read_u16(&bytes[0..2])).to_f32(),
                f16::from_bits(LittleEndian::read_u16(&bytes[2..4])).to_f32(),
                f16::from_bits(LittleEndian::read_u16(&bytes[4..6])).to_f32(),
            )),
            AnimDecoderType::CCompressedAnimQuaternion => {
                DecodedElement::Quaternion(unpack_quaternion48(&bytes[..6]))
            }
            _ => DecodedElement::Vector(Vec3::new(
                LittleEndian::read_f32(&bytes[0..4]),
                LittleEndian::read_f32(&bytes[4..8]),
                LittleEndian::read_f32(&bytes[8..12]),
            )),
        })
    }

    /// Decode every element of `bytes`.
    ///
    /// The length must be a whole number of elements.
    pub fn decode_elements(&self, bytes: &[u8]) -> Result<Vec<DecodedElement>> {
        let size = self.element_byte_size;
        if size == 0 {
            return Err(Error::UnsupportedDecoder(self.kind.name().to_string()));
        }
        let rem = bytes.len() % size;
        if rem != 0 {
            return Err(Error::BufferTooSmall {
                expected: bytes.len() - rem + size,
                actual: bytes.len(),
            });
        }
        bytes.chunks_exact(size).map(|chunk| self.decode_element(chunk)).collect()
    }
}

/// Unpack a 48-bit quaternion.
///
/// Each 16-bit word holds a 14-bit magnitude, a bit selecting the signed
/// or unsigned range, and one of three selector bits that together place
/// the implied (largest) component.
fn unpack_quaternion48(bytes: &[u8]) -> Quat {
    const SCALE: f32 = std::f32::consts::FRAC_1_SQRT_2 / 16384.0;

    let component = |lo: u8, hi: u8| -> f32 {
        let magnitude = lo as i32 + (((hi & 0x3F) as i32) << 8);
        if hi & 0x40 == 0 {
            SCALE * (magnitude - 16384) as f32
        } else {
            SCALE * magnitude as f32
        }
    };

    let x = component(bytes[0], bytes[1]);
    let y = component(bytes[2], bytes[3]);
    let z = component(bytes[4], bytes[5]);
    let mut w = (1.0 - x * x - y * y - z * z).max(0.0).sqrt();
    if bytes[5] & 0x80 != 0 {
        w = -w;
    }

    match (bytes[1] & 0x80 != 0, bytes[3] & 0x80 != 0) {
        (true, true) => Quat::from_xyzw(y, z, w, x),
        (true, false) => Quat::from_xyzw(z, w, x, y),
        (false, true) => Quat::from_xyzw(w, x, y, z),
        (false, false) => Quat::from_xyzw(x, y, z, w),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::CollectingSink;
    use approx::assert_relative_eq;

    #[test]
    fn test_sizes() {
        assert_eq!(AnimDecoderType::CCompressedFullVector3.size(), 12);
        assert_eq!(AnimDecoderType::CCompressedAnimVector3.size(), 12);
        assert_eq!(AnimDecoderType::CCompressedStaticVector.size(), 6);
        assert_eq!(AnimDecoderType::CCompressedAnimQuaternion.size(), 6);
        assert_eq!(AnimDecoderType::CCompressedStaticFullVector3.size(), 0);
        assert_eq!(AnimDecoderType::CCompressedDeltaVector3.size(), 0);
        assert_eq!(AnimDecoderType::Ignore.size(), 0);
    }

    #[test]
    fn test_names_round_trip() {
        for ty in AnimDecoderType::ALL {
            assert_eq!(AnimDecoderType::from_name(ty.name()), ty);
        }
        assert_eq!(
            AnimDecoderType::from_name("ccompressedanimquaternion"),
            AnimDecoderType::Ignore
        );
    }

    #[test]
    fn test_resolve_reported() {
        let sink = CollectingSink::new();
        let d = DecoderDescriptor::resolve_reported("CCompressedAnimVector3", &sink);
        assert_eq!(d.element_byte_size, 12);
        assert!(sink.is_empty());

        let d = DecoderDescriptor::resolve_reported("CCompressedStaticFloat", &sink);
        assert_eq!(d.kind, AnimDecoderType::Ignore);
        assert_eq!(
            sink.take(),
            vec![Diagnostic::IgnoredDecoder {
                name: "CCompressedStaticFloat".into()
            }]
        );
    }

    #[test]
    fn test_decode_full_vector() {
        let mut bytes = Vec::new();
        for v in [1.0f32, -2.5, 8.0] {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        let d = DecoderDescriptor::resolve("CCompressedFullVector3");
        assert_eq!(
            d.decode_element(&bytes).unwrap(),
            DecodedElement::Vector(Vec3::new(1.0, -2.5, 8.0))
        );
    }

    #[test]
    fn test_decode_static_vector() {
        let mut bytes = Vec::new();
        for v in [0.5f32, 1.0, -4.0] {
            bytes.extend_from_slice(&f16::from_f32(v).to_le_bytes());
        }
        let d = DecoderDescriptor::resolve("CCompressedStaticVector");
        assert_eq!(
            d.decode_element(&bytes).unwrap(),
            DecodedElement::Vector(Vec3::new(0.5, 1.0, -4.0))
        );
    }

    #[test]
    fn test_decode_identity_quaternion() {
        // x = y = z = 0 in the signed range, w implied
        let bytes = [0x00, 0x40, 0x00, 0x40, 0x00, 0x40];
        let d = DecoderDescriptor::resolve("CCompressedAnimQuaternion");
        match d.decode_element(&bytes).unwrap() {
            DecodedElement::Quaternion(q) => {
                assert_relative_eq!(q.x, 0.0);
                assert_relative_eq!(q.y, 0.0);
                assert_relative_eq!(q.z, 0.0);
                assert_relative_eq!(q.w, 1.0);
            }
            other => panic!("expected quaternion, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_errors() {
        let ignored = DecoderDescriptor::resolve("nope");
        assert!(matches!(ignored.decode_element(&[0; 12]), Err(Error::UnsupportedDecoder(_))));

        let d = DecoderDescriptor::resolve("CCompressedAnimVector3");
        assert!(matches!(
            d.decode_element(&[0; 8]),
            Err(Error::BufferTooSmall { expected: 12, actual: 8 })
        ));
        assert!(matches!(
            d.decode_elements(&[0; 20]),
            Err(Error::BufferTooSmall { expected: 24, actual: 20 })
        ));
        assert_eq!(d.decode_elements(&[0; 36]).unwrap().len(), 3);
        assert!(d.decode_elements(&[]).unwrap().is_empty());
    }
}
