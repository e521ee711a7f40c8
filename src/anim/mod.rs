//! Animation channel metadata.
//!
//! - [`DecoderDescriptor`] - codec name to element layout, plus decoding
//! - [`MotionFlags`] - root motion bitmask

mod decoder;
mod motion_flags;

pub use decoder::{AnimDecoderType, DecodedElement, DecoderDescriptor};
pub use motion_flags::MotionFlags;
