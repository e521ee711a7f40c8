//! Utility types and functions shared by the crate.
//!
//! - [`Error`] / [`Result`] - Error handling
//! - Math type re-exports from glam, plus interpolation and bias curves

mod error;
mod math;

pub use error::*;
pub use math::*;
