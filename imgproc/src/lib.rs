//! Per-pixel image operations on float grids.
//!
//! - **Bilateral Filter**: edge-preserving smoothing of scalar grids
//! - **Color**: luminance, RGB/XYZ conversion, layout changes
//! - **Intensity**: global min/max, normalization, gamma, log/exp

pub mod bilateral;
pub mod color;
pub mod intensity;

pub use bilateral::*;
pub use color::*;
pub use intensity::*;

pub use cv_core::{Error, Result};
