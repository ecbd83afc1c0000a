//! Computational Photography Algorithms
//!
//! # Algorithms
//!
//! - **Tone Mapping**: Durand-style HDR compression with a bilateral base/detail split
//! - **Gradient Domain**: forward-difference gradients and their adjoint divergence
//! - **Gradient Compositing**: mask-driven merge of two gradient fields
//! - **Poisson Solver**: fixed-iteration Jacobi relaxation of `div G`
//! - **Seamless Cloning**: the full Poisson editing chain on color images
//!
//! # Example: Tone Mapping
//!
//! ```no_run
//! # use cv_photo::tonemap::{ToneMapper, ToneMappingParams};
//! # use cv_core::RgbGrid;
//! let hdr = RgbGrid::new(640, 480).unwrap();
//! let result = ToneMapper::new(ToneMappingParams::default()).tone_map(&hdr).unwrap();
//! let _ldr = result.rgb;
//! ```

pub use cv_core::{Error, Result};

/// Gradient merging across a mask
pub mod composite;
/// Gradient and divergence operators
pub mod gradient;
/// Iterative Poisson solver
pub mod poisson;
/// Poisson image editing on color images
pub mod seamless;
/// Bilateral HDR tone mapping
pub mod tonemap;

pub use composite::*;
pub use gradient::*;
pub use poisson::*;
pub use seamless::*;
pub use tonemap::*;
