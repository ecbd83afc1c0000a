//! Image and raw grid I/O.
//!
//! - **Raster**: load PNG/JPEG/HDR files as float grids, save 8-bit PNG/JPEG
//! - **Binary**: lossless dump of float grids and gradient fields

pub mod binary;
pub mod raster;

pub use binary::{
    deserialize, read_binary, read_gradients, save_binary, save_gradients, serialize,
};
pub use raster::{load_rgb, load_scalar, save_rgb, save_scalar, SaveOptions};

pub use cv_core::{Error, Result};
