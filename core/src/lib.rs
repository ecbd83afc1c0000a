//! Core containers shared by the photo pipelines.
//!
//! Every numeric operator in the workspace consumes and produces [`Grid`]s:
//! dense, row-major 2D buffers of scalar (`f32`) or 3-vector samples.

pub mod gradient;
pub mod grid;
pub mod plane;
pub mod runtime;

pub use gradient::*;
pub use grid::*;
pub use plane::*;
pub use runtime::{current_cpu_threads, init_global_thread_pool, install_in_pool, THREADS_ENV};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Thread pool error: {0}")]
    ThreadPool(String),
}

/// Fails with [`Error::DimensionMismatch`] unless both grids have the same width and height.
pub fn ensure_same_dimensions<A: Sample, B: Sample>(
    a: &Grid<A>,
    b: &Grid<B>,
    context: &str,
) -> Result<()> {
    if a.dimensions() != b.dimensions() {
        return Err(Error::DimensionMismatch(format!(
            "{}: {}x{} vs {}x{}",
            context,
            a.width(),
            a.height(),
            b.width(),
            b.height()
        )));
    }
    Ok(())
}
