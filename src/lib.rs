//! Computational photography pipelines: bilateral HDR tone mapping and
//! Poisson gradient-domain image editing.

pub mod pipeline;

pub use cv_core as core;
pub use cv_imgproc as imgproc;
pub use cv_io as io;
pub use cv_photo as photo;

pub use pipeline::{run_poisson_editing, run_tone_mapping, PipelineConfig};

/// Initialize a single global Rayon thread pool for all CPU-parallel routines.
///
/// Call this once at application startup before running the pipelines.
/// Repeated calls are idempotent and return the first initialization result,
/// the number of worker threads.
///
/// Priority order:
/// 1. explicit `num_threads`
/// 2. `CV_PHOTO_THREADS` env var
/// 3. Rayon default
pub fn init_thread_pool(num_threads: Option<usize>) -> cv_core::Result<usize> {
    cv_core::init_global_thread_pool(num_threads)
}
