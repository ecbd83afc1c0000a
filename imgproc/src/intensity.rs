use cv_core::{install_in_pool, Grid, Result, RgbGrid, Sample, ScalarGrid};
use rayon::prelude::*;
use rayon::ThreadPool;

/// Lower clamp applied before taking the logarithm.
pub const LOG_EPSILON: f32 = 1e-8;

/// Smallest and largest component over every pixel and channel.
///
/// Computed as a parallel fold of per-worker partials followed by a reduce;
/// min and max are associative and commutative, so the result does not depend
/// on how the work was split.
pub fn min_max<T: Sample>(image: &Grid<T>) -> (f32, f32) {
    min_max_in_pool(image, None)
}

pub fn min_max_in_pool<T: Sample>(image: &Grid<T>, pool: Option<&ThreadPool>) -> (f32, f32) {
    let identity = || (f32::INFINITY, f32::NEG_INFINITY);
    install_in_pool(pool, || {
        image
            .data()
            .par_chunks(4096)
            .fold(identity, |(mut lo, mut hi), chunk| {
                for px in chunk {
                    for c in 0..T::COMPONENTS {
                        let v = px.component(c);
                        lo = lo.min(v);
                        hi = hi.max(v);
                    }
                }
                (lo, hi)
            })
            .reduce(identity, |(a_lo, a_hi), (b_lo, b_hi)| {
                (a_lo.min(b_lo), a_hi.max(b_hi))
            })
    })
}

/// Linearly map the global range of `image` onto `[0, 1]`.
///
/// All channels share one range. A flat image has no range to stretch and
/// maps to zero.
pub fn normalize<T: Sample>(image: &Grid<T>) -> Grid<T> {
    let (lo, hi) = min_max(image);
    let range = hi - lo;
    if range.is_nan() || range <= 0.0 {
        tracing::warn!(min = lo, max = hi, "normalizing a flat image; output is zero");
        return image.map(|_| T::default());
    }
    image.map(|px| {
        let mut c = [0.0f32; 3];
        for (i, v) in c.iter_mut().enumerate().take(T::COMPONENTS) {
            *v = (px.component(i) - lo) / range;
        }
        T::from_components(&c)
    })
}

pub fn normalize_rgb(image: &RgbGrid) -> RgbGrid {
    normalize(image)
}

pub fn normalize_scalar(image: &ScalarGrid) -> ScalarGrid {
    normalize(image)
}

/// `v^gamma` on every channel.
pub fn apply_gamma(image: &RgbGrid, gamma: f32) -> RgbGrid {
    image.map(|px| px.map(|v| v.powf(gamma)))
}

/// Natural log, clamped below at [`LOG_EPSILON`].
pub fn log_image(image: &ScalarGrid) -> ScalarGrid {
    image.map(|v| v.max(LOG_EPSILON).ln())
}

pub fn log_to_linear(image: &ScalarGrid) -> ScalarGrid {
    image.map(f32::exp)
}

/// `a - b` sample by sample.
pub fn subtract(a: &ScalarGrid, b: &ScalarGrid) -> Result<ScalarGrid> {
    a.zip_map(b, |x, y| x - y)
}
