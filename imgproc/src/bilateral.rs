//! Bilateral Filter
//!
//! Edge-preserving smoothing that weights each tap by both its spatial distance
//! and its intensity difference to the center pixel.

use cv_core::{install_in_pool, Error, Result, ScalarGrid};
use rayon::prelude::*;
use rayon::ThreadPool;
use std::f64::consts::PI;

/// Bilateral filter parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BilateralFilterParams {
    /// Window size (must be odd)
    pub kernel_size: usize,
    /// Spatial sigma (larger = more smoothing)
    pub sigma_space: f32,
    /// Range sigma (larger = weaker edge preservation)
    pub sigma_range: f32,
}

impl Default for BilateralFilterParams {
    fn default() -> Self {
        Self::for_size(27, 1.0)
    }
}

impl BilateralFilterParams {
    pub fn new(kernel_size: usize, sigma_space: f32, sigma_range: f32) -> Self {
        Self {
            kernel_size,
            sigma_space,
            sigma_range,
        }
    }

    /// Spatial sigma derived from the window (`size / 6.4`), so the window
    /// covers roughly three standard deviations on each side.
    pub fn for_size(kernel_size: usize, sigma_range: f32) -> Self {
        Self::new(kernel_size, kernel_size as f32 / 6.4, sigma_range)
    }

    pub fn validate(&self) -> Result<()> {
        if self.kernel_size == 0 || self.kernel_size % 2 == 0 {
            return Err(Error::InvalidParameter(format!(
                "bilateral kernel size must be odd and positive, got {}",
                self.kernel_size
            )));
        }
        for (name, sigma) in [("space", self.sigma_space), ("range", self.sigma_range)] {
            if !(sigma.is_finite() && sigma > 0.0) {
                return Err(Error::InvalidParameter(format!(
                    "bilateral {} sigma must be positive and finite, got {}",
                    name, sigma
                )));
            }
        }
        Ok(())
    }
}

/// Normalized 1D Gaussian: `exp(-v^2 / 2s^2) / (2 pi s^2)`.
#[inline]
fn gaussian(v: f64, sigma: f64) -> f64 {
    let two_sigma_sq = 2.0 * sigma * sigma;
    (-(v * v) / two_sigma_sq).exp() / (PI * two_sigma_sq)
}

/// Apply the bilateral filter to a scalar grid.
///
/// The window is cropped at the image border: taps falling outside the grid
/// contribute to neither the weighted sum nor the normalizer, so borders are
/// not darkened.
pub fn bilateral_filter(src: &ScalarGrid, params: &BilateralFilterParams) -> Result<ScalarGrid> {
    bilateral_filter_in_pool(src, params, None)
}

pub fn bilateral_filter_in_pool(
    src: &ScalarGrid,
    params: &BilateralFilterParams,
    pool: Option<&ThreadPool>,
) -> Result<ScalarGrid> {
    params.validate()?;
    tracing::debug!(
        kernel_size = params.kernel_size,
        sigma_space = params.sigma_space,
        sigma_range = params.sigma_range,
        "bilateral filter on {}x{}",
        src.width(),
        src.height()
    );

    // Taps beyond the image extent are always cropped; the weight table never
    // needs to be larger than the image.
    let max_radius = src.width().max(src.height()) - 1;
    let radius = (params.kernel_size / 2).min(max_radius);
    let side = 2 * radius + 1;
    let radius = radius as isize;
    let sigma_space = params.sigma_space as f64;
    let sigma_range = params.sigma_range as f64;

    // Spatial weights depend only on the tap offset.
    let spatial: Vec<f64> = (0..side * side)
        .map(|i| {
            let kx = (i % side) as isize - radius;
            let ky = (i / side) as isize - radius;
            gaussian(((kx * kx + ky * ky) as f64).sqrt(), sigma_space)
        })
        .collect();

    let width = src.width() as isize;
    let height = src.height() as isize;
    let mut output = ScalarGrid::new(src.width(), src.height())?;

    install_in_pool(pool, || {
        output
            .data_mut()
            .par_chunks_mut(width as usize)
            .enumerate()
            .for_each(|(y, row)| {
                let y = y as isize;
                let y0 = (y - radius).max(0);
                let y1 = (y + radius).min(height - 1);
                for (x, out) in row.iter_mut().enumerate() {
                    let x = x as isize;
                    let x0 = (x - radius).max(0);
                    let x1 = (x + radius).min(width - 1);
                    let center = src.at(x as usize, y as usize) as f64;

                    let mut sum = 0.0f64;
                    let mut weight_sum = 0.0f64;
                    for ny in y0..=y1 {
                        let srow = src.row(ny as usize);
                        let wrow = ((ny - y + radius) as usize) * side;
                        for nx in x0..=x1 {
                            let value = srow[nx as usize] as f64;
                            let w = spatial[wrow + (nx - x + radius) as usize]
                                * gaussian(center - value, sigma_range);
                            sum += w * value;
                            weight_sum += w;
                        }
                    }

                    *out = if weight_sum > 0.0 {
                        (sum / weight_sum) as f32
                    } else {
                        center as f32
                    };
                }
            });
    });

    Ok(output)
}
