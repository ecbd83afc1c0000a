use crate::{Error, Result};
use nalgebra::Vector3;
use rayon::prelude::*;
use std::fmt::Debug;

/// A pixel sample type with a fixed number of `f32` components.
///
/// Implemented for scalar `f32` samples and `Vector3<f32>` color samples. The
/// component view is what the I/O layer and the global min/max reduction use;
/// numeric kernels work on the concrete types directly.
pub trait Sample: Copy + Default + Debug + PartialEq + Send + Sync + 'static {
    /// Number of `f32` components in one sample.
    const COMPONENTS: usize;

    /// Component `index`, which must be `< COMPONENTS`.
    fn component(&self, index: usize) -> f32;

    /// Build a sample from the first `COMPONENTS` values of `components`.
    fn from_components(components: &[f32]) -> Self;

    /// A sample with every component set to `value`.
    fn splat(value: f32) -> Self;
}

impl Sample for f32 {
    const COMPONENTS: usize = 1;

    fn component(&self, index: usize) -> f32 {
        debug_assert_eq!(index, 0);
        *self
    }

    fn from_components(components: &[f32]) -> Self {
        components[0]
    }

    fn splat(value: f32) -> Self {
        value
    }
}

impl Sample for Vector3<f32> {
    const COMPONENTS: usize = 3;

    fn component(&self, index: usize) -> f32 {
        self[index]
    }

    fn from_components(components: &[f32]) -> Self {
        Vector3::new(components[0], components[1], components[2])
    }

    fn splat(value: f32) -> Self {
        Vector3::repeat(value)
    }
}

/// Dense 2D grid of samples.
///
/// **Layout Convention:** row-major, the sample at `(x, y)` lives at
/// `index = y * width + x`. The buffer length always equals `width * height`
/// and the dimensions never change after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    data: Vec<T>,
}

/// Single-channel float grid (luminance, masks, gradients, divergence).
pub type ScalarGrid = Grid<f32>;

/// Three-channel float grid in attribute order (RGB or XYZ per pixel).
pub type RgbGrid = Grid<Vector3<f32>>;

fn validate_dimensions(width: usize, height: usize) -> Result<usize> {
    if width == 0 || height == 0 {
        return Err(Error::InvalidInput(format!(
            "Grid dimensions must be non-zero, got {}x{}",
            width, height
        )));
    }
    width
        .checked_mul(height)
        .ok_or_else(|| Error::InvalidInput(format!("Grid {}x{} is too large", width, height)))
}

impl<T: Sample> Grid<T> {
    /// Zero-filled grid.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        Self::filled(width, height, T::default())
    }

    pub fn filled(width: usize, height: usize, value: T) -> Result<Self> {
        let len = validate_dimensions(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![value; len],
        })
    }

    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Result<Self> {
        let len = validate_dimensions(width, height)?;
        if data.len() != len {
            return Err(Error::DimensionMismatch(format!(
                "Expected {} samples for a {}x{} grid, got {}",
                len,
                width,
                height,
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Evaluate `f(x, y)` for every pixel, rows in parallel.
    pub fn from_fn<F>(width: usize, height: usize, f: F) -> Result<Self>
    where
        F: Fn(usize, usize) -> T + Sync,
    {
        let mut grid = Self::new(width, height)?;
        grid.data
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, px) in row.iter_mut().enumerate() {
                    *px = f(x, y);
                }
            });
        Ok(grid)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn offset(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Sample at `(x, y)`. Panics when out of bounds.
    #[inline]
    pub fn at(&self, x: usize, y: usize) -> T {
        assert!(
            x < self.width && y < self.height,
            "({}, {}) outside {}x{} grid",
            x,
            y,
            self.width,
            self.height
        );
        self.data[self.offset(x, y)]
    }

    pub fn get(&self, x: usize, y: usize) -> Option<T> {
        if x < self.width && y < self.height {
            Some(self.data[self.offset(x, y)])
        } else {
            None
        }
    }

    /// Sample at `(x, y)` with the grid treated as zero-padded on every side.
    #[inline]
    pub fn get_padded(&self, x: isize, y: isize) -> T {
        if x < 0 || y < 0 || x >= self.width as isize || y >= self.height as isize {
            T::default()
        } else {
            self.data[y as usize * self.width + x as usize]
        }
    }

    pub fn set(&mut self, x: usize, y: usize, value: T) {
        let idx = self.offset(x, y);
        self.data[idx] = value;
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    pub fn row(&self, y: usize) -> &[T] {
        &self.data[y * self.width..(y + 1) * self.width]
    }

    /// Per-sample transform into a fresh grid.
    pub fn map<U, F>(&self, f: F) -> Grid<U>
    where
        U: Sample,
        F: Fn(T) -> U + Sync,
    {
        Grid {
            width: self.width,
            height: self.height,
            data: self.data.par_iter().map(|&v| f(v)).collect(),
        }
    }

    /// Combine two equally sized grids sample by sample.
    pub fn zip_map<U, V, F>(&self, other: &Grid<U>, f: F) -> Result<Grid<V>>
    where
        U: Sample,
        V: Sample,
        F: Fn(T, U) -> V + Sync,
    {
        crate::ensure_same_dimensions(self, other, "zip_map")?;
        Ok(Grid {
            width: self.width,
            height: self.height,
            data: self
                .data
                .par_iter()
                .zip(other.data.par_iter())
                .map(|(&a, &b)| f(a, b))
                .collect(),
        })
    }

    /// Copy out the `width x height` block whose top-left corner is `(x0, y0)`.
    pub fn crop(&self, x0: usize, y0: usize, width: usize, height: usize) -> Result<Self> {
        if x0 + width > self.width || y0 + height > self.height {
            return Err(Error::InvalidInput(format!(
                "Crop {}x{} at ({}, {}) exceeds {}x{} grid",
                width, height, x0, y0, self.width, self.height
            )));
        }
        let mut data = Vec::with_capacity(validate_dimensions(width, height)?);
        for y in y0..y0 + height {
            let start = self.offset(x0, y);
            data.extend_from_slice(&self.data[start..start + width]);
        }
        Self::from_vec(width, height, data)
    }
}
