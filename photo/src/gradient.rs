//! Discrete gradient and divergence on zero-padded grids.
//!
//! `gradients` maps a `W x H` image to `(W + 1) x (H + 1)` forward differences
//! and `divergence` maps those to a `(W + 2) x (H + 2)` grid. `divergence` is
//! the exact adjoint of `gradients`: for any image `I` and field `G`,
//! `<grad I, G> == <I, interior(div G)>`, which makes the interior of
//! `divergence(gradients(I))` the 5-point stencil `4 I - (sum of 4 neighbors)`.

use cv_core::{GradientField, Result, RgbGrid, ScalarGrid};
use nalgebra::Vector3;

/// Forward differences `dx(x, y) = I(x, y) - I(x - 1, y)` and
/// `dy(x, y) = I(x, y) - I(x, y - 1)` for every `(x, y)` in `[0, W] x [0, H]`,
/// reading zero outside the image.
pub fn gradients(image: &ScalarGrid) -> Result<GradientField> {
    let (w, h) = image.dimensions();
    let dx = ScalarGrid::from_fn(w + 1, h + 1, |x, y| {
        let (x, y) = (x as isize, y as isize);
        image.get_padded(x, y) - image.get_padded(x - 1, y)
    })?;
    let dy = ScalarGrid::from_fn(w + 1, h + 1, |x, y| {
        let (x, y) = (x as isize, y as isize);
        image.get_padded(x, y) - image.get_padded(x, y - 1)
    })?;
    GradientField::from_parts(dx, dy)
}

/// Adjoint of [`gradients`], one pixel larger than the field on each axis.
///
/// Output `(X, Y)` sits over source pixel `(X - 1, Y - 1)` and collects the
/// flux through its four edges:
/// `dx(X-1, Y-1) - dx(X, Y-1) + dy(X-1, Y-1) - dy(X-1, Y)`, with field samples
/// outside the field read as zero.
pub fn divergence(field: &GradientField) -> Result<ScalarGrid> {
    let (w, h) = field.dimensions();
    ScalarGrid::from_fn(w + 1, h + 1, |x, y| {
        let px = x as isize - 1;
        let py = y as isize - 1;
        (field.dx().get_padded(px, py) - field.dx().get_padded(px + 1, py))
            + (field.dy().get_padded(px, py) - field.dy().get_padded(px, py + 1))
    })
}

/// Drop the one-pixel padding ring of a divergence grid so it lines up with
/// the `W x H` image the gradients came from.
pub fn crop_interior(padded: &ScalarGrid) -> Result<ScalarGrid> {
    let (w, h) = padded.dimensions();
    padded.crop(1, 1, w.saturating_sub(2), h.saturating_sub(2))
}

/// Visualize a gradient field as `(|dx|, |dy|, 0)`.
pub fn gradients_to_rgb(field: &GradientField) -> Result<RgbGrid> {
    field
        .dx()
        .zip_map(field.dy(), |dx, dy| Vector3::new(dx.abs(), dy.abs(), 0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gradient_of_single_pixel() {
        let img = ScalarGrid::filled(1, 1, 3.0).unwrap();
        let g = gradients(&img).unwrap();
        assert_eq!(g.dimensions(), (2, 2));
        assert_eq!(g.dx().data(), &[3.0, -3.0, 0.0, 0.0]);
        assert_eq!(g.dy().data(), &[3.0, 0.0, -3.0, 0.0]);
    }

    #[test]
    fn divergence_of_single_pixel_is_stencil() {
        let img = ScalarGrid::filled(1, 1, 3.0).unwrap();
        let div = divergence(&gradients(&img).unwrap()).unwrap();
        assert_eq!(div.dimensions(), (3, 3));
        // 4 * 3 - 0 at the center, minus the crossing flux around it.
        assert_eq!(div.at(1, 1), 12.0);
        assert_eq!(div.at(0, 1), -3.0);
        assert_eq!(div.at(2, 1), -3.0);
        assert_eq!(div.at(1, 0), -3.0);
        assert_eq!(div.at(1, 2), -3.0);
        assert_eq!(div.at(0, 0), 0.0);
        assert_eq!(crop_interior(&div).unwrap().data(), &[12.0]);
    }

    #[test]
    fn divergence_sums_to_zero() {
        let img = ScalarGrid::from_fn(5, 4, |x, y| ((x * 7 + y * 3) % 5) as f32 * 0.3).unwrap();
        let div = divergence(&gradients(&img).unwrap()).unwrap();
        let total: f32 = div.data().iter().sum();
        assert!(total.abs() < 1e-5);
    }

    #[test]
    fn gradients_visualization_takes_magnitudes() {
        let img = ScalarGrid::filled(1, 1, 0.5).unwrap();
        let rgb = gradients_to_rgb(&gradients(&img).unwrap()).unwrap();
        assert_eq!(rgb.at(1, 0), Vector3::new(0.5, 0.0, 0.0));
        assert_eq!(rgb.at(0, 1), Vector3::new(0.0, 0.5, 0.0));
    }
}
