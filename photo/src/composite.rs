use cv_core::{Error, GradientField, Result, ScalarGrid};

/// Mask values above this select the source region.
pub const MASK_THRESHOLD: f32 = 0.5;

/// Copy source gradients into the target where the mask selects the source.
///
/// Each gradient sample is a finite difference across one edge between two
/// pixels: `(x - 1, y) -> (x, y)` for `dx`, `(x, y - 1) -> (x, y)` for `dy`.
/// The two components are decided independently:
/// - both endpoints in the source region: source gradient
/// - both endpoints in the target region: target gradient
/// - endpoints disagree (the edge crosses the mask boundary): `0.0`
///
/// `mask` has the size of the images the gradients were taken from, i.e. one
/// smaller than the fields on each axis. Mask samples outside it count as
/// target region.
pub fn merge_gradients(
    source: &GradientField,
    target: &GradientField,
    mask: &ScalarGrid,
) -> Result<GradientField> {
    if source.dimensions() != target.dimensions() {
        return Err(Error::DimensionMismatch(format!(
            "source gradients {:?} vs target gradients {:?}",
            source.dimensions(),
            target.dimensions()
        )));
    }
    let (w, h) = target.dimensions();
    let expected = (w.saturating_sub(1), h.saturating_sub(1));
    if mask.dimensions() != expected {
        return Err(Error::DimensionMismatch(format!(
            "mask is {}x{} but the gradients belong to a {}x{} image",
            mask.width(),
            mask.height(),
            expected.0,
            expected.1
        )));
    }

    let in_source = |x: isize, y: isize| mask.get_padded(x, y) > MASK_THRESHOLD;
    let select = |src: f32, tgt: f32, a: bool, b: bool| match (a, b) {
        (true, true) => src,
        (false, false) => tgt,
        _ => 0.0,
    };

    let dx = ScalarGrid::from_fn(w, h, |x, y| {
        let (xi, yi) = (x as isize, y as isize);
        select(
            source.dx().at(x, y),
            target.dx().at(x, y),
            in_source(xi, yi),
            in_source(xi - 1, yi),
        )
    })?;
    let dy = ScalarGrid::from_fn(w, h, |x, y| {
        let (xi, yi) = (x as isize, y as isize);
        select(
            source.dy().at(x, y),
            target.dy().at(x, y),
            in_source(xi, yi),
            in_source(xi, yi - 1),
        )
    })?;
    GradientField::from_parts(dx, dy)
}
