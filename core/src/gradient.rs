use crate::{ensure_same_dimensions, Result, ScalarGrid};

/// Forward-difference gradient pair of a scalar image.
///
/// For a `W x H` source both components are `(W + 1) x (H + 1)`: the extra
/// row and column hold the differences that cross the implicit zero border.
/// The components always share one size; [`GradientField::new`] and
/// [`GradientField::from_parts`] are the only constructors.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientField {
    dx: ScalarGrid,
    dy: ScalarGrid,
}

impl GradientField {
    /// Zero gradients of the given (already padded) size.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        Ok(Self {
            dx: ScalarGrid::new(width, height)?,
            dy: ScalarGrid::new(width, height)?,
        })
    }

    pub fn from_parts(dx: ScalarGrid, dy: ScalarGrid) -> Result<Self> {
        ensure_same_dimensions(&dx, &dy, "gradient components")?;
        Ok(Self { dx, dy })
    }

    /// Horizontal differences.
    pub fn dx(&self) -> &ScalarGrid {
        &self.dx
    }

    /// Vertical differences.
    pub fn dy(&self) -> &ScalarGrid {
        &self.dy
    }

    pub fn into_parts(self) -> (ScalarGrid, ScalarGrid) {
        (self.dx, self.dy)
    }

    pub fn width(&self) -> usize {
        self.dx.width()
    }

    pub fn height(&self) -> usize {
        self.dx.height()
    }

    pub fn dimensions(&self) -> (usize, usize) {
        self.dx.dimensions()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn components_must_agree() {
        let dx = ScalarGrid::new(5, 4).unwrap();
        let dy = ScalarGrid::new(4, 4).unwrap();
        assert!(GradientField::from_parts(dx, dy).is_err());

        let dx = ScalarGrid::new(5, 4).unwrap();
        let dy = ScalarGrid::new(3, 3).unwrap();
        assert!(GradientField::from_parts(dx, dy).is_err());
    }

    #[test]
    fn new_field_is_zero() {
        let g = GradientField::new(5, 4).unwrap();
        assert_eq!(g.dimensions(), (5, 4));
        assert!(g.dx().data().iter().chain(g.dy().data()).all(|&v| v == 0.0));
    }

    #[test]
    fn parts_round_trip() {
        let dx = ScalarGrid::filled(3, 2, 1.0).unwrap();
        let dy = ScalarGrid::filled(3, 2, -1.0).unwrap();
        let g = GradientField::from_parts(dx.clone(), dy.clone()).unwrap();
        assert_eq!(g.dy().dimensions(), g.dimensions());
        assert_eq!(g.into_parts(), (dx, dy));
    }
}
