//! Poisson image editing on color images.
//!
//! Color images are split into three planes that are processed independently;
//! no operator couples the channels.

use crate::composite::merge_gradients;
use crate::gradient::{crop_interior, divergence, gradients};
use crate::poisson::solve_poisson;
use cv_core::{ensure_same_dimensions, GradientField, Plane3, Result, RgbGrid, ScalarGrid};
use cv_imgproc::{planes_to_rgb, rgb_to_planes, rgb_to_xyz, xyz_to_rgb};
use serde::{Deserialize, Serialize};

/// Gradient field per color plane.
pub type PlaneGradients = Plane3<GradientField>;

/// Color space the Poisson equations are solved in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Colorspace {
    /// CIE 1931 XYZ.
    #[default]
    Xyz,
    /// Solve directly on the RGB channels.
    Rgb,
}

impl Colorspace {
    pub fn split(self, rgb: &RgbGrid) -> Plane3<ScalarGrid> {
        match self {
            Colorspace::Xyz => rgb_to_xyz(rgb),
            Colorspace::Rgb => rgb_to_planes(rgb),
        }
    }

    pub fn merge(self, planes: &Plane3<ScalarGrid>) -> Result<RgbGrid> {
        match self {
            Colorspace::Xyz => xyz_to_rgb(planes),
            Colorspace::Rgb => planes_to_rgb(planes),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoissonParams {
    /// Jacobi sweeps per channel.
    pub iterations: usize,
    pub colorspace: Colorspace,
}

impl Default for PoissonParams {
    fn default() -> Self {
        Self {
            iterations: 2000,
            colorspace: Colorspace::Xyz,
        }
    }
}

pub fn gradients_xyz(image: &Plane3<ScalarGrid>) -> Result<PlaneGradients> {
    image.try_map(|_, plane| gradients(plane))
}

pub fn divergence_xyz(field: &PlaneGradients) -> Result<Plane3<ScalarGrid>> {
    field.try_map(|_, g| divergence(g))
}

pub fn merge_gradients_xyz(
    source: &PlaneGradients,
    target: &PlaneGradients,
    mask: &ScalarGrid,
) -> Result<PlaneGradients> {
    source.try_map(|channel, src| merge_gradients(src, &target[channel], mask))
}

/// Solve one Poisson equation per plane. `divergence` must already be
/// cropped to the size of `initial`.
pub fn solve_poisson_xyz(
    initial: &Plane3<ScalarGrid>,
    divergence: &Plane3<ScalarGrid>,
    iterations: usize,
) -> Result<Plane3<ScalarGrid>> {
    initial.try_map(|channel, init| {
        tracing::debug!("solving channel {}", channel.name());
        solve_poisson(init, &divergence[channel], iterations)
    })
}

/// Every stage of one Poisson editing run, in the working color space.
#[derive(Debug, Clone)]
pub struct PoissonEditResult {
    pub target_planes: Plane3<ScalarGrid>,
    pub source_planes: Plane3<ScalarGrid>,
    pub source_gradients: PlaneGradients,
    pub target_gradients: PlaneGradients,
    pub merged_gradients: PlaneGradients,
    /// Padded `(W + 2) x (H + 2)` divergence of the merged gradients.
    pub divergence: Plane3<ScalarGrid>,
    pub result_planes: Plane3<ScalarGrid>,
    /// Final edited image back in RGB.
    pub rgb: RgbGrid,
}

/// Gradient-domain compositor: pastes the masked region of a source image
/// into a target image by solving for the merged gradients.
#[derive(Debug, Clone, Default)]
pub struct PoissonEditor {
    params: PoissonParams,
}

impl PoissonEditor {
    pub fn new(params: PoissonParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &PoissonParams {
        &self.params
    }

    pub fn edit(
        &self,
        target: &RgbGrid,
        source: &RgbGrid,
        mask: &ScalarGrid,
    ) -> Result<PoissonEditResult> {
        ensure_same_dimensions(target, source, "target vs source image")?;
        ensure_same_dimensions(target, mask, "target image vs mask")?;

        let space = self.params.colorspace;
        let target_planes = space.split(target);
        let source_planes = space.split(source);

        let source_gradients = gradients_xyz(&source_planes)?;
        let target_gradients = gradients_xyz(&target_planes)?;
        let merged_gradients = merge_gradients_xyz(&source_gradients, &target_gradients, mask)?;

        let divergence = divergence_xyz(&merged_gradients)?;
        let cropped = divergence.try_map(|_, d| crop_interior(d))?;

        tracing::info!(
            iterations = self.params.iterations,
            "solving Poisson equations for a {}x{} image",
            target.width(),
            target.height()
        );
        let result_planes = solve_poisson_xyz(&target_planes, &cropped, self.params.iterations)?;
        let rgb = space.merge(&result_planes)?;

        Ok(PoissonEditResult {
            target_planes,
            source_planes,
            source_gradients,
            target_gradients,
            merged_gradients,
            divergence,
            result_planes,
            rgb,
        })
    }
}

/// Paste the masked part of `source` into `target` and return the edited RGB.
pub fn seamless_clone(
    target: &RgbGrid,
    source: &RgbGrid,
    mask: &ScalarGrid,
    params: PoissonParams,
) -> Result<RgbGrid> {
    Ok(PoissonEditor::new(params).edit(target, source, mask)?.rgb)
}
