use cv_core::{ensure_same_dimensions, Error, Result, RgbGrid, ScalarGrid};
use cv_imgproc::{
    bilateral_filter, log_image, log_to_linear, rgb_to_luminance, subtract,
    BilateralFilterParams,
};
use serde::{Deserialize, Serialize};

/// Lower bound on the luminance used as a divisor when recoloring.
pub const LUMINANCE_EPSILON: f32 = 1e-7;

/// Parameters of the bilateral tone-mapping operator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToneMappingParams {
    /// Bilateral window size (odd).
    pub filter_size: usize,
    pub space_sigma: f32,
    /// Range sigma in natural-log luminance units.
    pub range_sigma: f32,
    /// Contrast scale applied to the log base layer.
    pub base_scale: f32,
    /// Linear gain applied after leaving log space.
    pub output_gain: f32,
    /// Exponent on the per-channel color ratio when recoloring.
    pub saturation: f32,
    /// Display gamma for the plain gamma-curve previews.
    pub gamma: f32,
}

impl Default for ToneMappingParams {
    fn default() -> Self {
        let filter_size = 27;
        Self {
            filter_size,
            space_sigma: filter_size as f32 / 6.4,
            range_sigma: 1.0,
            base_scale: 0.15,
            output_gain: 0.5,
            saturation: 0.5,
            gamma: 1.0 / 2.2,
        }
    }
}

impl ToneMappingParams {
    pub fn bilateral(&self) -> BilateralFilterParams {
        BilateralFilterParams::new(self.filter_size, self.space_sigma, self.range_sigma)
    }

    pub fn validate(&self) -> Result<()> {
        self.bilateral().validate()?;
        for (name, v) in [
            ("base_scale", self.base_scale),
            ("output_gain", self.output_gain),
            ("saturation", self.saturation),
            ("gamma", self.gamma),
        ] {
            if !v.is_finite() {
                return Err(Error::InvalidParameter(format!("{} must be finite, got {}", name, v)));
            }
        }
        Ok(())
    }
}

/// Detail layer in log space: `H - base`.
pub fn detail_layer(log_luminance: &ScalarGrid, base: &ScalarGrid) -> Result<ScalarGrid> {
    subtract(log_luminance, base)
}

/// Compress the base layer and return to linear space:
/// `exp(base * base_scale + detail) * output_gain`.
pub fn durand_tone_map(
    base: &ScalarGrid,
    detail: &ScalarGrid,
    base_scale: f32,
    output_gain: f32,
) -> Result<ScalarGrid> {
    let log_out = base.zip_map(detail, |b, d| b * base_scale + d)?;
    Ok(log_to_linear(&log_out).map(|v| v * output_gain))
}

/// Recolor `rgb` with a new luminance:
/// `clamp((rgb / max(lum, eps))^saturation * new_lum, 0, 1)` per channel.
pub fn rescale_rgb_by_luminance(
    rgb: &RgbGrid,
    luminance: &ScalarGrid,
    new_luminance: &ScalarGrid,
    saturation: f32,
) -> Result<RgbGrid> {
    ensure_same_dimensions(rgb, luminance, "rgb vs original luminance")?;
    ensure_same_dimensions(rgb, new_luminance, "rgb vs new luminance")?;
    RgbGrid::from_fn(rgb.width(), rgb.height(), |x, y| {
        let l = luminance.at(x, y).max(LUMINANCE_EPSILON);
        let n = new_luminance.at(x, y);
        rgb.at(x, y)
            .map(|c| ((c / l).powf(saturation) * n).clamp(0.0, 1.0))
    })
}

/// Every intermediate layer of one tone-mapping run.
#[derive(Debug, Clone)]
pub struct ToneMappingResult {
    /// Linear luminance of the input.
    pub luminance: ScalarGrid,
    /// `ln` of the luminance.
    pub log_luminance: ScalarGrid,
    /// Bilateral-filtered log luminance.
    pub base: ScalarGrid,
    pub detail: ScalarGrid,
    /// Compressed linear luminance.
    pub tone_mapped_luminance: ScalarGrid,
    /// Final display RGB in `[0, 1]`.
    pub rgb: RgbGrid,
}

/// Bilateral base/detail tone mapper.
#[derive(Debug, Clone, Default)]
pub struct ToneMapper {
    params: ToneMappingParams,
}

impl ToneMapper {
    pub fn new(params: ToneMappingParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ToneMappingParams {
        &self.params
    }

    pub fn tone_map(&self, hdr: &RgbGrid) -> Result<ToneMappingResult> {
        self.params.validate()?;

        let luminance = rgb_to_luminance(hdr);
        let log_luminance = log_image(&luminance);
        let base = bilateral_filter(&log_luminance, &self.params.bilateral())?;
        let detail = detail_layer(&log_luminance, &base)?;
        let tone_mapped_luminance = durand_tone_map(
            &base,
            &detail,
            self.params.base_scale,
            self.params.output_gain,
        )?;
        let rgb = rescale_rgb_by_luminance(
            hdr,
            &luminance,
            &tone_mapped_luminance,
            self.params.saturation,
        )?;

        Ok(ToneMappingResult {
            luminance,
            log_luminance,
            base,
            detail,
            tone_mapped_luminance,
            rgb,
        })
    }
}
