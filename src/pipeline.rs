//! End-to-end drivers that chain the operators and persist intermediates.

use cv_core::{Error, Plane3, Result, RgbGrid, ScalarGrid};
use cv_imgproc::{apply_gamma, normalize_rgb, normalize_scalar, planes_to_rgb};
use cv_io::{load_rgb, load_scalar, save_rgb, save_scalar, SaveOptions};
use cv_photo::{
    gradients_to_rgb, PlaneGradients, PoissonEditor, PoissonParams, ToneMapper,
    ToneMappingParams,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Inputs, outputs and parameters of both pipelines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    /// HDR input of the tone mapper, relative to `data_dir`.
    pub hdr_image: String,
    /// Image pasted into the tone-mapped result.
    pub source_image: String,
    /// Grayscale mask selecting the pasted region of `source_image`.
    pub mask_image: String,
    pub tone_mapping: ToneMappingParams,
    pub poisson: PoissonParams,
    pub threads: Option<usize>,
    pub save_intermediates: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            output_dir: PathBuf::from("outputs"),
            hdr_image: "memorial2_half.hdr".to_string(),
            source_image: "cat.png".to_string(),
            mask_image: "cat_mask.png".to_string(),
            tone_mapping: ToneMappingParams::default(),
            poisson: PoissonParams::default(),
            threads: None,
            save_intermediates: true,
        }
    }
}

impl PipelineConfig {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        serde_json::from_str(&text)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn input_path(&self, name: &str) -> PathBuf {
        self.data_dir.join(name)
    }
}

/// Writes numbered stage images into the output directory, or nothing when
/// intermediates are disabled.
struct StageWriter<'a> {
    dir: &'a Path,
    enabled: bool,
}

impl<'a> StageWriter<'a> {
    fn new(config: &'a PipelineConfig) -> Self {
        Self {
            dir: &config.output_dir,
            enabled: config.save_intermediates,
        }
    }

    fn rgb(&self, name: &str, image: &RgbGrid) -> Result<()> {
        if self.enabled {
            save_rgb(image, self.dir.join(name), &SaveOptions::default())?;
        }
        Ok(())
    }

    fn scalar(&self, name: &str, image: &ScalarGrid) -> Result<()> {
        if self.enabled {
            save_scalar(image, self.dir.join(name), &SaveOptions::default())?;
        }
        Ok(())
    }

    fn planes(&self, name: &str, planes: &Plane3<ScalarGrid>) -> Result<()> {
        if self.enabled {
            self.rgb(name, &planes_to_rgb(planes)?)?;
        }
        Ok(())
    }

    fn gradients(&self, prefix: &str, field: &PlaneGradients) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }
        for (channel, g) in field.iter() {
            let name = format!("{}_{}.png", prefix, channel.name());
            self.rgb(&name, &gradients_to_rgb(g)?)?;
        }
        Ok(())
    }
}

/// Tone map `config.hdr_image` and return the display RGB.
pub fn run_tone_mapping(config: &PipelineConfig) -> Result<RgbGrid> {
    let out = StageWriter::new(config);
    let params = &config.tone_mapping;

    let hdr_path = config.input_path(&config.hdr_image);
    tracing::info!("tone mapping {}", hdr_path.display());
    let hdr = load_rgb(&hdr_path)?;
    out.rgb("0_src.png", &hdr)?;

    let normalized = normalize_rgb(&hdr);
    out.rgb("1_normalized.png", &normalized)?;
    out.rgb("2_gamma.png", &apply_gamma(&normalized, params.gamma))?;
    out.rgb("2_gamma_orig.png", &apply_gamma(&hdr, params.gamma))?;

    let result = ToneMapper::new(*params).tone_map(&hdr)?;
    out.scalar("3a_luminance.png", &result.luminance)?;
    out.scalar("3b_log_luminance_H.png", &normalize_scalar(&result.log_luminance))?;
    out.scalar("4_base_layer.png", &normalize_scalar(&result.base))?;
    out.scalar("5_detail_layer.png", &normalize_scalar(&result.detail))?;
    out.scalar("6_tmo_luminance.png", &result.tone_mapped_luminance)?;
    out.rgb("7_tmo_rgb.png", &result.rgb)?;

    tracing::info!("tone mapping done");
    Ok(result.rgb)
}

/// Paste the masked source image into `target` and return the edited RGB.
pub fn run_poisson_editing(config: &PipelineConfig, target: &RgbGrid) -> Result<RgbGrid> {
    let out = StageWriter::new(config);

    let source = load_rgb(config.input_path(&config.source_image))?;
    let mask = load_scalar(config.input_path(&config.mask_image))?;
    tracing::info!(
        colorspace = ?config.poisson.colorspace,
        "Poisson editing {} into a {}x{} target",
        config.source_image,
        target.width(),
        target.height()
    );

    let result = PoissonEditor::new(config.poisson).edit(target, &source, &mask)?;
    out.planes("7b_target_xyz.png", &result.target_planes)?;
    out.planes("7c_source_xyz.png", &result.source_planes)?;
    out.gradients("8a_source_gradients", &result.source_gradients)?;
    out.gradients("8b_target_gradients", &result.target_gradients)?;
    out.gradients("9_merged_gradients", &result.merged_gradients)?;
    if out.enabled {
        out.rgb("10_divergence.png", &normalize_rgb(&planes_to_rgb(&result.divergence)?))?;
    }
    out.planes("11_edit_result_XYZ.png", &result.result_planes)?;
    out.rgb("12_edit_result_rgb.png", &result.rgb)?;

    tracing::info!("Poisson editing done");
    Ok(result.rgb)
}
