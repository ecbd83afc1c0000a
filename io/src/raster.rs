use cv_core::{Error, Result, RgbGrid, ScalarGrid};
use image::codecs::jpeg::JpegEncoder;
use image::{ImageFormat, RgbImage};
use nalgebra::Vector3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

const JPEG_QUALITY: u8 = 95;

/// Quantization settings for [`save_rgb`] and [`save_scalar`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SaveOptions {
    /// Multiplier applied before quantizing.
    pub scale: f32,
    /// Amplitude of uniform dither noise in `[-noise, noise]`; `0` disables it.
    pub noise: f32,
    /// Seed for the dither noise. `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            scale: 1.0,
            noise: 0.0,
            seed: None,
        }
    }
}

impl SaveOptions {
    pub fn scaled(scale: f32) -> Self {
        Self {
            scale,
            ..Self::default()
        }
    }
}

fn image_error(path: &Path, err: image::ImageError) -> Error {
    Error::Image(format!("{}: {}", path.display(), err))
}

/// Load any supported file as linear float RGB.
///
/// 8-bit formats land in `[0, 1]`; Radiance HDR keeps its unbounded values.
pub fn load_rgb<P: AsRef<Path>>(path: P) -> Result<RgbGrid> {
    let path = path.as_ref();
    let img = image::open(path)
        .map_err(|e| image_error(path, e))?
        .into_rgb32f();
    let (w, h) = (img.width() as usize, img.height() as usize);
    let data = img
        .into_raw()
        .chunks_exact(3)
        .map(|c| Vector3::new(c[0], c[1], c[2]))
        .collect();
    tracing::debug!("loaded {} ({}x{})", path.display(), w, h);
    RgbGrid::from_vec(w, h, data)
}

/// Load a file as a scalar grid taken from its red channel (masks are stored
/// as grayscale images).
pub fn load_scalar<P: AsRef<Path>>(path: P) -> Result<ScalarGrid> {
    Ok(load_rgb(path)?.map(|px| px.x))
}

fn quantize(image: &RgbGrid, options: &SaveOptions) -> Result<RgbImage> {
    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let noise = options.noise.abs();

    let mut bytes = Vec::with_capacity(image.len() * 3);
    for px in image.data() {
        for c in 0..3 {
            let mut v = px[c] * options.scale;
            if noise > 0.0 {
                v += rng.gen_range(-noise..=noise);
            }
            bytes.push((v.clamp(0.0, 1.0) * 255.0) as u8);
        }
    }
    RgbImage::from_raw(image.width() as u32, image.height() as u32, bytes)
        .ok_or_else(|| Error::Image("pixel buffer does not match image size".to_string()))
}

/// Quantize to 8 bits and write PNG (for a `.png` extension) or JPEG
/// (anything else, quality 95). Missing parent directories are created.
pub fn save_rgb<P: AsRef<Path>>(image: &RgbGrid, path: P, options: &SaveOptions) -> Result<()> {
    let path = path.as_ref();
    let img = quantize(image, options)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let is_png = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("png"))
        .unwrap_or(false);
    if is_png {
        img.save_with_format(path, ImageFormat::Png)
            .map_err(|e| image_error(path, e))?;
    } else {
        let mut writer = BufWriter::new(File::create(path)?);
        JpegEncoder::new_with_quality(&mut writer, JPEG_QUALITY)
            .encode_image(&img)
            .map_err(|e| image_error(path, e))?;
    }
    tracing::debug!("saved {}", path.display());
    Ok(())
}

/// Save a scalar grid as a gray image.
pub fn save_scalar<P: AsRef<Path>>(image: &ScalarGrid, path: P, options: &SaveOptions) -> Result<()> {
    save_rgb(&image.map(|v| Vector3::repeat(v)), path, options)
}
