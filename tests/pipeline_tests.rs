use nalgebra::Vector3;
use rust_cv_photo::core::{RgbGrid, ScalarGrid};
use rust_cv_photo::io::{load_rgb, save_rgb, save_scalar, SaveOptions};
use rust_cv_photo::photo::{Colorspace, PoissonParams, ToneMappingParams};
use rust_cv_photo::{run_poisson_editing, run_tone_mapping, PipelineConfig};
use tempfile::tempdir;

fn write_inputs(dir: &std::path::Path) {
    let hdr = RgbGrid::from_fn(12, 10, |x, y| {
        Vector3::new(0.1 + x as f32 * 0.07, 0.2 + y as f32 * 0.05, 0.4)
    })
    .unwrap();
    save_rgb(&hdr, dir.join("scene.png"), &SaveOptions::default()).unwrap();

    let source = RgbGrid::filled(12, 10, Vector3::new(0.9, 0.2, 0.1)).unwrap();
    save_rgb(&source, dir.join("patch.png"), &SaveOptions::default()).unwrap();

    let mask = ScalarGrid::from_fn(12, 10, |x, y| {
        if (4..8).contains(&x) && (3..7).contains(&y) {
            1.0
        } else {
            0.0
        }
    })
    .unwrap();
    save_scalar(&mask, dir.join("patch_mask.png"), &SaveOptions::default()).unwrap();
}

fn config(data: &std::path::Path, out: &std::path::Path) -> PipelineConfig {
    PipelineConfig {
        data_dir: data.to_path_buf(),
        output_dir: out.to_path_buf(),
        hdr_image: "scene.png".to_string(),
        source_image: "patch.png".to_string(),
        mask_image: "patch_mask.png".to_string(),
        tone_mapping: ToneMappingParams {
            filter_size: 5,
            space_sigma: 5.0 / 6.4,
            ..ToneMappingParams::default()
        },
        poisson: PoissonParams {
            iterations: 200,
            colorspace: Colorspace::Xyz,
        },
        threads: None,
        save_intermediates: true,
    }
}

#[test]
fn both_pipelines_write_numbered_stages() {
    let data = tempdir().unwrap();
    let out = tempdir().unwrap();
    write_inputs(data.path());
    let cfg = config(data.path(), &out.path().join("results"));

    let tone_mapped = run_tone_mapping(&cfg).unwrap();
    assert_eq!(tone_mapped.dimensions(), (12, 10));
    assert!(tone_mapped
        .data()
        .iter()
        .all(|px| px.iter().all(|&v| (0.0..=1.0).contains(&v))));

    let edited = run_poisson_editing(&cfg, &tone_mapped).unwrap();
    assert_eq!(edited.dimensions(), (12, 10));
    // Border pixels are pinned to the target.
    assert!((edited.at(0, 0) - tone_mapped.at(0, 0)).norm() < 1e-4);

    for name in [
        "0_src.png",
        "3b_log_luminance_H.png",
        "7_tmo_rgb.png",
        "8a_source_gradients_X.png",
        "9_merged_gradients_Z.png",
        "10_divergence.png",
        "12_edit_result_rgb.png",
    ] {
        assert!(cfg.output_dir.join(name).exists(), "missing {}", name);
    }
    let saved = load_rgb(cfg.output_dir.join("12_edit_result_rgb.png")).unwrap();
    assert_eq!(saved.dimensions(), (12, 10));
}

#[test]
fn intermediates_can_be_disabled() {
    let data = tempdir().unwrap();
    let out = tempdir().unwrap();
    write_inputs(data.path());
    let mut cfg = config(data.path(), &out.path().join("quiet"));
    cfg.save_intermediates = false;

    run_tone_mapping(&cfg).unwrap();
    assert!(!cfg.output_dir.exists());
}

#[test]
fn missing_input_fails() {
    let data = tempdir().unwrap();
    let out = tempdir().unwrap();
    let cfg = config(data.path(), out.path());
    assert!(run_tone_mapping(&cfg).is_err());
}
