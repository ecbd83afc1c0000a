use cv_core::{GradientField, RgbGrid, ScalarGrid};
use cv_io::*;
use nalgebra::Vector3;
use tempfile::tempdir;

fn ramp(w: usize, h: usize) -> RgbGrid {
    RgbGrid::from_fn(w, h, |x, y| {
        Vector3::new(x as f32 / w as f32, y as f32 / h as f32, 0.5)
    })
    .unwrap()
}

#[test]
fn binary_file_is_lossless() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested/grid.bin");
    let grid = ScalarGrid::from_fn(7, 3, |x, y| (x as f32 - 3.0) * 1e-3 + y as f32 * 1e5).unwrap();
    save_binary(&grid, &path).unwrap();
    let back: ScalarGrid = read_binary(&path).unwrap();
    assert_eq!(back, grid);
}

#[test]
fn gradient_pair_uses_suffixed_files() {
    let dir = tempdir().unwrap();
    let base = dir.path().join("grad");
    let field = GradientField::from_parts(
        ScalarGrid::filled(3, 2, 1.0).unwrap(),
        ScalarGrid::filled(3, 2, -1.0).unwrap(),
    )
    .unwrap();
    save_gradients(&field, &base).unwrap();
    assert!(dir.path().join("grad_dx.bin").exists());
    assert!(dir.path().join("grad_dy.bin").exists());
    let back = read_gradients(&base).unwrap();
    assert_eq!(back.dx(), field.dx());
    assert_eq!(back.dy(), field.dy());
}

#[test]
fn png_round_trip_is_quantized() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out/ramp.png");
    let img = ramp(8, 4);
    save_rgb(&img, &path, &SaveOptions::default()).unwrap();
    let back = load_rgb(&path).unwrap();
    assert_eq!(back.dimensions(), (8, 4));
    for (a, b) in back.data().iter().zip(img.data()) {
        assert!((a - b).abs().max() <= 1.0 / 255.0 + 1e-6);
    }
}

#[test]
fn jpeg_written_for_other_extensions() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ramp.jpg");
    save_rgb(&ramp(16, 16), &path, &SaveOptions::default()).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    // JPEG SOI marker
    assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    assert_eq!(load_rgb(&path).unwrap().dimensions(), (16, 16));
}

#[test]
fn scalar_saved_as_gray_and_loaded_from_red() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mask.png");
    let mask = ScalarGrid::from_vec(2, 1, vec![0.0, 1.0]).unwrap();
    save_scalar(&mask, &path, &SaveOptions::default()).unwrap();
    let back = load_scalar(&path).unwrap();
    assert_eq!(back.data(), &[0.0, 1.0]);
}

#[test]
fn missing_file_is_an_image_error() {
    let dir = tempdir().unwrap();
    let err = load_rgb(dir.path().join("nope.png")).unwrap_err();
    assert!(matches!(err, Error::Image(_)));
}
