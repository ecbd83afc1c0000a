use cv_core::{Plane3, Result, RgbGrid, ScalarGrid};
use nalgebra::{Matrix3, Vector3};

/// ITU-R BT.601 luma weights in R, G, B order.
pub const LUMINANCE_WEIGHTS: [f32; 3] = [0.299, 0.587, 0.114];

/// Linear RGB to CIE 1931 XYZ.
pub fn rgb_to_xyz_matrix() -> Matrix3<f32> {
    Matrix3::new(
        0.49, 0.31, 0.2, //
        0.17697, 0.8124, 0.01063, //
        0.0, 0.01, 0.99,
    )
}

pub fn xyz_to_rgb_matrix() -> Matrix3<f32> {
    // The forward matrix is well conditioned (det ~ 0.177).
    rgb_to_xyz_matrix()
        .try_inverse()
        .unwrap_or_else(|| Matrix3::identity())
}

/// Weighted sum of the R, G and B channels.
pub fn rgb_to_luminance(rgb: &RgbGrid) -> ScalarGrid {
    let weights = Vector3::from(LUMINANCE_WEIGHTS);
    rgb.map(|px| px.dot(&weights))
}

/// Replicate a scalar grid into all three color channels.
pub fn scalar_to_rgb(gray: &ScalarGrid) -> RgbGrid {
    gray.map(|v| Vector3::new(v, v, v))
}

/// Scalar grid taken from the red channel.
pub fn red_channel(rgb: &RgbGrid) -> ScalarGrid {
    rgb.map(|px| px.x)
}

/// Convert attribute-order RGB to plane-order XYZ.
pub fn rgb_to_xyz(rgb: &RgbGrid) -> Plane3<ScalarGrid> {
    let m = rgb_to_xyz_matrix();
    rgb_to_planes(&rgb.map(|px| m * px))
}

/// Convert plane-order XYZ back to attribute-order RGB.
pub fn xyz_to_rgb(xyz: &Plane3<ScalarGrid>) -> Result<RgbGrid> {
    let m = xyz_to_rgb_matrix();
    Ok(planes_to_rgb(xyz)?.map(|px| m * px))
}

/// Attribute layout to plane layout.
pub fn rgb_to_planes(image: &RgbGrid) -> Plane3<ScalarGrid> {
    Plane3::new(
        image.map(|px| px.x),
        image.map(|px| px.y),
        image.map(|px| px.z),
    )
}

/// Plane layout to attribute layout. All planes must share dimensions.
pub fn planes_to_rgb(planes: &Plane3<ScalarGrid>) -> Result<RgbGrid> {
    use cv_core::Channel::{X, Y, Z};
    let xy = planes[X].zip_map(&planes[Y], |x, y| Vector3::new(x, y, 0.0))?;
    xy.zip_map(&planes[Z], |mut px, z| {
        px.z = z;
        px
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cv_core::Channel;

    #[test]
    fn luminance_of_gray_is_gray() {
        let rgb = RgbGrid::filled(3, 2, Vector3::new(0.5, 0.5, 0.5)).unwrap();
        let lum = rgb_to_luminance(&rgb);
        assert!(lum.data().iter().all(|&v| (v - 0.5).abs() < 1e-6));
    }

    #[test]
    fn luminance_weights() {
        let rgb = RgbGrid::filled(1, 1, Vector3::new(1.0, 0.0, 0.0)).unwrap();
        assert!((rgb_to_luminance(&rgb).at(0, 0) - 0.299).abs() < 1e-6);
    }

    #[test]
    fn xyz_round_trip() {
        let rgb = RgbGrid::from_fn(4, 3, |x, y| {
            Vector3::new(x as f32 * 0.25, y as f32 * 0.3, 0.7)
        })
        .unwrap();
        let back = xyz_to_rgb(&rgb_to_xyz(&rgb)).unwrap();
        for (a, b) in rgb.data().iter().zip(back.data()) {
            assert!((a - b).norm() < 1e-5);
        }
    }

    #[test]
    fn planes_layout() {
        let rgb = RgbGrid::from_fn(2, 2, |x, y| Vector3::new(x as f32, y as f32, 9.0)).unwrap();
        let planes = rgb_to_planes(&rgb);
        assert_eq!(planes[Channel::X].at(1, 0), 1.0);
        assert_eq!(planes[Channel::Y].at(1, 1), 1.0);
        assert_eq!(planes[Channel::Z].at(0, 1), 9.0);
        assert_eq!(planes_to_rgb(&planes).unwrap(), rgb);
    }

    #[test]
    fn planes_must_match() {
        let planes = Plane3::new(
            ScalarGrid::new(2, 2).unwrap(),
            ScalarGrid::new(2, 2).unwrap(),
            ScalarGrid::new(3, 2).unwrap(),
        );
        assert!(planes_to_rgb(&planes).is_err());
    }

    #[test]
    fn red_channel_and_replicate() {
        let gray = ScalarGrid::from_fn(3, 1, |x, _| x as f32).unwrap();
        let rgb = scalar_to_rgb(&gray);
        assert_eq!(rgb.at(2, 0), Vector3::new(2.0, 2.0, 2.0));
        assert_eq!(red_channel(&rgb), gray);
    }
}
