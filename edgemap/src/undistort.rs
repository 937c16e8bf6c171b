//! Turning a raw camera frame into the working frame the detector runs on.

use edgemap_core::KeyPoint;
use edgemap_pinhole::CameraIntrinsicsDistortion;
use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, Luma};
use imageproc::geometric_transformations::{warp_with, Interpolation};
use log::*;

/// The undistorted, resized grayscale frame and the factor it was resized by.
#[derive(Debug, Clone)]
pub struct WorkingFrame {
    pub gray: GrayImage,
    /// Working width over raw width.
    pub scale: f64,
}

/// Removes lens distortion, keeping the same intrinsic matrix for the output.
///
/// Each output pixel samples the raw image, bilinearly, where the distortion model
/// says it was imaged. Pixels that come from outside the raw frame are black.
pub fn undistort_image(image: &GrayImage, camera: &CameraIntrinsicsDistortion) -> GrayImage {
    if camera.distortion.is_identity() {
        return image.clone();
    }
    let camera = *camera;
    warp_with(
        image,
        move |x, y| {
            let raw = camera.distort_keypoint(KeyPoint::new(f64::from(x), f64::from(y)));
            (raw.x as f32, raw.y as f32)
        },
        Interpolation::Bilinear,
        Luma([0]),
    )
}

/// Factor that resizes an image `width` pixels wide to `target_width`.
///
/// ```
/// assert_eq!(edgemap::working_scale(1600, 800), 0.5);
/// ```
pub fn working_scale(width: u32, target_width: u32) -> f64 {
    if width == 0 {
        1.0
    } else {
        f64::from(target_width) / f64::from(width)
    }
}

/// Converts to grayscale, undistorts and resizes to `target_width`, keeping the
/// aspect ratio. The working height is rounded down.
pub fn prepare_frame(
    image: &DynamicImage,
    camera: &CameraIntrinsicsDistortion,
    target_width: u32,
) -> WorkingFrame {
    let gray = undistort_image(&image.to_luma8(), camera);
    let (width, height) = gray.dimensions();
    let scale = working_scale(width, target_width);
    let target_height = (scale * f64::from(height)).floor() as u32;
    if width == 0 || height == 0 || target_width == 0 || target_height == 0 {
        warn!("cannot resize a {}x{} frame to width {}", width, height, target_width);
        return WorkingFrame { gray, scale: 1.0 };
    }
    let gray = if (width, height) == (target_width, target_height) {
        gray
    } else {
        imageops::resize(&gray, target_width, target_height, FilterType::Triangle)
    };
    trace!(
        "working frame {}x{} from {}x{}",
        target_width,
        target_height,
        width,
        height
    );
    WorkingFrame { gray, scale }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edgemap_core::nalgebra::{Point2, Vector2};
    use edgemap_pinhole::{CameraIntrinsics, Distortion};
    use image::{Rgb, RgbImage};

    fn camera(coefficients: &[f64]) -> CameraIntrinsicsDistortion {
        CameraIntrinsicsDistortion::new(
            CameraIntrinsics::identity()
                .focals(Vector2::new(300.0, 300.0))
                .principal_point(Point2::new(160.0, 120.0)),
            Distortion::from_coefficients(coefficients),
        )
    }

    #[test]
    fn frame_is_resized_to_working_width() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(321, 240, Rgb([10, 200, 30])));
        let frame = prepare_frame(&image, &camera(&[]), 160);
        assert_eq!(frame.gray.dimensions(), (160, 119));
        assert_eq!(frame.scale, 160.0 / 321.0);
    }

    #[test]
    fn pincushion_distortion_blackens_corners() {
        let image = GrayImage::from_pixel(320, 240, Luma([200]));
        let undistorted = undistort_image(&image, &camera(&[0.4, 0.1]));
        assert_eq!(undistorted.dimensions(), (320, 240));
        assert_eq!(undistorted.get_pixel(160, 120)[0], 200);
        assert_eq!(undistorted.get_pixel(0, 0)[0], 0);
    }
}
