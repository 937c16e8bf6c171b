//! This crate plugs into `edgemap-core` and provides the pinhole camera model used to turn
//! image coordinates into normalized image coordinates (and back), with optional plumb-bob
//! distortion correction. It also knows how to rescale an intrinsic matrix when the image
//! it describes gets resized, which is needed whenever the detector works on a smaller
//! copy of the camera frame.

#![no_std]

mod distortion;

pub use distortion::*;

use derive_more::{AsMut, AsRef, Deref, DerefMut, From, Into};
use edgemap_core::nalgebra::{Matrix3, Point2, Vector2};
use edgemap_core::{CameraModel, ImagePoint, KeyPoint};

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// A point in normalized image coordinates. This keypoint has been normalized based on
/// the camera intrinsic matrix and, if the camera model has distortion, corrected for it.
/// Appending a `1.0` to it gives the direction of the ray in the camera frame.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, AsMut, AsRef, Deref, DerefMut, From, Into)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct NormalizedKeyPoint(pub Point2<f64>);

/// Scales an intrinsic matrix for an image resized uniformly by `scale`.
///
/// The whole matrix is multiplied by `scale` and the bottom-right entry is then put back
/// to `1.0`, since it is the homogeneous normalization and not a focal length.
///
/// ```
/// use edgemap_core::nalgebra::Matrix3;
/// use edgemap_pinhole::scale_intrinsic_matrix;
/// let k = Matrix3::new(
///     1000.0, 0.0, 960.0,
///     0.0, 1000.0, 540.0,
///     0.0, 0.0, 1.0,
/// );
/// let scaled = scale_intrinsic_matrix(&k, 800.0 / 1920.0);
/// assert!((scaled[(0, 0)] - 416.666_666).abs() < 1e-3);
/// assert_eq!(scaled[(0, 2)], 400.0);
/// assert_eq!(scaled[(2, 2)], 1.0);
/// ```
pub fn scale_intrinsic_matrix(matrix: &Matrix3<f64>, scale: f64) -> Matrix3<f64> {
    let mut scaled = matrix * scale;
    scaled[(2, 2)] = 1.0;
    scaled
}

/// This contains intrinsic camera parameters as per
/// [this Wikipedia page](https://en.wikipedia.org/wiki/Camera_resectioning#Intrinsic_parameters).
///
/// For an already undistorted image this is all that is needed to normalize image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct CameraIntrinsics {
    pub focals: Vector2<f64>,
    pub principal_point: Point2<f64>,
    pub skew: f64,
}

impl CameraIntrinsics {
    /// Creates camera intrinsics that would create an identity intrinsic matrix.
    pub fn identity() -> Self {
        Self {
            focals: Vector2::new(1.0, 1.0),
            skew: 0.0,
            principal_point: Point2::new(0.0, 0.0),
        }
    }

    pub fn focals(self, focals: Vector2<f64>) -> Self {
        Self { focals, ..self }
    }

    pub fn focal(self, focal: f64) -> Self {
        Self {
            focals: Vector2::new(focal, focal),
            ..self
        }
    }

    pub fn principal_point(self, principal_point: Point2<f64>) -> Self {
        Self {
            principal_point,
            ..self
        }
    }

    pub fn skew(self, skew: f64) -> Self {
        Self { skew, ..self }
    }

    /// Reads the parameters back out of an upper triangular intrinsic matrix.
    ///
    /// The bottom row is assumed to be `[0, 0, 1]` and is not inspected.
    pub fn from_matrix(matrix: &Matrix3<f64>) -> Self {
        Self {
            focals: Vector2::new(matrix[(0, 0)], matrix[(1, 1)]),
            principal_point: Point2::new(matrix[(0, 2)], matrix[(1, 2)]),
            skew: matrix[(0, 1)],
        }
    }

    /// Builds the intrinsics from the row-major `K` array of a ROS `CameraInfo` message.
    pub fn from_row_major(k: [f64; 9]) -> Self {
        Self::from_matrix(&Matrix3::from_row_slice(&k))
    }

    #[rustfmt::skip]
    pub fn matrix(&self) -> Matrix3<f64> {
        Matrix3::new(
            self.focals.x,  self.skew,      self.principal_point.x,
            0.0,            self.focals.y,  self.principal_point.y,
            0.0,            0.0,            1.0,
        )
    }

    /// The intrinsics of the same camera after its image was resized by `scale`.
    ///
    /// This is [`scale_intrinsic_matrix`] expressed on the parameters.
    ///
    /// ```
    /// use edgemap_core::nalgebra::{Point2, Vector2};
    /// use edgemap_pinhole::{scale_intrinsic_matrix, CameraIntrinsics};
    /// let intrinsics = CameraIntrinsics::identity()
    ///     .focals(Vector2::new(984.2, 980.8))
    ///     .principal_point(Point2::new(690.0, 233.2));
    /// let scale = 0.5;
    /// assert_eq!(
    ///     intrinsics.scaled(scale).matrix(),
    ///     scale_intrinsic_matrix(&intrinsics.matrix(), scale),
    /// );
    /// ```
    #[must_use]
    pub fn scaled(self, scale: f64) -> Self {
        Self {
            focals: self.focals * scale,
            principal_point: self.principal_point * scale,
            skew: self.skew * scale,
        }
    }

    /// An intrinsic matrix can only be inverted if both focal lengths are non-zero.
    pub fn is_invertible(&self) -> bool {
        let finite = self.focals.iter().all(|f| f.is_finite())
            && self.principal_point.iter().all(|c| c.is_finite())
            && self.skew.is_finite();
        finite && self.focals.x != 0.0 && self.focals.y != 0.0
    }
}

impl CameraModel for CameraIntrinsics {
    type Projection = NormalizedKeyPoint;

    /// Takes in a point from an image in pixel coordinates and
    /// converts it to a [`NormalizedKeyPoint`].
    ///
    /// ```
    /// use edgemap_core::{KeyPoint, CameraModel};
    /// use edgemap_pinhole::{NormalizedKeyPoint, CameraIntrinsics};
    /// use edgemap_core::nalgebra::{Vector2, Point2};
    /// let intrinsics = CameraIntrinsics {
    ///     focals: Vector2::new(800.0, 900.0),
    ///     principal_point: Point2::new(500.0, 600.0),
    ///     skew: 1.7,
    /// };
    /// let kp = KeyPoint(Point2::new(471.0, 322.0));
    /// let nkp = intrinsics.calibrate(kp);
    /// let calibration_matrix = intrinsics.matrix();
    /// let distance = (kp.to_homogeneous() - calibration_matrix * nkp.to_homogeneous()).norm();
    /// assert!(distance < 0.1);
    /// ```
    fn calibrate<P>(&self, point: P) -> NormalizedKeyPoint
    where
        P: ImagePoint,
    {
        let centered = point.image_point() - self.principal_point;
        let y = centered.y / self.focals.y;
        let x = (centered.x - self.skew * y) / self.focals.x;
        NormalizedKeyPoint(Point2::new(x, y))
    }

    /// Converts a [`NormalizedKeyPoint`] back into pixel coordinates.
    ///
    /// ```
    /// use edgemap_core::{KeyPoint, CameraModel};
    /// use edgemap_pinhole::CameraIntrinsics;
    /// use edgemap_core::nalgebra::{Vector2, Point2};
    /// let intrinsics = CameraIntrinsics {
    ///     focals: Vector2::new(800.0, 900.0),
    ///     principal_point: Point2::new(500.0, 600.0),
    ///     skew: 1.7,
    /// };
    /// let kp = KeyPoint(Point2::new(471.0, 322.0));
    /// let nkp = intrinsics.calibrate(kp);
    /// let ukp = intrinsics.uncalibrate(nkp);
    /// assert!((kp.0 - ukp.0).norm() < 1e-6);
    /// ```
    fn uncalibrate(&self, projection: NormalizedKeyPoint) -> KeyPoint {
        let y = projection.y * self.focals.y;
        let x = projection.x * self.focals.x + self.skew * projection.y;
        let centered = Point2::new(x, y);
        KeyPoint(centered + self.principal_point.coords)
    }
}

/// Intrinsics together with the plumb-bob lens distortion of the same camera.
///
/// Undistorted pixels are expressed on the pixel grid of the same intrinsic matrix, which
/// is what an image undistorted with its own camera matrix as the new camera matrix uses.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct CameraIntrinsicsDistortion {
    pub intrinsics: CameraIntrinsics,
    pub distortion: Distortion,
}

impl CameraIntrinsicsDistortion {
    pub fn new(intrinsics: CameraIntrinsics, distortion: Distortion) -> Self {
        Self {
            intrinsics,
            distortion,
        }
    }

    /// Maps a pixel of the raw (distorted) image to where it lands in the undistorted image.
    ///
    /// ```
    /// use edgemap_core::KeyPoint;
    /// use edgemap_core::nalgebra::{Point2, Vector2};
    /// use edgemap_pinhole::{CameraIntrinsics, CameraIntrinsicsDistortion, Distortion};
    /// let camera = CameraIntrinsicsDistortion::new(
    ///     CameraIntrinsics::identity()
    ///         .focals(Vector2::new(800.0, 800.0))
    ///         .principal_point(Point2::new(400.0, 300.0)),
    ///     Distortion::from_coefficients(&[-0.2, 0.05, 0.001, -0.0005, 0.0]),
    /// );
    /// let raw = KeyPoint(Point2::new(650.0, 420.0));
    /// let undistorted = camera.undistort_keypoint(raw);
    /// let back = camera.distort_keypoint(undistorted);
    /// assert!((back.0 - raw.0).norm() < 1e-2);
    /// ```
    pub fn undistort_keypoint(&self, point: impl ImagePoint) -> KeyPoint {
        self.intrinsics.uncalibrate(self.calibrate(point))
    }

    /// Maps a pixel of the undistorted image back to the raw (distorted) image.
    pub fn distort_keypoint(&self, point: impl ImagePoint) -> KeyPoint {
        self.uncalibrate(self.intrinsics.calibrate(point))
    }
}

impl CameraModel for CameraIntrinsicsDistortion {
    type Projection = NormalizedKeyPoint;

    fn calibrate<P>(&self, point: P) -> NormalizedKeyPoint
    where
        P: ImagePoint,
    {
        let NormalizedKeyPoint(distorted) = self.intrinsics.calibrate(point);
        NormalizedKeyPoint(self.distortion.undistort(distorted))
    }

    fn uncalibrate(&self, projection: NormalizedKeyPoint) -> KeyPoint {
        let NormalizedKeyPoint(undistorted) = projection;
        self.intrinsics
            .uncalibrate(NormalizedKeyPoint(self.distortion.distort(undistorted)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn intrinsics() -> CameraIntrinsics {
        CameraIntrinsics::identity()
            .focals(Vector2::new(1402.5, 1398.1))
            .principal_point(Point2::new(963.2, 541.7))
            .skew(0.4)
    }

    #[test]
    fn matrix_round_trip() {
        let k = intrinsics().matrix();
        assert_eq!(CameraIntrinsics::from_matrix(&k), intrinsics());
    }

    #[test]
    fn row_major_layout() {
        let k = CameraIntrinsics::from_row_major([
            500.0, 0.0, 400.0, //
            0.0, 510.0, 300.0, //
            0.0, 0.0, 1.0,
        ]);
        assert_eq!(k.focals, Vector2::new(500.0, 510.0));
        assert_eq!(k.principal_point, Point2::new(400.0, 300.0));
        assert_eq!(k.skew, 0.0);
    }

    #[test]
    fn scaling_keeps_homogeneous_entry() {
        let k = intrinsics().matrix();
        let scaled = scale_intrinsic_matrix(&k, 0.41);
        assert_eq!(scaled[(2, 2)], 1.0);
        assert_eq!(scaled[(2, 0)], 0.0);
        assert_eq!(scaled[(2, 1)], 0.0);
        assert_relative_eq!(scaled[(0, 0)], k[(0, 0)] * 0.41);
        assert_relative_eq!(scaled[(1, 2)], k[(1, 2)] * 0.41);
    }

    #[test]
    fn singular_intrinsics_are_detected() {
        assert!(intrinsics().is_invertible());
        assert!(!intrinsics().focal(0.0).is_invertible());
        assert!(!intrinsics().skew(f64::NAN).is_invertible());
    }

    #[test]
    fn zero_distortion_is_identity() {
        let camera = CameraIntrinsicsDistortion::new(intrinsics(), Distortion::default());
        let kp = KeyPoint::new(120.0, 777.0);
        assert_relative_eq!(camera.undistort_keypoint(kp).0, kp.0, epsilon = 1e-9);
        assert_relative_eq!(camera.distort_keypoint(kp).0, kp.0, epsilon = 1e-9);
    }
}
