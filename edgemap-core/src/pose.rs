use derive_more::{AsMut, AsRef, From, Into};
use nalgebra::{IsometryMatrix3, Rotation3, UnitQuaternion, Vector3};

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// This trait is implemented by the rigid transforms in this library:
///
/// * [`CameraToVehicle`] - Transforms camera-frame points into the vehicle frame
pub trait Pose: From<IsometryMatrix3<f64>> + Clone + Copy {
    /// Retrieve the isometry.
    fn isometry(self) -> IsometryMatrix3<f64>;

    /// Creates a pose with no change in position or orientation.
    fn identity() -> Self {
        IsometryMatrix3::identity().into()
    }

    /// Create the pose from rotation and translation.
    fn from_parts(translation: Vector3<f64>, rotation: Rotation3<f64>) -> Self {
        IsometryMatrix3::from_parts(translation.into(), rotation).into()
    }

    /// Create the pose from a translation and a unit quaternion, which is the form
    /// transform trees usually hand rotations out in.
    fn from_translation_quaternion(
        translation: Vector3<f64>,
        rotation: UnitQuaternion<f64>,
    ) -> Self {
        Self::from_parts(translation, rotation.to_rotation_matrix())
    }

    fn translation(self) -> Vector3<f64> {
        self.isometry().translation.vector
    }

    fn rotation(self) -> Rotation3<f64> {
        self.isometry().rotation
    }
}

/// The extrinsic pose of a camera mounted on a vehicle.
///
/// This transforms camera points (with depth as `z`) into vehicle coordinates.
/// Its translation is where the optical center sits in the vehicle frame and its
/// rotation is how the camera is oriented relative to the vehicle.
#[derive(Debug, Clone, Copy, PartialEq, AsMut, AsRef, From, Into)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct CameraToVehicle(pub IsometryMatrix3<f64>);

impl Pose for CameraToVehicle {
    #[inline(always)]
    fn isometry(self) -> IsometryMatrix3<f64> {
        self.into()
    }
}
