use crate::Error;
use edgemap_core::nalgebra::{Quaternion, UnitQuaternion, Vector3};
use edgemap_core::{CameraToVehicle, Pose};
use log::*;
use std::sync::{PoisonError, RwLock};

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// How far a quaternion norm may stray from `1.0` before the sample is rejected.
pub const ROTATION_NORM_TOLERANCE: f64 = 1e-3;

/// Something that can be asked for the current camera to vehicle transform.
///
/// A failed lookup is normal (the transform may not be published yet) and leaves
/// whatever [`ExtrinsicSlot`] it feeds untouched.
pub trait PoseSource {
    fn lookup(&self) -> Result<CameraToVehicle, Error>;
}

impl<F> PoseSource for F
where
    F: Fn() -> Result<CameraToVehicle, Error>,
{
    fn lookup(&self) -> Result<CameraToVehicle, Error> {
        self()
    }
}

/// A raw transform sample as a transform tree hands it out.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct PoseSample {
    /// Position of the camera in the vehicle frame.
    pub translation: [f64; 3],
    /// Orientation of the camera in the vehicle frame as `[x, y, z, w]`.
    pub rotation: [f64; 4],
}

impl PoseSample {
    /// Validates the quaternion and builds the pose.
    ///
    /// ```
    /// use edgemap::PoseSample;
    /// use edgemap::Pose;
    ///
    /// let sample = PoseSample {
    ///     translation: [0.0, 0.0, 1.0],
    ///     rotation: [0.0, 0.0, 0.0, 1.0],
    /// };
    /// let pose = sample.to_pose().unwrap();
    /// assert_eq!(pose.translation().z, 1.0);
    ///
    /// let broken = PoseSample { rotation: [0.0, 0.0, 0.0, 0.0], ..sample };
    /// assert!(broken.to_pose().is_err());
    /// ```
    pub fn to_pose(&self) -> Result<CameraToVehicle, Error> {
        let [x, y, z, w] = self.rotation;
        let quaternion = Quaternion::new(w, x, y, z);
        let norm = quaternion.norm();
        if !norm.is_finite() || (norm - 1.0).abs() > ROTATION_NORM_TOLERANCE {
            return Err(Error::InvalidRotation { norm });
        }
        Ok(CameraToVehicle::from_translation_quaternion(
            Vector3::from(self.translation),
            UnitQuaternion::new_normalize(quaternion),
        ))
    }
}

impl PoseSource for PoseSample {
    fn lookup(&self) -> Result<CameraToVehicle, Error> {
        self.to_pose()
    }
}

/// The current extrinsic pose of the camera, shared between whoever updates it and
/// the frame processing that reads it.
///
/// The slot starts out empty. Writers swap in a complete pose and readers copy it
/// out, so a reader sees either the old pose or the new one and never a mixture.
#[derive(Debug, Default)]
pub struct ExtrinsicSlot {
    pose: RwLock<Option<CameraToVehicle>>,
}

impl ExtrinsicSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, pose: CameraToVehicle) {
        // The stored value is always a whole pose, so a poisoned lock is still usable.
        *self.pose.write().unwrap_or_else(PoisonError::into_inner) = Some(pose);
    }

    /// A snapshot of the last pose that was set, if any.
    pub fn get(&self) -> Option<CameraToVehicle> {
        *self.pose.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Asks `source` for a fresh pose and stores it if the lookup succeeds.
    ///
    /// Returns `true` if the slot was updated.
    pub fn refresh(&self, source: &impl PoseSource) -> bool {
        match source.lookup() {
            Ok(pose) => {
                trace!("extrinsic updated, translation {:?}", pose.translation());
                self.set(pose);
                true
            }
            Err(e) => {
                debug!("keeping previous extrinsic: {}", e);
                false
            }
        }
    }
}
