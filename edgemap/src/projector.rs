use edgemap_core::nalgebra::{Matrix3, Rotation3, Vector3};
use edgemap_core::{CameraToVehicle, Edge, GroundPoint, ImagePoint, Pose, Segment};

/// Rays whose vehicle-frame bearing has a `z` above this never reach the ground.
pub const DEFAULT_HORIZON_GATE: f64 = -0.1;

/// Back-projects pixels of an undistorted image onto the vehicle's ground plane.
///
/// This holds everything one frame needs: the inverse intrinsic matrix and the
/// camera pose. It is a plain value, so it can be shared freely between threads.
///
/// ```
/// use edgemap::RayProjector;
/// use edgemap::{CameraToVehicle, KeyPoint, Pose};
/// use edgemap::nalgebra::{Matrix3, Rotation3, Vector3};
///
/// // A camera one meter up looking straight down.
/// let pose = CameraToVehicle::from_parts(Vector3::new(0.0, 0.0, 1.0), Rotation3::identity());
/// let k = Matrix3::new(500.0, 0.0, 400.0, 0.0, 500.0, 300.0, 0.0, 0.0, 1.0);
/// let projector = RayProjector::new(&k, pose).unwrap();
/// // With an identity rotation the camera z axis is vehicle z, so the optical axis
/// // points up and misses the ground.
/// assert!(projector.project(KeyPoint::new(400.0, 300.0)).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayProjector {
    inverse_intrinsics: Matrix3<f64>,
    rotation: Rotation3<f64>,
    origin: Vector3<f64>,
    horizon_gate: f64,
}

impl RayProjector {
    /// Returns `None` if `intrinsic_matrix` cannot be inverted.
    pub fn new(intrinsic_matrix: &Matrix3<f64>, pose: CameraToVehicle) -> Option<Self> {
        let inverse_intrinsics = intrinsic_matrix.try_inverse()?;
        if inverse_intrinsics.iter().any(|v| !v.is_finite()) {
            return None;
        }
        Some(Self {
            inverse_intrinsics,
            rotation: pose.rotation(),
            origin: pose.translation(),
            horizon_gate: DEFAULT_HORIZON_GATE,
        })
    }

    /// Replaces the default horizon gate of `-0.1`.
    #[must_use]
    pub fn with_horizon_gate(self, horizon_gate: f64) -> Self {
        Self {
            horizon_gate,
            ..self
        }
    }

    /// The unit direction of the ray through `pixel` in the vehicle frame.
    ///
    /// Returns `None` if the direction has no length or is not finite.
    pub fn bearing(&self, pixel: impl ImagePoint) -> Option<Vector3<f64>> {
        let homogeneous = pixel.image_point().to_homogeneous();
        let direction = self.rotation * (self.inverse_intrinsics * homogeneous);
        let bearing = direction.try_normalize(0.0)?;
        if bearing.iter().all(|v| v.is_finite()) {
            Some(bearing)
        } else {
            None
        }
    }

    /// Where the ray through `pixel` meets the plane `z = 0`.
    ///
    /// Returns `None` when the ray is not pointing down steeply enough to pass the
    /// horizon gate.
    pub fn project(&self, pixel: impl ImagePoint) -> Option<GroundPoint> {
        let bearing = self.bearing(pixel)?;
        if bearing.z > self.horizon_gate {
            return None;
        }
        let distance = -self.origin.z / bearing.z;
        Some(GroundPoint::new(
            self.origin.x + bearing.x * distance,
            self.origin.y + bearing.y * distance,
        ))
    }

    pub fn project_segment(&self, segment: &Segment) -> Edge {
        Edge::new(self.project(segment.start), self.project(segment.end))
    }
}
