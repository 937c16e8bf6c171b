use thiserror::Error;

/// Why a frame produced no edge map, or why a pose sample was refused.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("no camera to vehicle pose has been received yet")]
    UninitializedPose,
    #[error("intrinsic matrix is not invertible")]
    MalformedIntrinsic,
    #[error("rotation quaternion has norm {norm}, expected a unit quaternion")]
    InvalidRotation { norm: f64 },
    #[error("pose lookup failed: {0}")]
    PoseLookup(String),
}
