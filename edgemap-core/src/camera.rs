use crate::{ImagePoint, KeyPoint};

/// Allows conversion between the point on an image and the internal projection
/// which describes the direction of the ray out of the camera.
pub trait CameraModel {
    type Projection;

    /// Extracts the projection from a pixel location in an image.
    ///
    /// The image point has its X axis pointing right and its Y axis pointing down.
    fn calibrate<P>(&self, point: P) -> Self::Projection
    where
        P: ImagePoint;

    /// Converts the projection back into a pixel location in the image.
    fn uncalibrate(&self, projection: Self::Projection) -> KeyPoint;
}
