use crate::{Error, RayProjector, Rasterizer};
use edgemap_core::nalgebra::{Matrix3, UnitQuaternion};
use edgemap_core::{CameraToVehicle, Edge, Pose, Segment};
use log::*;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Projects the segments of one frame onto the ground and hands the edges to a
/// [`Rasterizer`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameProcessor<R> {
    pub rasterizer: R,
    pub horizon_gate: f64,
}

impl<R> FrameProcessor<R>
where
    R: Rasterizer,
{
    pub fn new(rasterizer: R) -> Self {
        Self {
            rasterizer,
            horizon_gate: crate::DEFAULT_HORIZON_GATE,
        }
    }

    /// Replaces the default horizon gate of `-0.1`.
    #[must_use]
    pub fn with_horizon_gate(self, horizon_gate: f64) -> Self {
        Self {
            horizon_gate,
            ..self
        }
    }

    /// Back-projects every segment with the given intrinsics and pose and rasterizes
    /// the result.
    ///
    /// The rasterizer is not touched if the pose is absent or the intrinsic matrix is
    /// singular.
    pub fn process(
        &self,
        segments: &[Segment],
        intrinsic_matrix: &Matrix3<f64>,
        pose: Option<CameraToVehicle>,
    ) -> Result<R::Output, Error> {
        let pose = pose.ok_or(Error::UninitializedPose)?;
        let rotation = UnitQuaternion::from_rotation_matrix(&pose.rotation());
        info!(
            "transform: {:?} {:?}",
            pose.translation().as_slice(),
            rotation.coords.as_slice()
        );
        let projector = RayProjector::new(intrinsic_matrix, pose)
            .ok_or(Error::MalformedIntrinsic)?
            .with_horizon_gate(self.horizon_gate);
        let edges = project_segments(&projector, segments);
        debug!(
            "{} of {} segments reach the ground",
            edges.iter().filter(|edge| !edge.is_degenerate()).count(),
            segments.len()
        );
        Ok(self.rasterizer.rasterize(&edges))
    }
}

fn project_segments(projector: &RayProjector, segments: &[Segment]) -> Vec<Edge> {
    #[cfg(not(feature = "rayon"))]
    {
        segments
            .iter()
            .map(|segment| projector.project_segment(segment))
            .collect()
    }
    #[cfg(feature = "rayon")]
    {
        segments
            .par_iter()
            .map(|segment| projector.project_segment(segment))
            .collect()
    }
}
