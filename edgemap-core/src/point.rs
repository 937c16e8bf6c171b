use derive_more::{AsRef, Deref, Into};
use nalgebra::{Point2, Point3};

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// A point on the ground plane of the vehicle frame.
///
/// The `z` component is always exactly `0.0`. The only way to construct one is
/// through its planar coordinates, so the invariant cannot be broken from outside.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, AsRef, Deref, Into)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct GroundPoint(Point3<f64>);

impl GroundPoint {
    /// `x` is forwards and `y` is to the left, both in the units of the pose translation.
    pub fn new(x: f64, y: f64) -> Self {
        Self(Point3::new(x, y, 0.0))
    }

    pub fn point(self) -> Point3<f64> {
        self.0
    }

    pub fn planar(self) -> Point2<f64> {
        self.0.xy()
    }
}

/// The projection of one image [`Segment`](crate::Segment) onto the ground.
///
/// An endpoint is `None` when its ray does not hit the ground in front of the camera.
/// Such edges are degenerate and consumers must skip them as a whole.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Edge {
    pub start: Option<GroundPoint>,
    pub end: Option<GroundPoint>,
}

impl Edge {
    pub fn new(start: Option<GroundPoint>, end: Option<GroundPoint>) -> Self {
        Self { start, end }
    }

    /// Both endpoints, or `None` if either of them is degenerate.
    ///
    /// ```
    /// use edgemap_core::{Edge, GroundPoint};
    /// let a = GroundPoint::new(1.0, 0.5);
    /// let b = GroundPoint::new(2.0, -0.5);
    /// assert_eq!(Edge::new(Some(a), Some(b)).endpoints(), Some((a, b)));
    /// assert_eq!(Edge::new(Some(a), None).endpoints(), None);
    /// ```
    pub fn endpoints(&self) -> Option<(GroundPoint, GroundPoint)> {
        Some((self.start?, self.end?))
    }

    pub fn is_degenerate(&self) -> bool {
        self.endpoints().is_none()
    }
}
