use crate::KeyPoint;
use num_traits::Float;

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// A straight edge segment found in an image, given by its two pixel endpoints.
///
/// Segments are ephemeral: they are produced once per detected edge per frame and
/// dropped once the frame has been projected.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Segment {
    pub start: KeyPoint,
    pub end: KeyPoint,
}

impl Segment {
    pub fn new(start: KeyPoint, end: KeyPoint) -> Self {
        Self { start, end }
    }

    /// Creates a segment from the `(x1, y1, x2, y2)` layout most line detectors emit.
    ///
    /// ```
    /// use edgemap_core::Segment;
    /// let segment = Segment::from_xyxy([1.0, 2.0, 3.0, 4.0]);
    /// assert_eq!(segment.start.x, 1.0);
    /// assert_eq!(segment.end.y, 4.0);
    /// assert_eq!(segment.xyxy(), [1.0, 2.0, 3.0, 4.0]);
    /// ```
    pub fn from_xyxy([x1, y1, x2, y2]: [f64; 4]) -> Self {
        Self::new(KeyPoint::new(x1, y1), KeyPoint::new(x2, y2))
    }

    pub fn xyxy(&self) -> [f64; 4] {
        [self.start.x, self.start.y, self.end.x, self.end.y]
    }

    /// Euclidean length in pixels.
    pub fn length(&self) -> f64 {
        let delta = self.end.0 - self.start.0;
        Float::sqrt(delta.norm_squared())
    }
}

impl From<[f64; 4]> for Segment {
    fn from(xyxy: [f64; 4]) -> Self {
        Self::from_xyxy(xyxy)
    }
}
