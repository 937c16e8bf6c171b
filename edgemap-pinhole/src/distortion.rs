use edgemap_core::nalgebra::Point2;

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// Iterations OpenCV's `undistortPoints` runs when no termination criteria are given.
pub const DEFAULT_UNDISTORT_ITERATIONS: usize = 5;

/// The plumb-bob lens distortion model (Brown-Conrady with three radial and two
/// tangential coefficients). This is the five element `D` vector of a ROS `CameraInfo`.
///
/// Given normalized image coordinates $(x, y)$ and $r^2 = x^2 + y^2$ the distorted
/// coordinates are
///
/// $$
/// \begin{aligned}
/// x' &= x (1 + k_1 r^2 + k_2 r^4 + k_3 r^6) + 2 p_1 x y + p_2 (r^2 + 2 x^2) \\\\
/// y' &= y (1 + k_1 r^2 + k_2 r^4 + k_3 r^6) + p_1 (r^2 + 2 y^2) + 2 p_2 x y
/// \end{aligned}
/// $$
#[derive(Debug, Default, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Distortion {
    pub k1: f64,
    pub k2: f64,
    pub p1: f64,
    pub p2: f64,
    pub k3: f64,
}

impl Distortion {
    /// Reads the coefficients in `k1, k2, p1, p2, k3` order.
    ///
    /// Missing trailing coefficients are zero and anything past the fifth is ignored.
    pub fn from_coefficients(coefficients: &[f64]) -> Self {
        let get = |ix: usize| coefficients.get(ix).copied().unwrap_or(0.0);
        Self {
            k1: get(0),
            k2: get(1),
            p1: get(2),
            p2: get(3),
            k3: get(4),
        }
    }

    pub fn coefficients(&self) -> [f64; 5] {
        [self.k1, self.k2, self.p1, self.p2, self.k3]
    }

    pub fn is_identity(&self) -> bool {
        self.coefficients().iter().all(|&c| c == 0.0)
    }

    fn radial(&self, r2: f64) -> f64 {
        1.0 + ((self.k3 * r2 + self.k2) * r2 + self.k1) * r2
    }

    fn tangential(&self, x: f64, y: f64, r2: f64) -> (f64, f64) {
        (
            2.0 * self.p1 * x * y + self.p2 * (r2 + 2.0 * x * x),
            self.p1 * (r2 + 2.0 * y * y) + 2.0 * self.p2 * x * y,
        )
    }

    /// Applies the distortion to an undistorted normalized point.
    pub fn distort(&self, point: Point2<f64>) -> Point2<f64> {
        let (x, y) = (point.x, point.y);
        let r2 = x * x + y * y;
        let radial = self.radial(r2);
        let (dx, dy) = self.tangential(x, y, r2);
        Point2::new(x * radial + dx, y * radial + dy)
    }

    /// Removes the distortion from a distorted normalized point.
    ///
    /// See [`Distortion::undistort_iterations`].
    pub fn undistort(&self, point: Point2<f64>) -> Point2<f64> {
        self.undistort_iterations(point, DEFAULT_UNDISTORT_ITERATIONS)
    }

    /// Removes the distortion with a fixed-point iteration seeded at the distorted point.
    ///
    /// The model has no closed form inverse. Each step subtracts the tangential term and
    /// divides out the radial term evaluated at the current estimate. If the radial term
    /// stops being positive the lens model has been left and the distorted point is
    /// returned unchanged.
    pub fn undistort_iterations(&self, point: Point2<f64>, iterations: usize) -> Point2<f64> {
        if self.is_identity() {
            return point;
        }
        let (x0, y0) = (point.x, point.y);
        let (mut x, mut y) = (x0, y0);
        for _ in 0..iterations {
            let r2 = x * x + y * y;
            let radial = self.radial(r2);
            if radial.is_nan() || radial <= 0.0 {
                return point;
            }
            let (dx, dy) = self.tangential(x, y, r2);
            x = (x0 - dx) / radial;
            y = (y0 - dy) / radial;
        }
        Point2::new(x, y)
    }
}
