//! # edgemap core
//!
//! Common types shared by every crate in the edgemap workspace. This is where the
//! vocabulary of the ground-plane back-projection lives: pixel [`KeyPoint`]s and the
//! [`Segment`]s a line detector produces from them, the [`CameraModel`] trait which
//! turns pixels into normalized image coordinates, the [`Pose`] trait and the
//! [`CameraToVehicle`] extrinsic, and the [`GroundPoint`]/[`Edge`] values that come
//! out the other end.
//!
//! The crate is `#![no_std]` and does not need an allocator. Float math that isn't
//! present in `core` goes through [`num_traits::Float`], backed by `libm`.
//!
//! ## Frames
//!
//! Two coordinate frames are involved:
//!
//! * The camera frame has its origin at the optical center, positive `x` right,
//!   positive `y` down and positive `z` forwards out of the lens.
//! * The vehicle frame has positive `x` forwards, positive `y` to the left and
//!   positive `z` up. The ground is the plane `z = 0`.
//!
//! A [`CameraToVehicle`] maps camera-frame points into the vehicle frame. Its
//! translation is the position of the optical center in the vehicle frame.
//!
//! ```text
//!            camera
//!              O
//!              |\
//!              | \  bearing
//!        t.z   |  \
//!              |   \
//!   ===========+====p=========  z = 0
//!           vehicle origin
//! ```

#![no_std]

mod camera;
mod keypoint;
mod point;
mod pose;
mod segment;

pub use camera::*;
pub use keypoint::*;
pub use nalgebra;
pub use point::*;
pub use pose::*;
pub use segment::*;
