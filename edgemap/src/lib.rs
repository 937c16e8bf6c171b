//! # `edgemap`
//!
//! Maps the straight edges a camera sees onto the ground around the vehicle carrying it.
//!
//! A frame goes through these steps:
//!
//! * [`prepare_frame`] undistorts it, resizes it to the working width and converts it to grayscale
//! * a [`SegmentDetector`] finds straight segments in the working frame
//! * [`draw_segments`] draws them over the working frame for inspection
//! * [`FrameProcessor`] back-projects every segment endpoint onto the plane `z = 0` of the
//!   vehicle frame with a [`RayProjector`] and draws the result with a [`Rasterizer`]
//!
//! [`EdgeMapper`] strings all of that together. The camera pose is read from an
//! [`ExtrinsicSlot`], which can be updated from another thread at any time.
//!
//! Endpoints whose ray does not point down past the horizon gate have no ground point.
//! That is expected for everything at or above the horizon and simply drops the edge.

mod annotate;
mod detector;
mod error;
mod extrinsic;
mod frame;
mod pipeline;
mod projector;
mod raster;
mod settings;
mod undistort;

pub use annotate::*;
pub use detector::*;
pub use edgemap_core::*;
pub use error::*;
pub use extrinsic::*;
pub use frame::*;
pub use pipeline::*;
pub use projector::*;
pub use raster::*;
pub use settings::*;
pub use undistort::*;

/// The pinhole camera model and its distortion.
pub use edgemap_pinhole as pinhole;

/// The bundled line segment detector.
#[cfg(feature = "lsd")]
pub use edgemap_lsd as lsd;
