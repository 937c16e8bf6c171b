use image::GrayImage;
use imageproc::gradients::{horizontal_sobel, vertical_sobel};
use std::f32::consts::PI;

/// Largest response a 3x3 Sobel kernel gives on an 8-bit step edge.
const SOBEL_FULL_SCALE: f32 = 4.0 * 255.0;

/// Per-pixel Sobel gradients, normalized so that a full black to white step
/// has a magnitude of `1.0`.
#[derive(Debug, Clone)]
pub(crate) struct Gradient {
    pub width: usize,
    pub height: usize,
    gx: Vec<f32>,
    gy: Vec<f32>,
    magnitude: Vec<f32>,
}

impl Gradient {
    pub fn new(image: &GrayImage) -> Self {
        let width = image.width() as usize;
        let height = image.height() as usize;
        let gx: Vec<f32> = horizontal_sobel(image)
            .pixels()
            .map(|p| f32::from(p[0]) / SOBEL_FULL_SCALE)
            .collect();
        let gy: Vec<f32> = vertical_sobel(image)
            .pixels()
            .map(|p| f32::from(p[0]) / SOBEL_FULL_SCALE)
            .collect();
        let magnitude = gx
            .iter()
            .zip(&gy)
            .map(|(&x, &y)| (x * x + y * y).sqrt())
            .collect();
        Self {
            width,
            height,
            gx,
            gy,
            magnitude,
        }
    }

    pub fn len(&self) -> usize {
        self.width * self.height
    }

    pub fn magnitude(&self, idx: usize) -> f32 {
        self.magnitude[idx]
    }

    /// Gradient orientation folded into `[0, pi)`, so both polarities of an edge agree.
    pub fn orientation(&self, idx: usize) -> f32 {
        self.gy[idx].atan2(self.gx[idx]).rem_euclid(PI)
    }
}

/// Smallest difference between two orientations in `[0, pi)`.
pub(crate) fn orientation_difference(a: f32, b: f32) -> f32 {
    let diff = (a - b).abs();
    diff.min(PI - diff)
}
