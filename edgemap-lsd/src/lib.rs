//! A line segment detector in the spirit of LSD.
//!
//! Pixels with a strong gradient are grouped into line-support regions by
//! growing from the strongest seeds over 8-connected neighbours whose gradient
//! orientation agrees with the seed. Each region that is large enough and
//! coherent enough is fitted with a segment along its principal axis.
//!
//! ```
//! use edgemap_lsd::Lsd;
//! use image::{GrayImage, Luma};
//!
//! let image = GrayImage::from_fn(64, 64, |x, _| Luma([if x < 32 { 0 } else { 255 }]));
//! let segments = Lsd::default().detect(&image);
//! assert_eq!(segments.len(), 1);
//! ```

mod gradient;
mod region;

use core::cmp::Reverse;
use edgemap_core::Segment;
use float_ord::FloatOrd;
use gradient::{orientation_difference, Gradient};
use image::GrayImage;
use log::*;
use region::Region;

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

const NEIGHBOURS: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Configuration of the line segment detector.
///
/// The gradient magnitude is normalized so that a full black to white step
/// edge has magnitude `1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde-serialize", serde(default))]
pub struct Lsd {
    /// Pixels with a weaker normalized gradient never join a region.
    pub magnitude_threshold: f32,
    /// Largest orientation difference (degrees) between a pixel and its region seed.
    pub angle_tolerance_deg: f32,
    /// Segments shorter than this (pixels) are discarded.
    pub min_length: f64,
    /// Regions with fewer pixels are discarded.
    pub min_region_size: usize,
    /// Fraction of region pixels within half the angle tolerance of the seed.
    pub min_aligned_fraction: f64,
    /// Standard deviation of the Gaussian applied before taking gradients.
    pub blur_sigma: Option<f32>,
}

impl Default for Lsd {
    fn default() -> Self {
        Self {
            magnitude_threshold: 0.03,
            angle_tolerance_deg: 22.5,
            min_length: 10.0,
            min_region_size: 12,
            min_aligned_fraction: 0.6,
            blur_sigma: Some(0.6),
        }
    }
}

impl Lsd {
    /// Builds a detector with the given magnitude threshold and defaults elsewhere.
    pub fn new(magnitude_threshold: f32) -> Self {
        Self {
            magnitude_threshold,
            ..Default::default()
        }
    }

    /// Detects straight segments in `image`.
    ///
    /// Segment endpoints are in pixel coordinates of `image`.
    pub fn detect(&self, image: &GrayImage) -> Vec<Segment> {
        let gradient = match self.blur_sigma {
            Some(sigma) if sigma > 0.0 => {
                Gradient::new(&imageproc::filter::gaussian_blur_f32(image, sigma))
            }
            _ => Gradient::new(image),
        };
        let segments = Extractor::new(&gradient, self).extract();
        debug!(
            "found {} segments in {}x{} image",
            segments.len(),
            image.width(),
            image.height()
        );
        segments
    }
}

struct Extractor<'a> {
    gradient: &'a Gradient,
    options: &'a Lsd,
    angle_tolerance: f32,
    used: Vec<bool>,
    stack: Vec<usize>,
    region: Region,
}

impl<'a> Extractor<'a> {
    fn new(gradient: &'a Gradient, options: &'a Lsd) -> Self {
        Self {
            gradient,
            options,
            angle_tolerance: options.angle_tolerance_deg.to_radians(),
            used: vec![false; gradient.len()],
            stack: Vec::with_capacity(64),
            region: Region::default(),
        }
    }

    fn extract(mut self) -> Vec<Segment> {
        let threshold = self.options.magnitude_threshold;
        let mut seeds: Vec<usize> = (0..self.gradient.len())
            .filter(|&idx| self.gradient.magnitude(idx) >= threshold)
            .collect();
        // Strongest first; the sort is stable so ties keep raster order.
        seeds.sort_by_key(|&idx| Reverse(FloatOrd(self.gradient.magnitude(idx))));
        trace!("{} seed pixels above {}", seeds.len(), threshold);

        let mut segments = Vec::new();
        for seed in seeds {
            if self.used[seed] {
                continue;
            }
            self.grow(seed);
            if let Some(segment) = self.accept() {
                segments.push(segment);
            }
        }
        segments
    }

    fn grow(&mut self, seed: usize) {
        let width = self.gradient.width;
        let height = self.gradient.height;
        let seed_angle = self.gradient.orientation(seed);
        let half_tolerance = 0.5 * self.angle_tolerance;

        self.region.reset();
        self.stack.clear();
        self.used[seed] = true;
        self.stack.push(seed);

        while let Some(idx) = self.stack.pop() {
            let angle = self.gradient.orientation(idx);
            let aligned = orientation_difference(angle, seed_angle) <= half_tolerance;
            self.region.push(idx, width, aligned);

            let x = (idx % width) as isize;
            let y = (idx / width) as isize;
            for (dx, dy) in NEIGHBOURS {
                let (xn, yn) = (x + dx, y + dy);
                if xn < 0 || yn < 0 || xn >= width as isize || yn >= height as isize {
                    continue;
                }
                let neighbour = yn as usize * width + xn as usize;
                if self.used[neighbour]
                    || self.gradient.magnitude(neighbour) < self.options.magnitude_threshold
                {
                    continue;
                }
                let neighbour_angle = self.gradient.orientation(neighbour);
                if orientation_difference(neighbour_angle, seed_angle) <= self.angle_tolerance {
                    self.used[neighbour] = true;
                    self.stack.push(neighbour);
                }
            }
        }
    }

    /// Pixels of a rejected region stay claimed, so no later seed regrows them.
    fn accept(&self) -> Option<Segment> {
        if self.region.len() < self.options.min_region_size {
            return None;
        }
        if self.region.aligned_fraction() < self.options.min_aligned_fraction {
            return None;
        }
        self.region.fit(self.gradient.width, self.options.min_length)
    }
}
