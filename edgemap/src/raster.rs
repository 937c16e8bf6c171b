use edgemap_core::{Edge, GroundPoint};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_line_segment_mut;
use log::*;

/// Turns the projected edges of one frame into an output value.
pub trait Rasterizer {
    type Output;

    fn rasterize(&self, edges: &[Edge]) -> Self::Output;
}

/// Draws edges into a square bird's-eye raster.
///
/// The vehicle origin sits at the middle of the bottom row, `x` (forwards) points up
/// and `y` (left) points left. `max_range` on the ground spans half the raster, so
/// twice that distance fits ahead of the vehicle and `max_range` to either side.
///
/// ```
/// use edgemap::TopDownRasterizer;
/// use edgemap::GroundPoint;
///
/// let rasterizer = TopDownRasterizer::new(800, 20.0);
/// assert_eq!(rasterizer.to_pixel(GroundPoint::new(0.0, 0.0)), (400.0, 800.0));
/// assert_eq!(rasterizer.to_pixel(GroundPoint::new(20.0, 20.0)), (0.0, 400.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TopDownRasterizer {
    /// Width and height of the raster in pixels.
    pub size: u32,
    /// Ground distance covered by half the raster.
    pub max_range: f64,
    pub color: Rgb<u8>,
    /// Stroke width in pixels.
    pub thickness: u32,
}

impl Default for TopDownRasterizer {
    fn default() -> Self {
        Self::new(800, 20.0)
    }
}

impl TopDownRasterizer {
    /// Yellow strokes two pixels wide.
    pub fn new(size: u32, max_range: f64) -> Self {
        Self {
            size,
            max_range,
            color: Rgb([255, 255, 0]),
            thickness: 2,
        }
    }

    /// Raster `(column, row)` of a ground point. It may lie outside the raster.
    pub fn to_pixel(&self, point: GroundPoint) -> (f64, f64) {
        let half = f64::from(self.size / 2);
        let column = -point.y / self.max_range * half + half;
        let row = -point.x / self.max_range * half + 2.0 * half;
        (column, row)
    }

    fn draw_stroke(&self, image: &mut RgbImage, start: (f64, f64), end: (f64, f64)) {
        let margin = f64::from(self.thickness) + 1.0;
        let high = f64::from(self.size) + margin;
        let (start, end) = match clip(start, end, -margin, high) {
            Some(clipped) => clipped,
            None => return,
        };
        let thickness = self.thickness.max(1) as i32;
        let steep = (end.1 - start.1).abs() > (end.0 - start.0).abs();
        for i in 0..thickness {
            // Parallel passes offset across the line's minor axis.
            let offset = f64::from(i - (thickness - 1) / 2);
            let (dx, dy) = if steep { (offset, 0.0) } else { (0.0, offset) };
            draw_line_segment_mut(
                image,
                ((start.0 + dx) as f32, (start.1 + dy) as f32),
                ((end.0 + dx) as f32, (end.1 + dy) as f32),
                self.color,
            );
        }
    }
}

impl Rasterizer for TopDownRasterizer {
    type Output = RgbImage;

    /// Draws every edge with two ground endpoints in order. Degenerate edges are skipped.
    fn rasterize(&self, edges: &[Edge]) -> RgbImage {
        let mut image = RgbImage::new(self.size, self.size);
        let mut drawn = 0;
        for (start, end) in edges.iter().filter_map(Edge::endpoints) {
            self.draw_stroke(&mut image, self.to_pixel(start), self.to_pixel(end));
            drawn += 1;
        }
        trace!("drew {} of {} edges", drawn, edges.len());
        image
    }
}

/// Clips a segment to the square `[low, high]` on both axes (Liang-Barsky).
fn clip(
    start: (f64, f64),
    end: (f64, f64),
    low: f64,
    high: f64,
) -> Option<((f64, f64), (f64, f64))> {
    if ![start.0, start.1, end.0, end.1].iter().all(|v| v.is_finite()) {
        return None;
    }
    let (dx, dy) = (end.0 - start.0, end.1 - start.1);
    let mut t0 = 0.0f64;
    let mut t1 = 1.0f64;
    for (p, q) in [
        (-dx, start.0 - low),
        (dx, high - start.0),
        (-dy, start.1 - low),
        (dy, high - start.1),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else {
            let t = q / p;
            if p < 0.0 {
                t0 = t0.max(t);
            } else {
                t1 = t1.min(t);
            }
        }
    }
    if t0 > t1 {
        return None;
    }
    Some((
        (start.0 + t0 * dx, start.1 + t0 * dy),
        (start.0 + t1 * dx, start.1 + t1 * dy),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_edge_is_vertical_stroke() {
        let rasterizer = TopDownRasterizer::new(100, 10.0);
        let edge = Edge::new(
            Some(GroundPoint::new(2.0, 0.0)),
            Some(GroundPoint::new(8.0, 0.0)),
        );
        let image = rasterizer.rasterize(&[edge]);
        // x = 2 is row 90 and x = 8 is row 60, both in column 50.
        assert_eq!(*image.get_pixel(50, 75), Rgb([255, 255, 0]));
        assert_eq!(*image.get_pixel(51, 75), Rgb([255, 255, 0]));
        assert_eq!(*image.get_pixel(53, 75), Rgb([0, 0, 0]));
        assert_eq!(*image.get_pixel(50, 50), Rgb([0, 0, 0]));
    }

    #[test]
    fn far_edges_are_clipped() {
        let rasterizer = TopDownRasterizer::new(64, 5.0);
        let edge = Edge::new(
            Some(GroundPoint::new(-1.0, 0.0)),
            Some(GroundPoint::new(1.0e9, 0.0)),
        );
        let image = rasterizer.rasterize(&[edge]);
        assert_eq!(*image.get_pixel(32, 0), rasterizer.color);
        assert_eq!(*image.get_pixel(32, 63), rasterizer.color);
    }

    #[test]
    fn clipping_keeps_inner_segments() {
        assert_eq!(
            clip((1.0, 1.0), (3.0, 4.0), 0.0, 10.0),
            Some(((1.0, 1.0), (3.0, 4.0)))
        );
        assert_eq!(clip((-5.0, -5.0), (-1.0, 20.0), 0.0, 10.0), None);
        assert_eq!(
            clip((-10.0, 5.0), (30.0, 5.0), 0.0, 10.0),
            Some(((0.0, 5.0), (10.0, 5.0)))
        );
    }
}
