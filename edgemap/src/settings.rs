#[cfg(feature = "lsd")]
use edgemap_lsd::Lsd;

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// The settings for turning camera frames into edge maps.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct EdgeMapSettings {
    /// Width in pixels the frame is resized to before detection. The height keeps the aspect ratio.
    #[cfg_attr(
        feature = "serde-serialize",
        serde(default = "default_working_width")
    )]
    pub working_width: u32,
    /// Width and height of the top-down edge map.
    #[cfg_attr(feature = "serde-serialize", serde(default = "default_raster_size"))]
    pub raster_size: u32,
    /// Ground distance covered by half the edge map.
    #[cfg_attr(feature = "serde-serialize", serde(default = "default_max_range"))]
    pub max_range: f64,
    /// Rays whose vehicle-frame bearing has a larger `z` are treated as missing the ground.
    #[cfg_attr(feature = "serde-serialize", serde(default = "default_horizon_gate"))]
    pub horizon_gate: f64,
    /// Width of the edge map strokes in pixels.
    #[cfg_attr(
        feature = "serde-serialize",
        serde(default = "default_stroke_thickness")
    )]
    pub stroke_thickness: u32,
    #[cfg_attr(feature = "serde-serialize", serde(default = "default_stroke_color"))]
    pub stroke_color: [u8; 3],
    /// Color of the segments drawn on the annotated working frame.
    #[cfg_attr(
        feature = "serde-serialize",
        serde(default = "default_segment_color")
    )]
    pub segment_color: [u8; 3],
    /// Options of the bundled line segment detector.
    #[cfg(feature = "lsd")]
    #[cfg_attr(feature = "serde-serialize", serde(default))]
    pub lsd: Lsd,
}

impl Default for EdgeMapSettings {
    fn default() -> Self {
        Self {
            working_width: default_working_width(),
            raster_size: default_raster_size(),
            max_range: default_max_range(),
            horizon_gate: default_horizon_gate(),
            stroke_thickness: default_stroke_thickness(),
            stroke_color: default_stroke_color(),
            segment_color: default_segment_color(),
            #[cfg(feature = "lsd")]
            lsd: Lsd::default(),
        }
    }
}

fn default_working_width() -> u32 {
    800
}

fn default_raster_size() -> u32 {
    800
}

fn default_max_range() -> f64 {
    20.0
}

fn default_horizon_gate() -> f64 {
    crate::DEFAULT_HORIZON_GATE
}

fn default_stroke_thickness() -> u32 {
    2
}

fn default_stroke_color() -> [u8; 3] {
    [255, 255, 0]
}

fn default_segment_color() -> [u8; 3] {
    crate::SEGMENT_COLOR.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{draw_segments, draw_segments_with, SEGMENT_COLOR};
    use edgemap_core::Segment;
    use image::{GrayImage, Rgb};

    #[test]
    fn default_segment_color_matches_annotation() {
        assert_eq!(EdgeMapSettings::default().segment_color, SEGMENT_COLOR.0);

        let gray = GrayImage::new(20, 20);
        let segments = [Segment::from_xyxy([2.0, 10.0, 17.0, 10.0])];
        let configured = Rgb(EdgeMapSettings::default().segment_color);
        assert_eq!(
            draw_segments_with(&gray, &segments, configured),
            draw_segments(&gray, &segments)
        );
    }
}
