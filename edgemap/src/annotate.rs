use edgemap_core::Segment;
use image::{buffer::ConvertBuffer, GrayImage, Rgb, RgbImage};
use imageproc::drawing::draw_line_segment_mut;

pub const SEGMENT_COLOR: Rgb<u8> = Rgb([255, 0, 0]);

/// The working frame in color with every detected segment drawn on it in red.
pub fn draw_segments(gray: &GrayImage, segments: &[Segment]) -> RgbImage {
    draw_segments_with(gray, segments, SEGMENT_COLOR)
}

/// Like [`draw_segments`] with a custom stroke color.
pub fn draw_segments_with(gray: &GrayImage, segments: &[Segment], color: Rgb<u8>) -> RgbImage {
    let mut annotated: RgbImage = gray.convert();
    for segment in segments {
        let [x1, y1, x2, y2] = segment.xyxy();
        draw_line_segment_mut(
            &mut annotated,
            (x1 as f32, y1 as f32),
            (x2 as f32, y2 as f32),
            color,
        );
    }
    annotated
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn segments_are_drawn_over_gray() {
        let gray = GrayImage::from_pixel(20, 10, Luma([90]));
        let annotated = draw_segments(&gray, &[Segment::from_xyxy([2.0, 5.0, 17.0, 5.0])]);
        assert_eq!(annotated.dimensions(), (20, 10));
        assert_eq!(*annotated.get_pixel(10, 5), SEGMENT_COLOR);
        assert_eq!(*annotated.get_pixel(10, 2), Rgb([90, 90, 90]));
    }
}
