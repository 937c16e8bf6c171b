use edgemap_core::Segment;
use image::GrayImage;

/// Finds straight edge segments in a grayscale image.
///
/// Endpoints are in pixel coordinates of the image that was passed in.
pub trait SegmentDetector {
    fn detect(&self, image: &GrayImage) -> Vec<Segment>;
}

impl<D> SegmentDetector for &D
where
    D: SegmentDetector + ?Sized,
{
    fn detect(&self, image: &GrayImage) -> Vec<Segment> {
        (**self).detect(image)
    }
}

#[cfg(feature = "lsd")]
impl SegmentDetector for edgemap_lsd::Lsd {
    fn detect(&self, image: &GrayImage) -> Vec<Segment> {
        edgemap_lsd::Lsd::detect(self, image)
    }
}
