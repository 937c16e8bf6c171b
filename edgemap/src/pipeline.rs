use crate::{
    draw_segments_with, prepare_frame, EdgeMapSettings, ExtrinsicSlot, FrameProcessor,
    SegmentDetector, TopDownRasterizer,
};
use edgemap_pinhole::{scale_intrinsic_matrix, CameraIntrinsicsDistortion};
use image::{DynamicImage, Rgb, RgbImage};
use log::*;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Everything produced from one camera frame.
#[derive(Debug, Clone)]
pub struct FrameOutput {
    /// The timestamp the frame arrived with.
    pub stamp: Duration,
    /// The working frame with the detected segments drawn on it.
    pub annotated: RgbImage,
    /// The top-down edge map, absent when no pose was available.
    pub edge_map: Option<RgbImage>,
}

/// Runs the whole chain for each frame: undistort and resize, detect segments,
/// back-project them onto the ground and draw the edge map.
///
/// The camera pose lives in an [`ExtrinsicSlot`] that may be shared with whatever
/// keeps it up to date.
pub struct EdgeMapper<D> {
    settings: EdgeMapSettings,
    camera: CameraIntrinsicsDistortion,
    detector: D,
    extrinsic: Arc<ExtrinsicSlot>,
    processor: FrameProcessor<TopDownRasterizer>,
}

impl<D> EdgeMapper<D>
where
    D: SegmentDetector,
{
    pub fn new(settings: EdgeMapSettings, camera: CameraIntrinsicsDistortion, detector: D) -> Self {
        let rasterizer = TopDownRasterizer {
            size: settings.raster_size,
            max_range: settings.max_range,
            color: Rgb(settings.stroke_color),
            thickness: settings.stroke_thickness,
        };
        Self {
            settings,
            camera,
            detector,
            extrinsic: Arc::new(ExtrinsicSlot::new()),
            processor: FrameProcessor::new(rasterizer).with_horizon_gate(settings.horizon_gate),
        }
    }

    /// Reads the pose from `extrinsic` instead of a slot of its own.
    #[must_use]
    pub fn with_extrinsic(self, extrinsic: Arc<ExtrinsicSlot>) -> Self {
        Self { extrinsic, ..self }
    }

    pub fn extrinsic(&self) -> &Arc<ExtrinsicSlot> {
        &self.extrinsic
    }

    pub fn settings(&self) -> &EdgeMapSettings {
        &self.settings
    }

    pub fn camera(&self) -> &CameraIntrinsicsDistortion {
        &self.camera
    }

    /// Processes one raw frame.
    ///
    /// The annotated frame is always produced. The edge map is skipped, with a
    /// warning, when there is no pose yet or the intrinsics cannot be inverted.
    pub fn process_frame(&self, stamp: Duration, image: &DynamicImage) -> FrameOutput {
        let frame = prepare_frame(image, &self.camera, self.settings.working_width);

        let start = Instant::now();
        let segments = self.detector.detect(&frame.gray);
        info!(
            "{}x{} frame, {} segments in {} ms",
            frame.gray.width(),
            frame.gray.height(),
            segments.len(),
            start.elapsed().as_millis()
        );

        let annotated =
            draw_segments_with(&frame.gray, &segments, Rgb(self.settings.segment_color));

        let intrinsic_matrix =
            scale_intrinsic_matrix(&self.camera.intrinsics.matrix(), frame.scale);
        let pose = self.extrinsic.get();
        let edge_map = match self.processor.process(&segments, &intrinsic_matrix, pose) {
            Ok(edge_map) => Some(edge_map),
            Err(e) => {
                warn!("no edge map for frame at {:?}: {}", stamp, e);
                None
            }
        };

        FrameOutput {
            stamp,
            annotated,
            edge_map,
        }
    }
}

#[cfg(feature = "lsd")]
impl EdgeMapper<edgemap_lsd::Lsd> {
    /// Uses the bundled detector configured from `settings.lsd`.
    pub fn with_settings(settings: EdgeMapSettings, camera: CameraIntrinsicsDistortion) -> Self {
        Self::new(settings, camera, settings.lsd)
    }
}
