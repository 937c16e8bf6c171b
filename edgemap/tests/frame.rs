use edgemap::nalgebra::{Matrix3, UnitQuaternion, Vector3};
use edgemap::{
    CameraToVehicle, Edge, Error, FrameProcessor, Pose, Rasterizer, Segment, TopDownRasterizer,
};
use image::Rgb;
use std::f64::consts::{FRAC_PI_2, PI};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counts how often it is asked to draw and how many edges it got.
#[derive(Default)]
struct CountingRasterizer {
    calls: AtomicUsize,
}

impl Rasterizer for CountingRasterizer {
    type Output = Vec<Edge>;

    fn rasterize(&self, edges: &[Edge]) -> Vec<Edge> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        edges.to_vec()
    }
}

fn intrinsics() -> Matrix3<f64> {
    Matrix3::new(500.0, 0.0, 400.0, 0.0, 500.0, 300.0, 0.0, 0.0, 1.0)
}

fn nadir() -> CameraToVehicle {
    let down = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), PI);
    let turn = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), -FRAC_PI_2);
    CameraToVehicle::from_translation_quaternion(Vector3::new(0.0, 0.0, 1.2), turn * down)
}

fn segments() -> Vec<Segment> {
    vec![
        Segment::from_xyxy([100.0, 100.0, 700.0, 120.0]),
        Segment::from_xyxy([400.0, 0.0, 400.0, 600.0]),
        Segment::from_xyxy([10.0, 590.0, 790.0, 10.0]),
    ]
}

#[test]
fn absent_pose_skips_rasterizer() {
    let processor = FrameProcessor::new(CountingRasterizer::default());
    let result = processor.process(&segments(), &intrinsics(), None);
    assert_eq!(result.unwrap_err(), Error::UninitializedPose);
    assert_eq!(processor.rasterizer.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn singular_intrinsics_skip_rasterizer() {
    let processor = FrameProcessor::new(CountingRasterizer::default());
    let mut k = intrinsics();
    k[(0, 0)] = 0.0;
    let result = processor.process(&segments(), &k, Some(nadir()));
    assert_eq!(result.unwrap_err(), Error::MalformedIntrinsic);
    assert_eq!(processor.rasterizer.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn every_segment_becomes_an_edge() {
    let processor = FrameProcessor::new(CountingRasterizer::default());
    let edges = processor
        .process(&segments(), &intrinsics(), Some(nadir()))
        .unwrap();
    assert_eq!(processor.rasterizer.calls.load(Ordering::SeqCst), 1);
    assert_eq!(edges.len(), 3);
    // Looking straight down everything reaches the ground.
    assert!(edges.iter().all(|edge| !edge.is_degenerate()));
    for edge in &edges {
        let (start, end) = edge.endpoints().unwrap();
        assert_eq!(start.z, 0.0);
        assert_eq!(end.z, 0.0);
    }
}

#[test]
fn edges_keep_segment_order() {
    let processor = FrameProcessor::new(CountingRasterizer::default());
    let edges = processor
        .process(&segments(), &intrinsics(), Some(nadir()))
        .unwrap();
    // The vertical image segment runs along the vehicle x axis.
    let (start, end) = edges[1].endpoints().unwrap();
    assert!(start.x > end.x);
    assert!(start.y.abs() < 1e-9 && end.y.abs() < 1e-9);
}

#[test]
fn empty_frame_gives_black_raster() {
    let processor = FrameProcessor::new(TopDownRasterizer::new(300, 10.0));
    let image = processor
        .process(&[], &intrinsics(), Some(nadir()))
        .unwrap();
    assert_eq!(image.dimensions(), (300, 300));
    assert!(image.pixels().all(|p| *p == Rgb([0, 0, 0])));
}

#[test]
fn strict_gate_drops_everything() {
    // Nothing points further down than straight down.
    let processor = FrameProcessor::new(CountingRasterizer::default()).with_horizon_gate(-1.5);
    let edges = processor
        .process(&segments(), &intrinsics(), Some(nadir()))
        .unwrap();
    assert!(edges.iter().all(Edge::is_degenerate));
}
