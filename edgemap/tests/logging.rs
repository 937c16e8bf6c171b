use edgemap::nalgebra::{Matrix3, UnitQuaternion, Vector3};
use edgemap::{CameraToVehicle, FrameProcessor, Pose, Segment, TopDownRasterizer};
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::sync::Mutex;

/// Keeps every info message so the test can look at what a frame logged.
struct Recorder {
    lines: Mutex<Vec<String>>,
}

impl Log for Recorder {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Info
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            self.lines.lock().unwrap().push(record.args().to_string());
        }
    }

    fn flush(&self) {}
}

static RECORDER: Recorder = Recorder {
    lines: Mutex::new(Vec::new()),
};

fn transform_lines() -> Vec<String> {
    RECORDER
        .lines
        .lock()
        .unwrap()
        .iter()
        .filter(|line| line.starts_with("transform:"))
        .cloned()
        .collect()
}

#[test]
fn processed_frames_log_their_pose() {
    log::set_logger(&RECORDER).unwrap();
    log::set_max_level(LevelFilter::Info);

    let processor = FrameProcessor::new(TopDownRasterizer::default());
    let k = Matrix3::new(500.0, 0.0, 400.0, 0.0, 500.0, 300.0, 0.0, 0.0, 1.0);
    let segments = [Segment::from_xyxy([100.0, 500.0, 700.0, 500.0])];

    assert!(processor.process(&segments, &k, None).is_err());
    assert!(transform_lines().is_empty());

    let pose = CameraToVehicle::from_translation_quaternion(
        Vector3::new(0.5, -0.25, 1.5),
        UnitQuaternion::identity(),
    );
    processor.process(&segments, &k, Some(pose)).unwrap();
    assert_eq!(
        transform_lines(),
        vec!["transform: [0.5, -0.25, 1.5] [0.0, 0.0, 0.0, 1.0]".to_owned()]
    );
}
