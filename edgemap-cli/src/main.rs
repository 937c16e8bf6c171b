mod files;

use edgemap::{EdgeMapSettings, EdgeMapper};
use files::{load_camera, read_json, FileError, PoseFile};
use log::*;
use std::path::{Path, PathBuf};
use std::time::{Duration, UNIX_EPOCH};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "edgemap",
    about = "Projects the straight edges in camera images onto the ground and draws them from above"
)]
struct Opt {
    /// The file where settings are specified.
    ///
    /// This is in the format of `edgemap::EdgeMapSettings`. Defaults are used if it is
    /// missing or invalid.
    #[structopt(short, long, default_value = "edgemap-settings.json", parse(from_os_str))]
    settings: PathBuf,
    /// Camera calibration as `{ "k": [9 row-major entries], "d": [k1, k2, p1, p2, k3] }`.
    #[structopt(short, long, parse(from_os_str))]
    camera: PathBuf,
    /// Camera to vehicle pose as `{ "translation": [x, y, z], "rotation": [x, y, z, w] }`.
    ///
    /// The file is read again before every image. Without a valid pose no edge map is written.
    #[structopt(short, long, parse(from_os_str))]
    pose: Option<PathBuf>,
    /// Directory the output images are written to.
    #[structopt(short, long, default_value = ".", parse(from_os_str))]
    output: PathBuf,
    /// List of image files.
    #[structopt(parse(from_os_str))]
    images: Vec<PathBuf>,
}

fn main() {
    pretty_env_logger::init_timed();
    let opt = Opt::from_args();
    if let Err(e) = run(&opt) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run(opt: &Opt) -> Result<(), FileError> {
    let settings = load_settings(&opt.settings);
    let camera = load_camera(&opt.camera)?;
    info!("camera intrinsics {:?}", camera.intrinsics);

    let mapper = EdgeMapper::with_settings(settings, camera);
    let pose = opt.pose.clone().map(|path| PoseFile { path });

    for (index, path) in opt.images.iter().enumerate() {
        if let Some(pose) = &pose {
            mapper.extrinsic().refresh(pose);
        }
        let image = match image::open(path) {
            Ok(image) => image,
            Err(e) => {
                error!("skipping {}: {}", path.display(), e);
                continue;
            }
        };
        let stamp = frame_stamp(path).unwrap_or_else(|| Duration::from_secs(index as u64));
        let output = mapper.process_frame(stamp, &image);

        let stem = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("frame{}", index));
        save(&output.annotated, &opt.output.join(format!("{}_segments.png", stem)));
        if let Some(edge_map) = &output.edge_map {
            save(edge_map, &opt.output.join(format!("{}_edges.png", stem)));
        }
        info!("{} done (stamp {:?})", path.display(), output.stamp);
    }
    Ok(())
}

/// Reads the settings file, falling back to the defaults when it is missing or invalid.
/// Fields left out of the file keep their defaults.
fn load_settings(path: &Path) -> EdgeMapSettings {
    match read_json::<EdgeMapSettings>(path) {
        Ok(settings) => {
            info!("loaded settings from {}", path.display());
            settings
        }
        Err(e) => {
            info!("used default settings ({})", e);
            EdgeMapSettings::default()
        }
    }
}

/// The modification time of the image file, which is when the frame was captured
/// for images dumped straight from a camera.
fn frame_stamp(path: &Path) -> Option<Duration> {
    let modified = std::fs::metadata(path).ok()?.modified().ok()?;
    modified.duration_since(UNIX_EPOCH).ok()
}

fn save(image: &image::RgbImage, path: &Path) {
    if let Err(e) = image.save(path) {
        error!("failed to write {}: {}", path.display(), e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Write;

    fn settings_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn missing_settings_use_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_settings(&dir.path().join("edgemap-settings.json"));
        assert_eq!(settings, EdgeMapSettings::default());
    }

    #[test]
    fn partial_settings_keep_other_defaults() {
        let file = settings_file(r#"{ "working_width": 640, "max_range": 12.5 }"#);
        let settings = load_settings(file.path());
        let defaults = EdgeMapSettings::default();
        assert_eq!(settings.working_width, 640);
        assert_relative_eq!(settings.max_range, 12.5);
        assert_eq!(settings.raster_size, defaults.raster_size);
        assert_eq!(settings.stroke_color, defaults.stroke_color);
        assert_eq!(settings.lsd, defaults.lsd);
    }

    #[test]
    fn invalid_settings_use_defaults() {
        let file = settings_file("{ \"working_width\": ");
        assert_eq!(load_settings(file.path()), EdgeMapSettings::default());
    }
}
