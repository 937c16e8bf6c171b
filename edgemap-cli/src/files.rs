use edgemap::pinhole::{CameraIntrinsics, CameraIntrinsicsDistortion, Distortion};
use edgemap::{CameraToVehicle, PoseSample, PoseSource};
use serde::{de::DeserializeOwned, Deserialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FileError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("{path}: intrinsic matrix has {len} entries, expected 9")]
    IntrinsicLength { path: PathBuf, len: usize },
    #[error("{path}: intrinsic matrix is not invertible")]
    SingularIntrinsic { path: PathBuf },
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, FileError> {
    let file = File::open(path).map_err(|source| FileError::Io {
        path: path.to_owned(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| FileError::Json {
        path: path.to_owned(),
        source,
    })
}

/// The `K` and `D` arrays of a `CameraInfo` message.
#[derive(Debug, Clone, Deserialize)]
pub struct CameraFile {
    /// Row-major intrinsic matrix.
    pub k: Vec<f64>,
    /// Plumb-bob coefficients `k1, k2, p1, p2, k3`.
    #[serde(default)]
    pub d: Vec<f64>,
}

impl CameraFile {
    pub fn camera(&self, path: &Path) -> Result<CameraIntrinsicsDistortion, FileError> {
        let k: [f64; 9] = self.k.as_slice().try_into().map_err(|_| FileError::IntrinsicLength {
            path: path.to_owned(),
            len: self.k.len(),
        })?;
        let intrinsics = CameraIntrinsics::from_row_major(k);
        if !intrinsics.is_invertible() {
            return Err(FileError::SingularIntrinsic {
                path: path.to_owned(),
            });
        }
        Ok(CameraIntrinsicsDistortion::new(
            intrinsics,
            Distortion::from_coefficients(&self.d),
        ))
    }
}

pub fn load_camera(path: &Path) -> Result<CameraIntrinsicsDistortion, FileError> {
    read_json::<CameraFile>(path)?.camera(path)
}

/// A pose sample in a JSON file that is read again on every lookup, so it can be
/// edited or replaced while frames are being processed.
#[derive(Debug, Clone)]
pub struct PoseFile {
    pub path: PathBuf,
}

impl PoseSource for PoseFile {
    fn lookup(&self) -> Result<CameraToVehicle, edgemap::Error> {
        read_json::<PoseSample>(&self.path)
            .map_err(|e| edgemap::Error::PoseLookup(e.to_string()))?
            .to_pose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use edgemap::Pose;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn json_file(contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn camera_file_with_short_distortion() {
        let file = json_file(r#"{ "k": [500, 0, 400, 0, 510, 300, 0, 0, 1], "d": [-0.2, 0.05] }"#);
        let camera = load_camera(file.path()).unwrap();
        assert_relative_eq!(camera.intrinsics.focals.x, 500.0);
        assert_relative_eq!(camera.intrinsics.focals.y, 510.0);
        assert_relative_eq!(camera.intrinsics.principal_point.x, 400.0);
        assert_relative_eq!(camera.intrinsics.principal_point.y, 300.0);
        assert_eq!(camera.distortion.coefficients(), [-0.2, 0.05, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn camera_file_needs_nine_entries() {
        let file = json_file(r#"{ "k": [500, 0, 400] }"#);
        assert!(matches!(
            load_camera(file.path()),
            Err(FileError::IntrinsicLength { len: 3, .. })
        ));
    }

    #[test]
    fn singular_camera_file_is_rejected() {
        let file = json_file(r#"{ "k": [0, 0, 400, 0, 0, 300, 0, 0, 1] }"#);
        assert!(matches!(
            load_camera(file.path()),
            Err(FileError::SingularIntrinsic { .. })
        ));
    }

    #[test]
    fn temporary_files_are_removed_on_drop() {
        let file = json_file(r#"{ "k": [500, 0, 400, 0, 510, 300, 0, 0, 1] }"#);
        let path = file.path().to_owned();
        assert!(load_camera(&path).is_ok());
        drop(file);
        assert!(!path.exists());
        assert!(matches!(load_camera(&path), Err(FileError::Io { .. })));
    }

    #[test]
    fn pose_file_is_reread() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pose.json");
        std::fs::write(
            &path,
            r#"{ "translation": [0, 0, 1.5], "rotation": [0, 0, 0, 1] }"#,
        )
        .unwrap();
        let source = PoseFile { path: path.clone() };
        assert_eq!(source.lookup().unwrap().translation().z, 1.5);

        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(source.lookup(), Err(edgemap::Error::PoseLookup(_))));

        std::fs::remove_file(&path).unwrap();
        assert!(matches!(source.lookup(), Err(edgemap::Error::PoseLookup(_))));
    }
}
