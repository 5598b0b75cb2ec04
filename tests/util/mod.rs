//! Fixtures shared by the integration tests. Every container is generated
//! through the public API inside a scratch directory.
#![allow(dead_code)]

use minc::{volume_from_data, NumericKind, VolumeDescription, VolumeOptions};
use ndarray::Array3;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Axis names of the gradient fixture, in file order.
pub const ZYX: [&str; 3] = ["zspace", "yspace", "xspace"];

/// Shape of the gradient fixture.
pub const GRADIENT_SHAPE: (usize, usize, usize) = (12, 20, 30);

pub fn scratch() -> TempDir {
    tempfile::tempdir().unwrap()
}

/// Value at `(z, y, x)` is `100 z + 10 y + x`.
pub fn gradient(shape: (usize, usize, usize)) -> Array3<f64> {
    Array3::from_shape_fn(shape, |(z, y, x)| (100 * z + 10 * y + x) as f64)
}

pub fn gradient_description(volume_type: NumericKind) -> VolumeDescription {
    VolumeDescription::new(&ZYX)
        .starts(&[-10., -20., -30.])
        .steps(&[2., 1., 0.5])
        .volume_type(volume_type)
}

/// Write `data` to `dir/name` with the gradient calibration, and return
/// the path of the new file.
pub fn write_volume(dir: &Path, name: &str, data: Array3<f64>, volume_type: NumericKind) -> PathBuf {
    let path = dir.join(name);
    let mut volume = volume_from_data(
        &path,
        data,
        &gradient_description(volume_type),
        &VolumeOptions::new(),
    )
    .unwrap();
    volume.write_file().unwrap();
    assert!(!volume.is_open());
    path
}

/// Write the gradient fixture as doubles.
pub fn write_gradient(dir: &Path) -> PathBuf {
    write_volume(dir, "gradient.mnc", gradient(GRADIENT_SHAPE), NumericKind::Double)
}
