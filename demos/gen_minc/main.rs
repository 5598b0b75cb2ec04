//! An application for writing a MINC file from scratch

use minc::{volume_from_data, NumericKind, VolumeDescription, VolumeOptions};
use std::env;

fn main() {
    let mut args = env::args().skip(1);
    let filename = args.next().expect("Path to MINC file is required");

    // generate some test data 64x128x128 float32: a centred ball
    let data = ndarray::Array3::<f32>::from_shape_fn((64, 128, 128), |(z, y, x)| {
        let (dz, dy, dx) = (z as f32 - 32., y as f32 - 64., x as f32 - 64.);
        (1000. - (dz * dz + dy * dy + dx * dx)).max(0.)
    });

    let description = VolumeDescription::new(&["zspace", "yspace", "xspace"])
        .starts(&[-64., -128., -64.])
        .steps(&[2., 2., 1.])
        .volume_type(NumericKind::Float);
    let mut volume = volume_from_data(&filename, data, &description, &VolumeOptions::new())
        .expect("Failed to create MINC file");
    volume
        .append_history("gen_minc: synthetic ball")
        .expect("Failed to write history");
    volume.write_file().expect("Failed to write MINC file");
}
