//! An application for printing the axes, types, ranges and history of a
//! MINC file.

use minc::{volume_from_file, VolumeOptions};
use std::env;

fn main() {
    let mut args = env::args().skip(1);
    let filename = args.next().expect("Path to MINC file is required");
    let volume = volume_from_file(&filename, true, &VolumeOptions::new())
        .expect("Failed to open MINC file");

    println!("file: {}", volume.path().display());
    if let Some(kind) = volume.volume_type() {
        println!("image: {} ({} bytes per voxel)", kind, kind.size_of());
    }
    println!("dimensions:");
    for dim in volume.dimensions().handles() {
        println!(
            "    {:<16} size {:>5}  start {:>10.4}  step {:>8.4}",
            dim.name(),
            dim.size(),
            dim.start(),
            dim.separation()
        );
    }
    for axis in &["xspace", "yspace", "zspace"] {
        if let Some(c) = volume.direction_cosines(axis) {
            println!("{} cosines: {:?}", axis, c);
        }
    }
    match volume.valid_range() {
        Ok((min, max)) => println!("valid range: [{}, {}]", min, max),
        Err(e) => println!("valid range: {}", e),
    }
    if let Ok(scaled) = volume.is_slice_scaled() {
        println!("slice scaling: {}", scaled);
    }
    println!("history:\n{}", volume.history());
}
