//! Conversion between voxel and world coordinates.
//!
//! An axis with direction cosines `c`, start `s` and separation `d`
//! contributes `c * (s + v * d)` to the world position of voxel coordinate
//! `v`. Axes without direction cosines (e.g. `vector_dimension`) do not
//! contribute.

use crate::engine::DimensionHandle;
use crate::error::{MincError, Result};
use nalgebra::{Matrix4, Vector3, Vector4};

/// 4x4 matrix mapping homogeneous voxel coordinates to world coordinates.
pub type Affine4 = Matrix4<f64>;

/// Convert a voxel position, with one coordinate per axis, to world
/// coordinates.
pub fn voxel_to_world(dims: &[&DimensionHandle], voxel: &[f64]) -> Result<[f64; 3]> {
    if voxel.len() != dims.len() {
        return Err(MincError::Storage(format!(
            "expected {} voxel coordinates, got {}",
            dims.len(),
            voxel.len()
        )));
    }
    let mut world = Vector3::zeros();
    for (dim, v) in dims.iter().zip(voxel) {
        if let Some(c) = dim.cosines() {
            world += Vector3::from(c) * (dim.start() + v * dim.separation());
        }
    }
    Ok([world.x, world.y, world.z])
}

/// Convert world coordinates to a voxel position with one coordinate per
/// axis. Axes without direction cosines get coordinate 0.
pub fn world_to_voxel(dims: &[&DimensionHandle], world: &[f64]) -> Result<Vec<f64>> {
    if world.len() != 3 {
        return Err(MincError::Storage(format!(
            "expected 3 world coordinates, got {}",
            world.len()
        )));
    }
    let (affine, spatial) = spatial_affine(dims)?;
    let inverse = affine
        .try_inverse()
        .ok_or_else(|| MincError::Storage("voxel to world transform is singular".to_string()))?;
    let v = inverse * Vector4::new(world[0], world[1], world[2], 1.);
    let mut voxel = vec![0.; dims.len()];
    for (j, &i) in spatial.iter().enumerate() {
        voxel[i] = v[j];
    }
    Ok(voxel)
}

/// Build the voxel to world matrix of the three axes carrying direction
/// cosines. Column `j` of the matrix belongs to the `j`-th of those axes,
/// in the order given.
pub fn voxel_to_world_affine(dims: &[&DimensionHandle]) -> Result<Affine4> {
    spatial_affine(dims).map(|(affine, _)| affine)
}

fn spatial_affine(dims: &[&DimensionHandle]) -> Result<(Affine4, Vec<usize>)> {
    let spatial: Vec<(usize, Vector3<f64>)> = dims
        .iter()
        .enumerate()
        .filter_map(|(i, d)| d.cosines().map(|c| (i, Vector3::from(c))))
        .collect();
    if spatial.len() != 3 {
        return Err(MincError::Storage(format!(
            "world transform needs 3 axes with direction cosines, found {}",
            spatial.len()
        )));
    }

    let mut affine = Affine4::identity();
    for (j, (i, c)) in spatial.iter().enumerate() {
        let dim = dims[*i];
        for r in 0..3 {
            affine[(r, j)] = c[r] * dim.separation();
            affine[(r, 3)] += c[r] * dim.start();
        }
    }
    Ok((affine, spatial.into_iter().map(|(i, _)| i).collect()))
}
