//! Conversion between the voxel and world coordinates of a volume.
//!
//! An open volume asks its container, which knows the calibration stored
//! on disk. A closed volume falls back to its own dimension set.
use crate::affine::{self, Affine4};
use crate::error::Result;
use crate::volume::Volume;

impl Volume {
    /// Convert a voxel position, with one coordinate per axis in apparent
    /// order, to world coordinates.
    ///
    /// # Errors
    ///
    /// - `MincError::Storage` if `voxel` does not have one coordinate per
    /// axis.
    pub fn convert_voxel_to_world(&self, voxel: &[f64]) -> Result<[f64; 3]> {
        match self.container() {
            Some(container) => container.voxel_to_world(voxel),
            None => {
                let dims: Vec<_> = self.dimensions().handles().iter().collect();
                affine::voxel_to_world(&dims, voxel)
            }
        }
    }

    /// Convert world coordinates to a voxel position with one coordinate
    /// per axis in apparent order.
    ///
    /// # Errors
    ///
    /// - `MincError::Storage` if `world` does not hold three coordinates
    /// or the volume has no three axes with direction cosines.
    pub fn convert_world_to_voxel(&self, world: &[f64]) -> Result<Vec<f64>> {
        match self.container() {
            Some(container) => container.world_to_voxel(world),
            None => {
                let dims: Vec<_> = self.dimensions().handles().iter().collect();
                affine::world_to_voxel(&dims, world)
            }
        }
    }

    /// The 4x4 voxel to world matrix over the three spatial axes.
    pub fn affine(&self) -> Result<Affine4> {
        self.dimensions().affine()
    }
}

#[cfg(test)]
mod tests {
    use crate::dimension::{DimensionSet, DirectionCosines};
    use crate::engine::FileEngine;
    use crate::options::VolumeOptions;
    use crate::volume::Volume;
    use approx::assert_abs_diff_eq;

    #[test]
    fn closed_volume_uses_its_dimensions() {
        let mut volume = Volume::new("unused.mnc", true, &VolumeOptions::new());
        let dims = DimensionSet::describe(
            &FileEngine,
            &["zspace", "yspace", "xspace"],
            &[4, 5, 6],
            &[10., 20., 30.],
            &[2., 1., 0.5],
            DirectionCosines::default(),
        )
        .unwrap();
        volume.set_dimensions(dims);
        assert!(!volume.is_open());

        let world = volume.convert_voxel_to_world(&[1., 2., 4.]).unwrap();
        assert_abs_diff_eq!(&world[..], &[32., 22., 12.][..]);
        let voxel = volume.convert_world_to_voxel(&world).unwrap();
        assert_abs_diff_eq!(&voxel[..], &[1., 2., 4.][..], epsilon = 1e-12);
        assert!(volume.convert_voxel_to_world(&[1.]).is_err());

        let affine = volume.affine().unwrap();
        assert_abs_diff_eq!(affine[(0, 3)], 30.);
        assert_abs_diff_eq!(affine[(2, 0)], 2.);
    }
}
