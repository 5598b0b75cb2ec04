//! Hyperslabs: rectangular blocks of voxels which remember where they
//! came from.
use super::data::VoxelData;
use crate::error::{MincError, Result};
use crate::typedef::NumericKind;

/// A block of voxel data tagged with its placement in a volume (`start`),
/// its extent (`count`) and the physical spacing of each axis.
///
/// Operations on a hyperslab carry the tags forward; taking a sub-slab
/// only moves `start`.
#[derive(Debug, Clone, PartialEq)]
pub struct HyperSlab {
    data: VoxelData,
    start: Vec<usize>,
    count: Vec<usize>,
    separations: Vec<f64>,
    dimnames: Vec<String>,
}

impl HyperSlab {
    /// Create a zero-filled hyperslab of the given kind.
    pub fn materialize(
        kind: NumericKind,
        count: &[usize],
        start: &[usize],
        separations: &[f64],
    ) -> Self {
        HyperSlab {
            data: VoxelData::zeros(kind, count),
            start: start.to_vec(),
            count: count.to_vec(),
            separations: separations.to_vec(),
            dimnames: Vec::new(),
        }
    }

    /// Tag existing data as a hyperslab starting at `start`. The count is
    /// the shape of the data.
    ///
    /// # Errors
    ///
    /// - `MincError::IncorrectDims` if `start` or `separations` do not have
    /// one entry per axis of `data`.
    pub fn new<D>(data: D, start: &[usize], separations: &[f64]) -> Result<Self>
    where
        D: Into<VoxelData>,
    {
        let data = data.into();
        let count = data.shape().to_vec();
        if start.len() != count.len() || separations.len() != count.len() {
            return Err(MincError::IncorrectDims(count, start.to_vec()));
        }
        Ok(HyperSlab {
            data,
            start: start.to_vec(),
            count,
            separations: separations.to_vec(),
            dimnames: Vec::new(),
        })
    }

    /// Attach the names of the axes this hyperslab spans.
    pub fn with_dimnames(mut self, dimnames: Vec<String>) -> Self {
        self.dimnames = dimnames;
        self
    }

    /// The voxel data.
    pub fn data(&self) -> &VoxelData {
        &self.data
    }

    /// Mutable access to the voxel data. The shape cannot be changed
    /// through this reference.
    pub fn data_mut(&mut self) -> &mut VoxelData {
        &mut self.data
    }

    /// Discard the tags and keep the voxel data.
    pub fn into_data(self) -> VoxelData {
        self.data
    }

    /// Offset of the first voxel along each axis.
    pub fn start(&self) -> &[usize] {
        &self.start
    }

    /// Number of voxels along each axis.
    pub fn count(&self) -> &[usize] {
        &self.count
    }

    /// Physical spacing along each axis.
    pub fn separations(&self) -> &[f64] {
        &self.separations
    }

    /// Names of the axes, if known.
    pub fn dimnames(&self) -> &[String] {
        &self.dimnames
    }

    /// The kind of the voxel data.
    pub fn kind(&self) -> NumericKind {
        self.data.kind()
    }

    /// Extract a sub-hyperslab. `offset` is relative to this hyperslab;
    /// the result's `start` is relative to the source volume.
    ///
    /// # Errors
    ///
    /// - `MincError::OutOfBounds` if the region does not fit.
    pub fn sub_slab(&self, offset: &[usize], count: &[usize]) -> Result<HyperSlab> {
        let data = self.data.region(offset, count)?;
        let start = self.start.iter().zip(offset).map(|(s, o)| s + o).collect();
        Ok(HyperSlab {
            data,
            start,
            count: count.to_vec(),
            separations: self.separations.clone(),
            dimnames: self.dimnames.clone(),
        })
    }

    /// Convert the data to another kind, keeping the tags.
    pub fn cast(&self, kind: NumericKind) -> HyperSlab {
        HyperSlab {
            data: self.data.cast(kind),
            ..self.clone()
        }
    }

    /// Apply a function to every voxel value, keeping kind and tags.
    pub fn map<F>(&self, f: F) -> HyperSlab
    where
        F: Fn(f64) -> f64,
    {
        HyperSlab {
            data: self.data.map_reals(f),
            start: self.start.clone(),
            count: self.count.clone(),
            separations: self.separations.clone(),
            dimnames: self.dimnames.clone(),
        }
    }

    /// Multiply every voxel value by `factor`.
    pub fn scale(&self, factor: f64) -> HyperSlab {
        self.map(|v| v * factor)
    }
}

#[cfg(test)]
mod tests {
    use super::HyperSlab;
    use crate::typedef::NumericKind;
    use ndarray::Array;

    #[test]
    fn materialize_is_zero_filled() {
        let h = HyperSlab::materialize(NumericKind::Float, &[1, 4, 5], &[3, 0, 0], &[1., 0.5, 2.]);
        assert_eq!(h.data().shape(), &[1, 4, 5]);
        assert_eq!(h.kind(), NumericKind::Float);
        assert_eq!(h.data().min_max(), Some((0., 0.)));
        assert_eq!(h.start(), &[3, 0, 0]);
        assert_eq!(h.count(), &[1, 4, 5]);
    }

    #[test]
    fn sub_slab_moves_start_only() {
        let data = Array::from_shape_vec((2, 4, 5), (0..40).map(f64::from).collect()).unwrap();
        let h = HyperSlab::new(data, &[10, 0, 0], &[1., 0.5, 2.])
            .unwrap()
            .with_dimnames(vec!["zspace".into(), "yspace".into(), "xspace".into()]);
        let s = h.sub_slab(&[1, 2, 0], &[1, 2, 5]).unwrap();
        assert_eq!(s.start(), &[11, 2, 0]);
        assert_eq!(s.count(), &[1, 2, 5]);
        assert_eq!(s.separations(), h.separations());
        assert_eq!(s.dimnames(), h.dimnames());
        assert_eq!(s.data().min_max(), Some((30., 39.)));
        assert!(h.sub_slab(&[1, 3, 0], &[1, 2, 5]).is_err());
    }

    #[test]
    fn arithmetic_keeps_tags() {
        let data = Array::from_elem((1, 2, 2), 3u16);
        let h = HyperSlab::new(data, &[4, 0, 0], &[1., 1., 1.]).unwrap();
        let s = h.scale(2.);
        assert_eq!(s.start(), h.start());
        assert_eq!(s.kind(), NumericKind::UShort);
        assert_eq!(s.data().min_max(), Some((6., 6.)));
        let c = h.cast(NumericKind::Double);
        assert_eq!(c.start(), h.start());
        assert_eq!(c.kind(), NumericKind::Double);
    }

    #[test]
    fn new_checks_tag_lengths() {
        let data = Array::from_elem((2, 2), 1f32);
        assert!(HyperSlab::new(data.clone(), &[0], &[1., 1.]).is_err());
        assert!(HyperSlab::new(data, &[0, 0], &[1.]).is_err());
    }
}
