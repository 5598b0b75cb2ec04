//! The storage engine API.
//!
//! Volumes never touch files directly. Every container operation goes
//! through the [`Engine`] and [`Container`] traits, which mirror the
//! primitives of the MINC2 library: opening and creating containers,
//! querying and declaring dimensions, hyperslab transfer, range and
//! attribute bookkeeping, and coordinate conversion. [`FileEngine`] is the
//! implementation used by default.
//!
//! [`Engine`]: ./trait.Engine.html
//! [`Container`]: ./trait.Container.html
//! [`FileEngine`]: ./file/struct.FileEngine.html

pub mod file;
pub use self::file::FileEngine;

use crate::error::Result;
use crate::typedef::{DimClass, DimOrder, NumericKind, OpenMode, SPATIAL_DIMENSIONS};
use crate::volume::data::VoxelData;
use std::fmt;
use std::path::Path;

/// Attribute path of the image variable, which holds the `complete` flag.
pub const IMAGE_ATTR_PATH: &str = "/minc-2.0/image/0/image";

/// Attribute path of the root group, which holds the `history` attribute.
pub const ROOT_ATTR_PATH: &str = "/minc-2.0";

/// A string attribute of a container.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    /// Absolute path of the group or variable holding the attribute.
    pub path: String,
    /// Attribute name.
    pub name: String,
    /// Attribute value.
    pub value: String,
}

/// Descriptor of a single axis, as handed out by a storage engine.
///
/// A handle is owned by exactly one dimension set or container. It does not
/// implement `Clone`; use [`Engine::copy_dimension`] to obtain an
/// independent duplicate.
///
/// [`Engine::copy_dimension`]: ./trait.Engine.html#tymethod.copy_dimension
#[derive(Debug, PartialEq)]
pub struct DimensionHandle {
    name: String,
    class: DimClass,
    size: usize,
    start: f64,
    separation: f64,
    cosines: Option<[f64; 3]>,
}

impl DimensionHandle {
    /// Create a regularly sampled axis with start 0 and separation 1.
    /// The three world axes receive their default direction cosines.
    pub fn new(name: &str, class: DimClass, size: usize) -> Self {
        let cosines = SPATIAL_DIMENSIONS
            .iter()
            .position(|n| *n == name)
            .filter(|_| class == DimClass::Spatial)
            .map(|i| {
                let mut c = [0.; 3];
                c[i] = 1.;
                c
            });
        DimensionHandle {
            name: name.to_string(),
            class,
            size,
            start: 0.,
            separation: 1.,
            cosines,
        }
    }

    /// Axis name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Axis class.
    pub fn class(&self) -> DimClass {
        self.class
    }

    /// Number of voxels along this axis.
    pub fn size(&self) -> usize {
        self.size
    }

    /// World coordinate of the first voxel.
    pub fn start(&self) -> f64 {
        self.start
    }

    /// Distance between two voxels.
    pub fn separation(&self) -> f64 {
        self.separation
    }

    /// Direction cosines, for axes which have them.
    pub fn cosines(&self) -> Option<[f64; 3]> {
        self.cosines
    }

    /// Set the world coordinate of the first voxel.
    pub fn set_start(&mut self, start: f64) {
        self.start = start;
    }

    /// Set the distance between two voxels.
    pub fn set_separation(&mut self, separation: f64) {
        self.separation = separation;
    }

    /// Set the direction cosines.
    pub fn set_cosines(&mut self, cosines: [f64; 3]) {
        self.cosines = Some(cosines);
    }

    pub(crate) fn duplicate(&self) -> DimensionHandle {
        DimensionHandle {
            name: self.name.clone(),
            class: self.class,
            size: self.size,
            start: self.start,
            separation: self.separation,
            cosines: self.cosines,
        }
    }
}

/// A storage engine: the factory of containers and dimension handles.
pub trait Engine: fmt::Debug + Send + Sync {
    /// Open an existing container.
    fn open(&self, path: &Path, mode: OpenMode) -> Result<Box<dyn Container>>;

    /// Create a new container on disk with the given axes (in file order)
    /// and on-disk voxel type. The image itself is not allocated.
    fn create(
        &self,
        path: &Path,
        dims: &[DimensionHandle],
        kind: NumericKind,
    ) -> Result<Box<dyn Container>>;

    /// Create a new, regularly sampled axis.
    fn create_dimension(&self, name: &str, class: DimClass, size: usize) -> Result<DimensionHandle>;

    /// Duplicate an axis into a new, independently owned handle.
    fn copy_dimension(&self, dim: &DimensionHandle) -> Result<DimensionHandle>;

    /// Version string of the engine, in `major.minor.patch` form.
    fn version(&self) -> String;
}

/// An open container. Hyperslab positions and dimension queries in
/// `DimOrder::Apparent` follow the apparent dimension order.
pub trait Container: fmt::Debug + Send {
    /// Path of the underlying file.
    fn path(&self) -> &Path;

    /// On-disk type code of the image.
    fn data_type(&self) -> Result<i32>;

    /// Number of axes.
    fn dimension_count(&self) -> Result<usize>;

    /// Duplicates of the container's axes in the requested order.
    fn dimensions(&self, order: DimOrder) -> Result<Vec<DimensionHandle>>;

    /// Set the apparent order of the axes by name.
    fn set_apparent_dimension_order(&mut self, names: &[String]) -> Result<()>;

    /// Allocate the image.
    fn create_image(&mut self) -> Result<()>;

    /// Whether the image has been allocated.
    fn has_image(&self) -> bool;

    /// Read real voxel values, converted to `kind`.
    fn read_hyperslab(
        &self,
        kind: NumericKind,
        start: &[usize],
        count: &[usize],
    ) -> Result<VoxelData>;

    /// Read voxel values, mapping reals in `[min, max]` linearly onto the
    /// full range of the integer kind `kind`.
    fn read_hyperslab_normalized(
        &self,
        kind: NumericKind,
        start: &[usize],
        count: &[usize],
        min: f64,
        max: f64,
    ) -> Result<VoxelData>;

    /// Write real voxel values. The extent is the shape of `data`.
    fn write_hyperslab(&mut self, start: &[usize], data: &VoxelData) -> Result<()>;

    /// Declared range of real values, as `(min, max)`.
    fn volume_range(&self) -> Result<(f64, f64)>;

    /// Declare the range of real values.
    fn set_volume_range(&mut self, min: f64, max: f64) -> Result<()>;

    /// Declared range of stored voxel values, as `(min, max)`.
    fn valid_range(&self) -> Result<(f64, f64)>;

    /// Declare the range of stored voxel values.
    fn set_valid_range(&mut self, min: f64, max: f64) -> Result<()>;

    /// Whether the image is scaled slice by slice.
    fn slice_scaling(&self) -> Result<bool>;

    /// Turn slice scaling on or off.
    fn set_slice_scaling(&mut self, flag: bool) -> Result<()>;

    /// The history attribute. Fails if the attribute is absent.
    fn history(&self) -> Result<String>;

    /// Replace the history attribute.
    fn set_history(&mut self, history: &str) -> Result<()>;

    /// All attributes at `path` or below it.
    fn attributes(&self, path: &str) -> Result<Vec<Attribute>>;

    /// Set an attribute through the public interface, with `group`
    /// relative to the container root (e.g. `"image"`).
    fn set_attr_values(&mut self, group: &str, name: &str, value: &str) -> Result<()>;

    /// Set an attribute at an absolute path.
    fn set_attribute(&mut self, path: &str, name: &str, value: &str) -> Result<()>;

    /// Copy the attributes at `path` or below it into `dest`.
    fn copy_attributes(&self, path: &str, dest: &mut dyn Container) -> Result<()> {
        for attr in self.attributes(path)? {
            dest.set_attribute(&attr.path, &attr.name, &attr.value)?;
        }
        Ok(())
    }

    /// Convert voxel coordinates (one per axis) to world coordinates.
    fn voxel_to_world(&self, voxel: &[f64]) -> Result<[f64; 3]>;

    /// Convert world coordinates to voxel coordinates (one per axis).
    fn world_to_voxel(&self, world: &[f64]) -> Result<Vec<f64>>;

    /// Release the container, flushing pending changes.
    fn close(self: Box<Self>) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::DimensionHandle;
    use crate::typedef::DimClass;

    #[test]
    fn default_cosines() {
        let y = DimensionHandle::new("yspace", DimClass::Spatial, 4);
        assert_eq!(y.cosines(), Some([0., 1., 0.]));
        let v = DimensionHandle::new("vector_dimension", DimClass::Record, 3);
        assert_eq!(v.cosines(), None);
        let t = DimensionHandle::new("time", DimClass::Time, 3);
        assert_eq!(t.cosines(), None);
    }

    #[test]
    fn duplicate_is_equal_but_distinct() {
        let mut x = DimensionHandle::new("xspace", DimClass::Spatial, 4);
        x.set_start(-10.);
        x.set_separation(0.5);
        let mut d = x.duplicate();
        assert_eq!(d, x);
        d.set_start(3.);
        assert_eq!(x.start(), -10.);
    }
}
