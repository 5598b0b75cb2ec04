//! This module defines the volume API: a MINC volume bound to its
//! container, with lazily loaded voxel data and hyperslab access.
//!
//! A [`Volume`] moves through a small number of states. It is either
//! opened from an existing container or described from scratch and given
//! a new container; the image of the container is then allocated on
//! demand, data may be loaded into memory and modified, and finally the
//! volume is written and closed. Closing is idempotent and also happens
//! when the volume is dropped.
//!
//! [`Volume`]: ./struct.Volume.html

pub mod data;
pub mod element;
pub mod hyperslab;
pub(crate) mod util;

pub use self::data::VoxelData;
pub use self::element::DataElement;
pub use self::hyperslab::HyperSlab;

use self::util::check_region;
use crate::dimension::{DimensionSet, DirectionCosines};
use crate::engine::{Container, Engine, IMAGE_ATTR_PATH};
use crate::error::{MincError, Result};
use crate::options::VolumeOptions;
use crate::typedef::{NumericKind, OpenMode};
use chrono::Local;
use std::env;
use std::fs;
use std::io::ErrorKind as IoErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Oldest engine version whose public attribute primitive can set the
/// `complete` flag of the image.
// TODO: replace with the first libminc release that ships the fix for
// setting image:complete through miset_attr_values (3ca3425, June 2016)
pub const ATTR_VALUES_MIN_VERSION: (u32, u32, u32) = (3, 5, 99);

macro_rules! vol_debug {
    ($vol: expr, $($arg: tt)+) => {
        if $vol.debug {
            debug!($($arg)+);
        }
    };
}

/// A MINC volume.
#[derive(Debug)]
pub struct Volume {
    path: PathBuf,
    engine: Arc<dyn Engine>,
    handle: Option<Box<dyn Container>>,
    dims: DimensionSet,
    /// working type of the in-memory array
    dtype: Option<NumericKind>,
    /// type of the image on disk
    volume_type: Option<NumericKind>,
    data: Option<VoxelData>,
    data_loadable: bool,
    readonly: bool,
    labels: bool,
    history: String,
    history_updated: bool,
    data_written: bool,
    /// the container was created by this volume
    created: bool,
    debug: bool,
}

impl Volume {
    /// Open the volume stored at `path`.
    ///
    /// The working type is taken from `options` if set. Otherwise it is
    /// `f64`, or for label volumes an unsigned integer type at least as
    /// wide as the type on disk.
    ///
    /// # Errors
    ///
    /// - `MincError::Open` if the container cannot be opened.
    /// - `MincError::UnsupportedType` if the type on disk is unknown.
    /// - `MincError::DirectionCosinesUnavailable` if one of the three
    /// world axes is missing.
    pub fn open<P: AsRef<Path>>(path: P, readonly: bool, options: &VolumeOptions) -> Result<Self> {
        let mut volume = Volume::new(path, readonly, options);
        volume.open_file()?;
        Ok(volume)
    }

    /// Create an unopened volume bound to `path`.
    pub(crate) fn new<P: AsRef<Path>>(path: P, readonly: bool, options: &VolumeOptions) -> Self {
        Volume {
            path: path.as_ref().to_path_buf(),
            engine: Arc::clone(options.get_engine()),
            handle: None,
            dims: DimensionSet::default(),
            dtype: options.get_dtype(),
            volume_type: None,
            data: None,
            data_loadable: false,
            readonly,
            labels: options.is_labels(),
            history: String::new(),
            history_updated: false,
            data_written: false,
            created: false,
            debug: options.is_debug(),
        }
    }

    fn open_file(&mut self) -> Result<()> {
        let mode = if self.readonly {
            OpenMode::Read
        } else {
            OpenMode::ReadWrite
        };
        let handle = self
            .engine
            .open(&self.path, mode)
            .map_err(|e| MincError::Open(self.path.clone(), Box::new(e)))?;
        let header = read_header(&*handle);
        self.handle = Some(handle);
        let (volume_type, mut dims, history, has_image) = header?;

        vol_debug!(self, path = %self.path.display(), %volume_type, "type of the image on disk");
        self.volume_type = Some(volume_type);
        if self.dtype.is_none() {
            self.dtype = Some(if self.labels {
                volume_type.label_kind()
            } else {
                NumericKind::Double
            });
        }
        vol_debug!(
            self,
            sizes = ?dims.sizes(),
            separations = ?dims.separations(),
            starts = ?dims.starts(),
            dimnames = ?dims.names(),
            "dimensions"
        );

        self.history = match history {
            Ok(h) if h.is_empty() || h.ends_with('\n') => h,
            Ok(h) => h + "\n",
            Err(e) => {
                vol_debug!(self, "no history attribute: {}", e);
                String::new()
            }
        };
        dims.load_cosines()?;
        self.dims = dims;
        self.data_loadable = has_image;
        Ok(())
    }

    /// Give the volume a new container on disk with its current dimensions.
    ///
    /// # Errors
    ///
    /// - `MincError::VolumeTypeUndetermined` if neither `volume_type` nor
    /// the volume itself determine the type on disk.
    pub(crate) fn create_handle(&mut self, volume_type: Option<NumericKind>) -> Result<()> {
        let kind = volume_type
            .or(self.volume_type)
            .ok_or(MincError::VolumeTypeUndetermined)?;
        let handle = self
            .engine
            .create(&self.path, self.dims.handles(), kind)
            .map_err(|e| MincError::Open(self.path.clone(), Box::new(e)))?;
        vol_debug!(self, path = %self.path.display(), sizes = ?self.dims.sizes(), "created container");
        self.volume_type = Some(kind);
        self.handle = Some(handle);
        self.created = true;
        Ok(())
    }

    pub(crate) fn set_dimensions(&mut self, dims: DimensionSet) {
        self.dims = dims;
    }

    pub(crate) fn set_dtype(&mut self, dtype: NumericKind) {
        self.dtype = Some(dtype);
    }

    pub(crate) fn set_history(&mut self, history: &str) {
        self.history = history.to_string();
    }

    /// Allocate the image of the container.
    pub fn create_image(&mut self) -> Result<()> {
        self.check_writable()?;
        self.handle_mut()?.create_image()?;
        self.data_loadable = true;
        Ok(())
    }

    fn handle(&self) -> Result<&(dyn Container + 'static)> {
        match self.handle.as_deref() {
            Some(handle) => Ok(handle),
            None => Err(not_open(&self.path)),
        }
    }

    fn handle_mut(&mut self) -> Result<&mut (dyn Container + 'static)> {
        match self.handle.as_deref_mut() {
            Some(handle) => Ok(handle),
            None => Err(not_open(&self.path)),
        }
    }

    fn check_writable(&self) -> Result<()> {
        if self.readonly {
            Err(MincError::ReadOnly(self.path.clone()))
        } else {
            Ok(())
        }
    }

    fn working_type(&self) -> NumericKind {
        self.dtype.unwrap_or(NumericKind::Double)
    }

    /// The voxel data, loaded into memory on first access.
    ///
    /// # Errors
    ///
    /// - `MincError::NoData` if the volume has no dimensions.
    pub fn data(&mut self) -> Result<&VoxelData> {
        self.ensure_loaded()?;
        self.data.as_ref().ok_or(MincError::NoData)
    }

    /// Mutable access to the voxel data, loaded into memory on first
    /// access.
    pub fn data_mut(&mut self) -> Result<&mut VoxelData> {
        self.ensure_loaded()?;
        self.data.as_mut().ok_or(MincError::NoData)
    }

    /// The voxel data, if it is loaded in memory.
    pub fn loaded_data(&self) -> Option<&VoxelData> {
        self.data.as_ref()
    }

    fn ensure_loaded(&mut self) -> Result<()> {
        if self.dims.is_empty() {
            return Err(MincError::NoData);
        }
        if self.data.is_none() {
            self.load_data()?;
        }
        Ok(())
    }

    /// Replace the voxel data. The array is converted to the working type.
    ///
    /// # Errors
    ///
    /// - `MincError::IncorrectDims` if the shape of `data` is not the
    /// shape of the volume.
    pub fn set_data<D: Into<VoxelData>>(&mut self, data: D) -> Result<()> {
        let data = data.into();
        let sizes = self.dims.sizes();
        if data.shape() != &sizes[..] {
            vol_debug!(self, shape = ?data.shape(), ?sizes, "shape mismatch");
            return Err(MincError::IncorrectDims(sizes, data.shape().to_vec()));
        }
        let dtype = *self.dtype.get_or_insert(data.kind());
        self.data = Some(data.into_kind(dtype));
        vol_debug!(self, %dtype, "data set");
        Ok(())
    }

    /// Load the whole image into memory. A volume that is still being
    /// built, with no container or a container it created itself, gets a
    /// zero-filled array instead.
    ///
    /// # Errors
    ///
    /// - `MincError::NoData` if the volume has no dimensions, or if a
    /// container opened from disk has no image.
    pub fn load_data(&mut self) -> Result<()> {
        let dtype = self.working_type();
        let sizes = self.dims.sizes();
        let under_construction = self.handle.is_none() || self.created;
        let data = if self.data_loadable {
            self.read_container(dtype, &vec![0; sizes.len()], &sizes)?
        } else if under_construction && !sizes.is_empty() {
            VoxelData::zeros(dtype, &sizes)
        } else {
            return Err(MincError::NoData);
        };
        self.data = Some(data);
        Ok(())
    }

    fn read_container(&self, kind: NumericKind, start: &[usize], count: &[usize]) -> Result<VoxelData> {
        if !self.data_loadable {
            return Err(MincError::NoData);
        }
        vol_debug!(self, ?start, ?count, %kind, "reading hyperslab");
        let handle = self.handle()?;
        match kind.range() {
            None => handle.read_hyperslab(kind, start, count),
            Some((min, max)) => handle.read_hyperslab_normalized(kind, start, count, min, max),
        }
    }

    /// Read a hyperslab of the volume as values of `kind`, or of the
    /// working type if `kind` is `None`.
    ///
    /// If the data is loaded in memory, the hyperslab is cut from it, which
    /// is only supported for floating point kinds. Otherwise it is read
    /// from the container: floating point kinds receive real values, and
    /// integer kinds receive real values normalized into their range.
    ///
    /// # Errors
    ///
    /// - `MincError::OutOfBounds` if the region does not fit the volume.
    /// - `MincError::NotImplemented` if the data is loaded and `kind` is an
    /// integer kind.
    /// - `MincError::NoData` if the data is not loaded and the image was not
    /// created.
    pub fn get_hyperslab(
        &self,
        start: &[usize],
        count: &[usize],
        kind: Option<NumericKind>,
    ) -> Result<HyperSlab> {
        let kind = kind.unwrap_or_else(|| self.working_type());
        check_region(start, count, &self.dims.sizes())?;
        let data = match &self.data {
            Some(loaded) => {
                if !kind.is_float() {
                    return Err(MincError::NotImplemented(
                        "integer hyperslab from data loaded in memory",
                    ));
                }
                loaded.region(start, count)?.into_kind(kind)
            }
            None => self.read_container(kind, start, count)?,
        };
        Ok(HyperSlab::new(data, start, &self.dims.separations())?.with_dimnames(self.dims.names()))
    }

    /// Write a hyperslab at the position it is tagged with.
    pub fn set_hyperslab(&mut self, slab: &HyperSlab) -> Result<()> {
        self.set_hyperslab_at(slab.data(), slab.start())
    }

    /// Write `data` into the region of the volume starting at `start`.
    ///
    /// If the data is loaded in memory, only the in-memory array is
    /// modified. Otherwise the values go straight to the container, after
    /// the ranges of the container have been widened to hold them; this
    /// path only accepts floating point data.
    ///
    /// # Errors
    ///
    /// - `MincError::ReadOnly` if the volume was opened read-only.
    /// - `MincError::OutOfBounds` if the region does not fit the volume.
    /// - `MincError::NotImplemented` for integer data which would be
    /// written straight to the container.
    /// - `MincError::LabelRangeViolation` if label values do not fit the
    /// type on disk.
    pub fn set_hyperslab_at(&mut self, data: &VoxelData, start: &[usize]) -> Result<()> {
        self.check_writable()?;
        check_region(start, data.shape(), &self.dims.sizes())?;
        if !self.data_loadable {
            self.create_image()?;
        }
        if let Some(loaded) = self.data.as_mut() {
            return loaded.assign_region(start, data);
        }
        if !data.kind().is_float() {
            return Err(MincError::NotImplemented(
                "writing a hyperslab of integer values to the container",
            ));
        }
        self.set_volume_ranges(data)?;
        vol_debug!(self, ?start, count = ?data.shape(), "writing hyperslab");
        self.handle_mut()?.write_hyperslab(start, data)?;
        self.data_written = true;
        Ok(())
    }

    /// Set the volume range and valid range of the container so that
    /// `data` can be stored with the best precision.
    ///
    /// The volume range is the range of `data` if it covers the whole
    /// volume, and otherwise the union of that range with the current
    /// volume range. The valid range is the full range of the type on
    /// disk, or the volume range for floating point types. For label
    /// volumes both ranges are the range of `data`.
    ///
    /// # Errors
    ///
    /// - `MincError::LabelRangeViolation` if label values do not fit the
    /// type on disk.
    pub fn set_volume_ranges(&mut self, data: &VoxelData) -> Result<()> {
        let volume_type = self.volume_type.ok_or(MincError::VolumeTypeUndetermined)?;
        let (dmin, dmax) = data.min_max().ok_or(MincError::NoData)?;
        let covers_volume = data.len() == self.dims.voxel_count();
        let labels = self.labels;

        let handle = self.handle_mut()?;
        let (min, max) = if covers_volume {
            (dmin, dmax)
        } else {
            let (cmin, cmax) = handle.volume_range()?;
            (dmin.min(cmin), dmax.max(cmax))
        };
        let (vmin, vmax) = volume_type.range().unwrap_or((min, max));
        let (vmin, vmax) = if labels {
            if max > vmax || min < vmin {
                return Err(MincError::LabelRangeViolation(min, max, volume_type));
            }
            (min, max)
        } else {
            (vmin, vmax)
        };
        handle.set_volume_range(min, max)?;
        handle.set_valid_range(vmin, vmax)?;
        Ok(())
    }

    /// Write the loaded data to the container, mark the image as complete
    /// and close the volume.
    ///
    /// A default history entry is added first unless the history was
    /// already extended through this volume. If no data is loaded, nothing
    /// else happens: the image is not marked complete and the volume stays
    /// open.
    ///
    /// # Errors
    ///
    /// - `MincError::ReadOnly` if the volume was opened read-only.
    /// - `MincError::NoDataType` if the working type is unknown.
    pub fn write_file(&mut self) -> Result<()> {
        self.check_writable()?;
        if !self.history_updated {
            let entry = format!(
                "{} >>> (default history added after minc usage) {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                env::args().collect::<Vec<_>>().join(" ")
            );
            self.append_history(&entry)?;
        }
        if !self.data_loadable {
            self.create_image()?;
        }
        if let Some(data) = self.data.take() {
            let written = self.write_loaded(&data);
            self.data = Some(data);
            written?;
            self.mark_image_complete()?;
            self.close()?;
        }
        Ok(())
    }

    fn write_loaded(&mut self, data: &VoxelData) -> Result<()> {
        if self.dtype.is_none() {
            return Err(MincError::NoDataType);
        }
        self.set_volume_ranges(data)?;
        vol_debug!(self, path = %self.path.display(), "writing volume");
        let start = vec![0; data.ndim()];
        self.handle_mut()?.write_hyperslab(&start, data)?;
        self.data_written = true;
        Ok(())
    }

    fn mark_image_complete(&mut self) -> Result<()> {
        let attr_values = supports_attr_values(&self.engine.version());
        let handle = match self.handle.as_deref_mut() {
            Some(handle) => handle,
            None => return Err(not_open(&self.path)),
        };
        if attr_values {
            handle.set_attr_values("image", "complete", "true")
        } else {
            if let Err(e) = handle.set_attribute(IMAGE_ATTR_PATH, "complete", "true") {
                warn!(
                    path = %self.path.display(),
                    "could not set the image:complete flag although the data was written: {}",
                    e
                );
            }
            Ok(())
        }
    }

    /// Close the volume. The container created by this volume is removed
    /// if no data was ever written to it. Closing again does nothing.
    pub fn close(&mut self) -> Result<()> {
        let handle = match self.handle.take() {
            Some(handle) => handle,
            None => return Ok(()),
        };
        self.data_loadable = false;
        let closed = handle.close();
        let removed = if self.created && !self.readonly && !self.data_written {
            vol_debug!(self, path = %self.path.display(), "removing container without data");
            match fs::remove_file(&self.path) {
                Err(ref e) if e.kind() == IoErrorKind::NotFound => Ok(()),
                r => r.map_err(MincError::from),
            }
        } else {
            Ok(())
        };
        closed.and(removed)
    }

    /// Whether the volume still holds its container.
    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    /// Append an entry to the history and write it to the container.
    pub fn append_history(&mut self, entry: &str) -> Result<()> {
        self.check_writable()?;
        vol_debug!(self, entry, "adding to history");
        let mut history = self.history.clone();
        history.push_str(entry);
        if !history.ends_with('\n') {
            history.push('\n');
        }
        self.handle_mut()?.set_history(&history)?;
        self.history = history;
        self.history_updated = true;
        Ok(())
    }

    /// The history of the volume.
    pub fn history(&self) -> &str {
        &self.history
    }

    /// Copy the attributes at `path` or below it from `other`.
    pub fn copy_attributes(&mut self, other: &Volume, path: &str) -> Result<()> {
        self.check_writable()?;
        let source = other.handle()?;
        source.copy_attributes(path, self.handle_mut()?)
    }

    /// Change the order in which the axes are traversed. One-letter names
    /// stand for the world axes (`"x"` is `"xspace"`). Loaded data is
    /// permuted to the new order.
    pub fn set_apparent_dimension_order<S: AsRef<str>>(&mut self, names: &[S]) -> Result<()> {
        let names: Vec<String> = names
            .iter()
            .map(|n| {
                let n = n.as_ref();
                if n.len() == 1 {
                    format!("{}space", n)
                } else {
                    n.to_string()
                }
            })
            .collect();
        let old = self.dims.names();
        let cosines = *self.dims.cosines();
        let handle = self.handle_mut()?;
        handle.set_apparent_dimension_order(&names)?;
        let dims = DimensionSet::from_container(handle)?.with_cosines(cosines);

        if let Some(data) = self.data.take() {
            let perm: Option<Vec<usize>> = dims
                .names()
                .iter()
                .map(|n| old.iter().position(|o| o == n))
                .collect();
            match perm {
                Some(perm) => self.data = Some(data.permuted(&perm)),
                None => {
                    self.data = Some(data);
                    return Err(MincError::Storage(
                        "apparent order does not match the loaded data".to_string(),
                    ));
                }
            }
        }
        self.dims = dims;
        Ok(())
    }

    /// The declared range of real values. With slice scaling the range is
    /// computed from the data instead, loading it if needed.
    pub fn volume_range(&mut self) -> Result<(f64, f64)> {
        if self.is_slice_scaled()? {
            vol_debug!(self, "slice scaling is on, using the range of the data");
            return self.data()?.min_max().ok_or(MincError::NoData);
        }
        self.handle()?.volume_range()
    }

    /// Declare the range of real values.
    pub fn set_volume_range(&mut self, min: f64, max: f64) -> Result<()> {
        self.check_writable()?;
        self.handle_mut()?.set_volume_range(min, max)
    }

    /// The declared range of stored voxel values.
    pub fn valid_range(&self) -> Result<(f64, f64)> {
        self.handle()?.valid_range()
    }

    /// Declare the range of stored voxel values.
    pub fn set_valid_range(&mut self, min: f64, max: f64) -> Result<()> {
        self.check_writable()?;
        self.handle_mut()?.set_valid_range(min, max)
    }

    /// Whether the image is scaled slice by slice.
    pub fn is_slice_scaled(&self) -> Result<bool> {
        self.handle()?.slice_scaling()
    }

    /// The dimensions of the volume.
    pub fn dimensions(&self) -> &DimensionSet {
        &self.dims
    }

    /// Number of axes.
    pub fn ndims(&self) -> usize {
        self.dims.len()
    }

    /// Number of voxels along each axis.
    pub fn sizes(&self) -> Vec<usize> {
        self.dims.sizes()
    }

    /// World coordinate of the first voxel along each axis.
    pub fn starts(&self) -> Vec<f64> {
        self.dims.starts()
    }

    /// Voxel separation along each axis.
    pub fn separations(&self) -> Vec<f64> {
        self.dims.separations()
    }

    /// Axis names.
    pub fn dimnames(&self) -> Vec<String> {
        self.dims.names()
    }

    /// Direction cosines of the three world axes.
    pub fn cosines(&self) -> &DirectionCosines {
        self.dims.cosines()
    }

    /// Direction cosines of one of the three world axes.
    pub fn direction_cosines(&self, axis: &str) -> Option<[f64; 3]> {
        self.dims.cosines().get(axis)
    }

    /// Working type of the in-memory array.
    pub fn dtype(&self) -> Option<NumericKind> {
        self.dtype
    }

    /// Type of the image on disk.
    pub fn volume_type(&self) -> Option<NumericKind> {
        self.volume_type
    }

    /// Path of the container.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The storage engine of this volume.
    pub fn engine(&self) -> &Arc<dyn Engine> {
        &self.engine
    }

    /// Whether the volume was opened read-only.
    pub fn is_readonly(&self) -> bool {
        self.readonly
    }

    /// Whether the volume holds label values.
    pub fn is_labels(&self) -> bool {
        self.labels
    }

    /// Whether the voxel data is loaded in memory.
    pub fn is_data_loaded(&self) -> bool {
        self.data.is_some()
    }

    /// Whether the container has an image to read from.
    pub fn is_data_loadable(&self) -> bool {
        self.data_loadable
    }

    pub(crate) fn container(&self) -> Option<&dyn Container> {
        self.handle.as_deref()
    }
}

impl Drop for Volume {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!(path = %self.path.display(), "failed to close volume: {}", e);
        }
    }
}

type Header = (NumericKind, DimensionSet, Result<String>, bool);

fn read_header(handle: &dyn Container) -> Result<Header> {
    let volume_type = NumericKind::from_disk_code(handle.data_type()?)?;
    let dims = DimensionSet::from_container(handle)?;
    Ok((volume_type, dims, handle.history(), handle.has_image()))
}

fn not_open(path: &Path) -> MincError {
    MincError::Storage(format!("{} is not open", path.display()))
}

/// Whether an engine of the given version can set the `complete` flag of
/// the image through its public attribute primitive.
pub fn supports_attr_values(version: &str) -> bool {
    parse_version(version).map_or(false, |v| v >= ATTR_VALUES_MIN_VERSION)
}

fn parse_version(version: &str) -> Option<(u32, u32, u32)> {
    let mut parts = version.trim().split('.').map(|p| {
        let digits: String = p.chars().take_while(char::is_ascii_digit).collect();
        digits.parse::<u32>().ok()
    });
    let major = parts.next()??;
    let minor = parts.next().unwrap_or(Some(0))?;
    let patch = parts.next().unwrap_or(Some(0))?;
    Some((major, minor, patch))
}

#[cfg(test)]
mod tests {
    use super::{parse_version, supports_attr_values};
    use crate::engine::IMAGE_ATTR_PATH;
    use crate::factory::{volume_from_description, VolumeDescription};
    use crate::options::VolumeOptions;

    #[test]
    fn versions_compare_as_numbers() {
        assert_eq!(parse_version("2.4.03"), Some((2, 4, 3)));
        assert_eq!(parse_version("4.0"), Some((4, 0, 0)));
        assert_eq!(parse_version("3.6.0-rc1"), Some((3, 6, 0)));
        assert_eq!(parse_version("unknown"), None);
        assert!(supports_attr_values("4.0.0"));
        assert!(supports_attr_values("3.6.0"));
        assert!(supports_attr_values("3.5.99"));
        assert!(!supports_attr_values("3.5.1"));
        assert!(!supports_attr_values("2.9.99"));
        assert!(!supports_attr_values(""));
    }

    #[test]
    fn writing_without_data_leaves_the_image_incomplete() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.mnc");
        let description = VolumeDescription::default().sizes(&[2, 3, 4]);
        let mut volume = volume_from_description(&path, &description, &VolumeOptions::new()).unwrap();
        volume.write_file().unwrap();

        let attrs = volume.container().unwrap().attributes(IMAGE_ATTR_PATH).unwrap();
        assert!(attrs.iter().all(|a| a.name != "complete"));
        volume.close().unwrap();
        assert!(!path.exists());
    }
}
