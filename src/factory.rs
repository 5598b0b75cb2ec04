//! Constructors of volumes: from an existing file, from another volume,
//! or from an explicit description of the axes.
//!
//! Every volume built here except those from [`volume_from_file`] is
//! created for writing, at a new path. A created container which never
//! receives data is removed again when the volume is closed.
//!
//! [`volume_from_file`]: ./fn.volume_from_file.html
use crate::dimension::{DimensionSet, DirectionCosines};
use crate::error::Result;
use crate::options::VolumeOptions;
use crate::typedef::{NumericKind, SPATIAL_DIMENSIONS};
use crate::volume::{Volume, VoxelData};
use std::path::Path;
use std::sync::Arc;

/// What to carry over from a source volume in [`volume_from_instance`].
///
/// [`volume_from_instance`]: ./fn.volume_from_instance.html
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CopyOptions {
    data: bool,
    dims: Option<Vec<String>>,
    volume_type: Option<NumericKind>,
    attribute_path: Option<String>,
}

impl CopyOptions {
    /// Copy the dimensions and history only.
    pub fn new() -> Self {
        CopyOptions::default()
    }

    /// Whether to copy the voxel data as well.
    pub fn data(mut self, data: bool) -> Self {
        self.data = data;
        self
    }

    /// Keep only the named axes.
    pub fn dims<S: AsRef<str>>(mut self, dims: &[S]) -> Self {
        self.dims = Some(dims.iter().map(|d| d.as_ref().to_string()).collect());
        self
    }

    /// Store the new image with this type instead of the source's.
    pub fn volume_type(mut self, volume_type: NumericKind) -> Self {
        self.volume_type = Some(volume_type);
        self
    }

    /// Copy the attributes found at this path or below it.
    pub fn attribute_path(mut self, path: &str) -> Self {
        self.attribute_path = Some(path.to_string());
        self
    }
}

/// The axes and storage type of a volume built from scratch.
///
/// Starts default to 0 and steps to 1 on every axis; the image is stored
/// as `ushort` with identity direction cosines unless told otherwise.
///
/// ```
/// use minc::{NumericKind, VolumeDescription};
///
/// let description = VolumeDescription::new(&["zspace", "yspace", "xspace"])
///     .sizes(&[10, 20, 30])
///     .steps(&[2., 1., 1.])
///     .volume_type(NumericKind::Float);
/// assert_eq!(description.get_starts(), vec![0., 0., 0.]);
/// assert_eq!(description.get_steps(), vec![2., 1., 1.]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct VolumeDescription {
    dimnames: Vec<String>,
    sizes: Vec<usize>,
    starts: Option<Vec<f64>>,
    steps: Option<Vec<f64>>,
    volume_type: NumericKind,
    cosines: DirectionCosines,
}

impl Default for VolumeDescription {
    fn default() -> Self {
        VolumeDescription::new(&SPATIAL_DIMENSIONS)
    }
}

impl VolumeDescription {
    /// Describe a volume with the given axes, in file order.
    pub fn new<S: AsRef<str>>(dimnames: &[S]) -> Self {
        VolumeDescription {
            dimnames: dimnames.iter().map(|d| d.as_ref().to_string()).collect(),
            sizes: Vec::new(),
            starts: None,
            steps: None,
            volume_type: NumericKind::UShort,
            cosines: DirectionCosines::default(),
        }
    }

    /// Number of voxels along each axis.
    pub fn sizes(mut self, sizes: &[usize]) -> Self {
        self.sizes = sizes.to_vec();
        self
    }

    /// World coordinate of the first voxel along each axis.
    pub fn starts(mut self, starts: &[f64]) -> Self {
        self.starts = Some(starts.to_vec());
        self
    }

    /// Voxel separation along each axis.
    pub fn steps(mut self, steps: &[f64]) -> Self {
        self.steps = Some(steps.to_vec());
        self
    }

    /// Type of the image on disk.
    pub fn volume_type(mut self, volume_type: NumericKind) -> Self {
        self.volume_type = volume_type;
        self
    }

    /// Direction cosines of the three world axes.
    pub fn cosines(mut self, cosines: DirectionCosines) -> Self {
        self.cosines = cosines;
        self
    }

    /// Axis names.
    pub fn get_dimnames(&self) -> &[String] {
        &self.dimnames
    }

    /// Voxel counts.
    pub fn get_sizes(&self) -> &[usize] {
        &self.sizes
    }

    /// Starts, defaulting to 0.
    pub fn get_starts(&self) -> Vec<f64> {
        self.starts
            .clone()
            .unwrap_or_else(|| vec![0.; self.dimnames.len()])
    }

    /// Steps, defaulting to 1.
    pub fn get_steps(&self) -> Vec<f64> {
        self.steps
            .clone()
            .unwrap_or_else(|| vec![1.; self.dimnames.len()])
    }

    /// Type of the image on disk.
    pub fn get_volume_type(&self) -> NumericKind {
        self.volume_type
    }

    /// Direction cosines of the three world axes.
    pub fn get_cosines(&self) -> &DirectionCosines {
        &self.cosines
    }
}

/// Open the volume stored at `path`.
pub fn volume_from_file<P: AsRef<Path>>(
    path: P,
    readonly: bool,
    options: &VolumeOptions,
) -> Result<Volume> {
    Volume::open(path, readonly, options)
}

/// Create a volume at `output` with the dimensions of `source`.
///
/// The working type is the one in `options`, else the source's. The
/// history of the source is carried over. Copying the data loads it into
/// `source` first.
///
/// # Errors
///
/// - `MincError::InvalidDescription` if `copy` keeps an axis which the
/// source does not have.
/// - `MincError::IncorrectDims` if the data is copied while some of the
/// source axes are dropped.
pub fn volume_from_instance<P: AsRef<Path>>(
    source: &mut Volume,
    output: P,
    copy: &CopyOptions,
    options: &VolumeOptions,
) -> Result<Volume> {
    let mut volume = Volume::new(output, false, options);
    let engine = Arc::clone(volume.engine());
    let dims = DimensionSet::copy_subset(&*engine, source.dimensions(), copy.dims.as_deref())?;
    volume.set_dimensions(dims);
    volume.set_dtype(
        options
            .get_dtype()
            .or_else(|| source.dtype())
            .unwrap_or(NumericKind::Double),
    );
    volume.create_handle(copy.volume_type.or_else(|| source.volume_type()))?;
    volume.set_history(source.history());

    if copy.data {
        let data = source.data()?.clone();
        volume.create_image()?;
        volume.set_data(data)?;
    }
    if let Some(path) = &copy.attribute_path {
        volume.copy_attributes(source, path)?;
    }
    Ok(volume)
}

/// Create a volume at `output` with the dimensions of the file at `like`,
/// which is opened read-only for the duration of the call.
pub fn volume_like_file<P: AsRef<Path>, Q: AsRef<Path>>(
    like: P,
    output: Q,
    copy: &CopyOptions,
    options: &VolumeOptions,
) -> Result<Volume> {
    let mut source = Volume::open(like, true, options)?;
    let volume = volume_from_instance(&mut source, output, copy, options)?;
    source.close()?;
    Ok(volume)
}

/// Create a volume at `output` from an explicit description and allocate
/// its image. The working type is `f64` unless `options` says otherwise.
///
/// # Errors
///
/// - `MincError::InvalidDescription` if the lists of the description
/// differ in length, or a step is zero.
pub fn volume_from_description<P: AsRef<Path>>(
    output: P,
    description: &VolumeDescription,
    options: &VolumeOptions,
) -> Result<Volume> {
    create_described(output, description, description.get_sizes(), options, NumericKind::Double)
}

/// Create a volume at `output` holding `data`. The sizes are the shape of
/// `data` and the working type is that of `data` unless `options` says
/// otherwise.
///
/// ```no_run
/// # use minc::{volume_from_data, VolumeDescription, VolumeOptions};
/// # use ndarray::Array3;
/// let data = Array3::<f32>::zeros((20, 30, 40));
/// let description = VolumeDescription::new(&["zspace", "yspace", "xspace"]);
/// let mut volume = volume_from_data("out.mnc", data, &description, &VolumeOptions::new())?;
/// volume.write_file()?;
/// # Ok::<(), minc::MincError>(())
/// ```
pub fn volume_from_data<P: AsRef<Path>, D: Into<VoxelData>>(
    output: P,
    data: D,
    description: &VolumeDescription,
    options: &VolumeOptions,
) -> Result<Volume> {
    let data = data.into();
    let sizes = data.shape().to_vec();
    let mut volume = create_described(output, description, &sizes, options, data.kind())?;
    volume.set_data(data)?;
    Ok(volume)
}

fn create_described<P: AsRef<Path>>(
    output: P,
    description: &VolumeDescription,
    sizes: &[usize],
    options: &VolumeOptions,
    default_dtype: NumericKind,
) -> Result<Volume> {
    let mut volume = Volume::new(output, false, options);
    let engine = Arc::clone(volume.engine());
    let dims = DimensionSet::describe(
        &*engine,
        description.get_dimnames(),
        sizes,
        &description.get_starts(),
        &description.get_steps(),
        description.cosines,
    )?;
    volume.set_dimensions(dims);
    volume.set_dtype(options.get_dtype().unwrap_or(default_dtype));
    volume.create_handle(Some(description.volume_type))?;
    volume.create_image()?;
    Ok(volume)
}

#[cfg(test)]
mod tests {
    use super::{CopyOptions, VolumeDescription};
    use crate::dimension::DirectionCosines;
    use crate::typedef::NumericKind;

    #[test]
    fn description_defaults() {
        let d = VolumeDescription::default();
        assert_eq!(d.get_dimnames(), &["xspace", "yspace", "zspace"]);
        assert_eq!(d.get_starts(), vec![0.; 3]);
        assert_eq!(d.get_steps(), vec![1.; 3]);
        assert_eq!(d.get_volume_type(), NumericKind::UShort);
        assert_eq!(d.get_cosines(), &DirectionCosines::default());
        assert!(d.get_sizes().is_empty());
    }

    #[test]
    fn copy_options_builder() {
        let c = CopyOptions::new()
            .data(true)
            .dims(&["zspace", "yspace", "xspace"])
            .volume_type(NumericKind::Float)
            .attribute_path("/minc-2.0/info");
        assert!(c.data);
        assert_eq!(c.dims.as_ref().map(Vec::len), Some(3));
        assert_eq!(c.volume_type, Some(NumericKind::Float));
        assert_eq!(c.attribute_path.as_deref(), Some("/minc-2.0/info"));
        assert_eq!(CopyOptions::new(), CopyOptions::default());
    }
}
