//! A storage engine keeping each container in one flat little-endian file.
//!
//! The layout is, in order: an 8 byte magic code, the format version
//! (`u16`), the on-disk type code (`i32`), the axis records in file order,
//! the slice scaling flag, the volume and valid ranges, the string
//! attributes and finally, if the image was allocated, the voxels in the
//! on-disk kind with the last axis varying fastest. Paths ending in `.gz`
//! are gzip compressed as a whole.
//!
//! While a container is open its voxels are kept as real values. They are
//! quantized through the current volume and valid ranges whenever they are
//! read and when the file is flushed, so that reading within a session
//! gives the same values as reading after reopening.

use super::{Attribute, Container, DimensionHandle, Engine, IMAGE_ATTR_PATH, ROOT_ATTR_PATH};
use crate::affine;
use crate::error::{MincError, Result};
use crate::typedef::{DimClass, DimOrder, NumericKind, OpenMode};
use crate::volume::data::VoxelData;
use crate::volume::util::{check_region, region, region_mut};
use byteordered::{ByteOrdered, Endian};
use flate2::bufread::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use ndarray::{ArrayD, IxDyn};
use num_traits::FromPrimitive;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

const MAGIC: &[u8; 8] = b"MINC2FLT";
const FORMAT_VERSION: u16 = 1;
const MAX_DIMS: usize = 32;
const MAX_STRING_LEN: usize = 1 << 24;
const HISTORY_ATTR: &str = "history";

/// The default storage engine of the crate.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct FileEngine;

impl FileEngine {
    /// Create a new file engine.
    pub fn new() -> Self {
        FileEngine
    }
}

impl Engine for FileEngine {
    fn open(&self, path: &Path, mode: OpenMode) -> Result<Box<dyn Container>> {
        Ok(Box::new(FileContainer::open(path, mode)?))
    }

    fn create(
        &self,
        path: &Path,
        dims: &[DimensionHandle],
        kind: NumericKind,
    ) -> Result<Box<dyn Container>> {
        Ok(Box::new(FileContainer::create(path, dims, kind)?))
    }

    fn create_dimension(&self, name: &str, class: DimClass, size: usize) -> Result<DimensionHandle> {
        if name.is_empty() {
            return Err(MincError::Storage("dimension name is empty".to_string()));
        }
        Ok(DimensionHandle::new(name, class, size))
    }

    fn copy_dimension(&self, dim: &DimensionHandle) -> Result<DimensionHandle> {
        Ok(dim.duplicate())
    }

    fn version(&self) -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }
}

/// A container opened by [`FileEngine`](struct.FileEngine.html).
#[derive(Debug)]
pub struct FileContainer {
    path: PathBuf,
    mode: OpenMode,
    code: i32,
    /// axes in file order
    axes: Vec<DimensionHandle>,
    /// apparent axis `i` is file axis `apparent[i]`
    apparent: Vec<usize>,
    /// real voxel values in file order
    voxels: Option<ArrayD<f64>>,
    volume_range: (f64, f64),
    valid_range: (f64, f64),
    slice_scaling: bool,
    attributes: Vec<Attribute>,
    dirty: bool,
}

impl FileContainer {
    /// Create a container and write it to `path` right away.
    pub fn create<P: AsRef<Path>>(path: P, dims: &[DimensionHandle], kind: NumericKind) -> Result<Self> {
        if dims.is_empty() {
            return Err(MincError::Storage(
                "a container needs at least one dimension".to_string(),
            ));
        }
        let container = FileContainer {
            path: path.as_ref().to_path_buf(),
            mode: OpenMode::ReadWrite,
            code: kind.disk_code(),
            axes: dims.iter().map(DimensionHandle::duplicate).collect(),
            apparent: (0..dims.len()).collect(),
            voxels: None,
            volume_range: (0., 1.),
            valid_range: kind.range().unwrap_or((0., 1.)),
            slice_scaling: false,
            attributes: Vec::new(),
            dirty: false,
        };
        container.flush()?;
        Ok(container)
    }

    /// Read a container from the file at `path`.
    pub fn open<P: AsRef<Path>>(path: P, mode: OpenMode) -> Result<Self> {
        let path = path.as_ref();
        let file = BufReader::new(File::open(path)?);
        if is_gz_file(path) {
            Self::from_reader(ByteOrdered::le(GzDecoder::new(file)), path, mode)
        } else {
            Self::from_reader(ByteOrdered::le(file), path, mode)
        }
    }

    /// Read an uncompressed container from `reader`, bound to `path`.
    pub fn read_from<R: Read, P: AsRef<Path>>(reader: R, path: P, mode: OpenMode) -> Result<Self> {
        Self::from_reader(ByteOrdered::le(reader), path.as_ref(), mode)
    }

    fn from_reader<S, E>(mut source: ByteOrdered<S, E>, path: &Path, mode: OpenMode) -> Result<Self>
    where
        S: Read,
        E: Endian,
    {
        let mut magic = [0u8; 8];
        source
            .read_exact(&mut magic)
            .map_err(|_| MincError::InvalidFormat)?;
        if &magic != MAGIC || source.read_u16()? != FORMAT_VERSION {
            return Err(MincError::InvalidFormat);
        }
        let code = source.read_i32()?;
        let ndims = source.read_u32()? as usize;
        if ndims == 0 || ndims > MAX_DIMS {
            return Err(MincError::InvalidFormat);
        }

        let mut axes = Vec::with_capacity(ndims);
        for _ in 0..ndims {
            let name = read_string(&mut source)?;
            let class = DimClass::from_u8(source.read_u8()?).ok_or(MincError::InvalidFormat)?;
            let size = source.read_u64()? as usize;
            let mut axis = DimensionHandle::new(&name, class, size);
            axis.set_start(source.read_f64()?);
            axis.set_separation(source.read_f64()?);
            let has_cosines = source.read_u8()? != 0;
            let mut cosines = [0.; 3];
            for c in cosines.iter_mut() {
                *c = source.read_f64()?;
            }
            if has_cosines {
                axis.set_cosines(cosines);
            } else {
                axis.cosines = None;
            }
            axes.push(axis);
        }

        let slice_scaling = source.read_u8()? != 0;
        let volume_range = (source.read_f64()?, source.read_f64()?);
        let valid_range = (source.read_f64()?, source.read_f64()?);

        let nattrs = source.read_u32()? as usize;
        let mut attributes = Vec::new();
        for _ in 0..nattrs {
            attributes.push(Attribute {
                path: read_string(&mut source)?,
                name: read_string(&mut source)?,
                value: read_string(&mut source)?,
            });
        }

        let mut container = FileContainer {
            path: path.to_path_buf(),
            mode,
            code,
            apparent: (0..ndims).collect(),
            axes,
            voxels: None,
            volume_range,
            valid_range,
            slice_scaling,
            attributes,
            dirty: false,
        };

        let has_image = source.read_u8()? != 0;
        // voxels of an unknown type cannot be decoded; the type query
        // still reports the code so that the caller can fail properly
        if let (true, Ok(kind)) = (has_image, NumericKind::from_disk_code(code)) {
            let shape = container.file_shape();
            let len = shape
                .iter()
                .try_fold(1usize, |acc, &d| acc.checked_mul(d))
                .ok_or(MincError::InvalidFormat)?;
            let mut raw = Vec::with_capacity(len.min(1 << 20));
            for _ in 0..len {
                let voxel = read_voxel(&mut source, kind)?;
                raw.push(container.dequantize(kind, voxel));
            }
            let voxels =
                ArrayD::from_shape_vec(IxDyn(&shape), raw).map_err(|_| MincError::InvalidFormat)?;
            container.voxels = Some(voxels);
        }
        Ok(container)
    }

    fn flush(&self) -> Result<()> {
        debug!(path = %self.path.display(), image = self.voxels.is_some(), "flushing container");
        let writer = BufWriter::new(File::create(&self.path)?);
        if is_gz_file(&self.path) {
            let mut e = GzEncoder::new(writer, Compression::default());
            self.write_to(ByteOrdered::le(&mut e))?;
            e.finish()?.flush()?;
        } else {
            let mut writer = writer;
            self.write_to(ByteOrdered::le(&mut writer))?;
            writer.flush()?;
        }
        Ok(())
    }

    fn write_to<S, E>(&self, mut sink: ByteOrdered<S, E>) -> Result<()>
    where
        S: Write,
        E: Endian,
    {
        sink.write_all(MAGIC)?;
        sink.write_u16(FORMAT_VERSION)?;
        sink.write_i32(self.code)?;
        sink.write_u32(self.axes.len() as u32)?;
        for axis in &self.axes {
            write_string(&mut sink, axis.name())?;
            sink.write_u8(axis.class() as u8)?;
            sink.write_u64(axis.size() as u64)?;
            sink.write_f64(axis.start())?;
            sink.write_f64(axis.separation())?;
            sink.write_u8(axis.cosines().is_some() as u8)?;
            for c in axis.cosines().unwrap_or([0.; 3]).iter() {
                sink.write_f64(*c)?;
            }
        }
        sink.write_u8(self.slice_scaling as u8)?;
        sink.write_f64(self.volume_range.0)?;
        sink.write_f64(self.volume_range.1)?;
        sink.write_f64(self.valid_range.0)?;
        sink.write_f64(self.valid_range.1)?;
        sink.write_u32(self.attributes.len() as u32)?;
        for attr in &self.attributes {
            write_string(&mut sink, &attr.path)?;
            write_string(&mut sink, &attr.name)?;
            write_string(&mut sink, &attr.value)?;
        }
        match (&self.voxels, NumericKind::from_disk_code(self.code)) {
            (Some(voxels), Ok(kind)) => {
                sink.write_u8(1)?;
                for real in voxels.iter() {
                    write_voxel(&mut sink, kind, self.quantize(kind, *real))?;
                }
            }
            _ => sink.write_u8(0)?,
        }
        Ok(())
    }

    fn kind(&self) -> Result<NumericKind> {
        NumericKind::from_disk_code(self.code)
    }

    fn file_shape(&self) -> Vec<usize> {
        self.axes.iter().map(DimensionHandle::size).collect()
    }

    fn apparent_shape(&self) -> Vec<usize> {
        self.apparent.iter().map(|&i| self.axes[i].size()).collect()
    }

    fn apparent_axes(&self) -> Vec<&DimensionHandle> {
        self.apparent.iter().map(|&i| &self.axes[i]).collect()
    }

    fn check_writable(&self) -> Result<()> {
        match self.mode {
            OpenMode::ReadWrite => Ok(()),
            OpenMode::Read => Err(MincError::Storage(format!(
                "{} was opened for reading only",
                self.path.display()
            ))),
        }
    }

    /// The stored voxel value representing `real`.
    fn quantize(&self, kind: NumericKind, real: f64) -> f64 {
        match kind.range() {
            None if kind == NumericKind::Float => f64::from(real as f32),
            None => real,
            Some((tmin, tmax)) => {
                let (rmin, rmax) = self.volume_range;
                let (vmin, vmax) = self.valid_range;
                let voxel = if rmax == rmin {
                    vmin
                } else {
                    vmin + (real - rmin) * (vmax - vmin) / (rmax - rmin)
                };
                let lo = vmin.min(vmax).max(tmin);
                let hi = vmax.max(vmin).min(tmax);
                voxel.round().max(lo).min(hi)
            }
        }
    }

    /// The real value represented by the stored voxel value `voxel`.
    fn dequantize(&self, kind: NumericKind, voxel: f64) -> f64 {
        if kind.is_float() {
            return voxel;
        }
        let (rmin, rmax) = self.volume_range;
        let (vmin, vmax) = self.valid_range;
        if vmax == vmin {
            rmin
        } else {
            rmin + (voxel - vmin) * (rmax - rmin) / (vmax - vmin)
        }
    }

    fn read_reals(&self, start: &[usize], count: &[usize]) -> Result<ArrayD<f64>> {
        let kind = self.kind()?;
        let voxels = self
            .voxels
            .as_ref()
            .ok_or_else(|| MincError::Storage("image was not created".to_string()))?;
        check_region(start, count, &self.apparent_shape())?;
        let view = voxels.view().permuted_axes(IxDyn(&self.apparent));
        Ok(region(&view, start, count).mapv(|r| self.dequantize(kind, self.quantize(kind, r))))
    }
}

impl Container for FileContainer {
    fn path(&self) -> &Path {
        &self.path
    }

    fn data_type(&self) -> Result<i32> {
        Ok(self.code)
    }

    fn dimension_count(&self) -> Result<usize> {
        Ok(self.axes.len())
    }

    fn dimensions(&self, order: DimOrder) -> Result<Vec<DimensionHandle>> {
        Ok(match order {
            DimOrder::File => self.axes.iter().map(DimensionHandle::duplicate).collect(),
            DimOrder::Apparent => self.apparent.iter().map(|&i| self.axes[i].duplicate()).collect(),
        })
    }

    fn set_apparent_dimension_order(&mut self, names: &[String]) -> Result<()> {
        let mut order = Vec::with_capacity(names.len());
        for name in names {
            let i = self
                .axes
                .iter()
                .position(|a| a.name() == name)
                .ok_or_else(|| MincError::Storage(format!("no dimension named {}", name)))?;
            if order.contains(&i) {
                return Err(MincError::Storage(format!("dimension {} named twice", name)));
            }
            order.push(i);
        }
        if order.len() != self.axes.len() {
            return Err(MincError::Storage(format!(
                "apparent order names {} of {} dimensions",
                order.len(),
                self.axes.len()
            )));
        }
        self.apparent = order;
        Ok(())
    }

    fn create_image(&mut self) -> Result<()> {
        self.check_writable()?;
        if self.voxels.is_none() {
            self.voxels = Some(ArrayD::zeros(IxDyn(&self.file_shape())));
            self.dirty = true;
        }
        Ok(())
    }

    fn has_image(&self) -> bool {
        self.voxels.is_some()
    }

    fn read_hyperslab(
        &self,
        kind: NumericKind,
        start: &[usize],
        count: &[usize],
    ) -> Result<VoxelData> {
        Ok(VoxelData::from_reals(kind, self.read_reals(start, count)?))
    }

    fn read_hyperslab_normalized(
        &self,
        kind: NumericKind,
        start: &[usize],
        count: &[usize],
        min: f64,
        max: f64,
    ) -> Result<VoxelData> {
        let (kmin, kmax) = kind.range().ok_or_else(|| {
            MincError::Storage(format!("normalized read into non-integer type {}", kind))
        })?;
        let reals = self.read_reals(start, count)?;
        let normalized = if max == min {
            reals.mapv(|_| kmin)
        } else {
            reals.mapv(|r| kmin + (r - min) * (kmax - kmin) / (max - min))
        };
        Ok(VoxelData::from_reals(kind, normalized))
    }

    fn write_hyperslab(&mut self, start: &[usize], data: &VoxelData) -> Result<()> {
        self.check_writable()?;
        check_region(start, data.shape(), &self.apparent_shape())?;
        let perm = self.apparent.clone();
        let voxels = self
            .voxels
            .as_mut()
            .ok_or_else(|| MincError::Storage("image was not created".to_string()))?;
        let mut view = voxels.view_mut().permuted_axes(IxDyn(&perm));
        region_mut(&mut view, start, data.shape()).assign(&data.to_reals());
        self.dirty = true;
        Ok(())
    }

    fn volume_range(&self) -> Result<(f64, f64)> {
        Ok(self.volume_range)
    }

    fn set_volume_range(&mut self, min: f64, max: f64) -> Result<()> {
        self.check_writable()?;
        self.volume_range = (min, max);
        self.dirty = true;
        Ok(())
    }

    fn valid_range(&self) -> Result<(f64, f64)> {
        Ok(self.valid_range)
    }

    fn set_valid_range(&mut self, min: f64, max: f64) -> Result<()> {
        self.check_writable()?;
        if let Some((tmin, tmax)) = self.kind()?.range() {
            if min < tmin || max > tmax {
                return Err(MincError::Storage(format!(
                    "valid range [{}, {}] does not fit the image type",
                    min, max
                )));
            }
        }
        self.valid_range = (min, max);
        self.dirty = true;
        Ok(())
    }

    fn slice_scaling(&self) -> Result<bool> {
        Ok(self.slice_scaling)
    }

    fn set_slice_scaling(&mut self, flag: bool) -> Result<()> {
        self.check_writable()?;
        self.slice_scaling = flag;
        self.dirty = true;
        Ok(())
    }

    fn history(&self) -> Result<String> {
        self.attributes
            .iter()
            .find(|a| a.path == ROOT_ATTR_PATH && a.name == HISTORY_ATTR)
            .map(|a| a.value.clone())
            .ok_or_else(|| MincError::Storage("history attribute not found".to_string()))
    }

    fn set_history(&mut self, history: &str) -> Result<()> {
        self.set_attribute(ROOT_ATTR_PATH, HISTORY_ATTR, history)
    }

    fn attributes(&self, path: &str) -> Result<Vec<Attribute>> {
        let prefix = format!("{}/", path.trim_end_matches('/'));
        Ok(self
            .attributes
            .iter()
            .filter(|a| a.path == path || a.path.starts_with(&prefix))
            .cloned()
            .collect())
    }

    fn set_attr_values(&mut self, group: &str, name: &str, value: &str) -> Result<()> {
        let path = match group.trim_matches('/') {
            "" => ROOT_ATTR_PATH.to_string(),
            "image" => IMAGE_ATTR_PATH.to_string(),
            g => format!("{}/{}", ROOT_ATTR_PATH, g),
        };
        self.set_attribute(&path, name, value)
    }

    fn set_attribute(&mut self, path: &str, name: &str, value: &str) -> Result<()> {
        self.check_writable()?;
        if !path.starts_with('/') || name.is_empty() {
            return Err(MincError::Storage(format!(
                "invalid attribute {} at {}",
                name, path
            )));
        }
        match self
            .attributes
            .iter_mut()
            .find(|a| a.path == path && a.name == name)
        {
            Some(attr) => attr.value = value.to_string(),
            None => self.attributes.push(Attribute {
                path: path.to_string(),
                name: name.to_string(),
                value: value.to_string(),
            }),
        }
        self.dirty = true;
        Ok(())
    }

    fn voxel_to_world(&self, voxel: &[f64]) -> Result<[f64; 3]> {
        affine::voxel_to_world(&self.apparent_axes(), voxel)
    }

    fn world_to_voxel(&self, world: &[f64]) -> Result<Vec<f64>> {
        affine::world_to_voxel(&self.apparent_axes(), world)
    }

    fn close(self: Box<Self>) -> Result<()> {
        if self.mode == OpenMode::ReadWrite && self.dirty {
            self.flush()?;
        }
        Ok(())
    }
}

fn is_gz_file(path: &Path) -> bool {
    path.extension().map_or(false, |ext| ext == "gz")
}

fn read_string<S, E>(source: &mut ByteOrdered<S, E>) -> Result<String>
where
    S: Read,
    E: Endian,
{
    let len = source.read_u32()? as usize;
    if len > MAX_STRING_LEN {
        return Err(MincError::InvalidFormat);
    }
    let mut buf = vec![0u8; len];
    source.read_exact(&mut buf)?;
    String::from_utf8(buf).map_err(|_| MincError::InvalidFormat)
}

fn write_string<S, E>(sink: &mut ByteOrdered<S, E>, value: &str) -> Result<()>
where
    S: Write,
    E: Endian,
{
    sink.write_u32(value.len() as u32)?;
    sink.write_all(value.as_bytes())?;
    Ok(())
}

fn read_voxel<S, E>(source: &mut ByteOrdered<S, E>, kind: NumericKind) -> Result<f64>
where
    S: Read,
    E: Endian,
{
    use NumericKind::*;
    Ok(match kind {
        Byte => f64::from(source.read_i8()?),
        Short => f64::from(source.read_i16()?),
        Int => f64::from(source.read_i32()?),
        Float => f64::from(source.read_f32()?),
        Double => source.read_f64()?,
        UByte => f64::from(source.read_u8()?),
        UShort => f64::from(source.read_u16()?),
        UInt => f64::from(source.read_u32()?),
    })
}

fn write_voxel<S, E>(sink: &mut ByteOrdered<S, E>, kind: NumericKind, voxel: f64) -> Result<()>
where
    S: Write,
    E: Endian,
{
    use NumericKind::*;
    match kind {
        Byte => sink.write_i8(voxel as i8)?,
        Short => sink.write_i16(voxel as i16)?,
        Int => sink.write_i32(voxel as i32)?,
        Float => sink.write_f32(voxel as f32)?,
        Double => sink.write_f64(voxel)?,
        UByte => sink.write_u8(voxel as u8)?,
        UShort => sink.write_u16(voxel as u16)?,
        UInt => sink.write_u32(voxel as u32)?,
    }
    Ok(())
}
