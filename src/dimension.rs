//! Dimension sets: the ordered axes of a volume, with their sampling and
//! orientation in world space.
use crate::affine::{self, Affine4};
use crate::engine::{Container, DimensionHandle, Engine};
use crate::error::{MincError, Result};
use crate::typedef::{DimClass, DimOrder, SPATIAL_DIMENSIONS, VECTOR_DIMENSION};

/// Direction cosines of the three world axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionCosines {
    /// Direction of `xspace`.
    pub x: [f64; 3],
    /// Direction of `yspace`.
    pub y: [f64; 3],
    /// Direction of `zspace`.
    pub z: [f64; 3],
}

impl Default for DirectionCosines {
    fn default() -> Self {
        DirectionCosines {
            x: [1., 0., 0.],
            y: [0., 1., 0.],
            z: [0., 0., 1.],
        }
    }
}

impl DirectionCosines {
    /// The direction cosines of the named world axis.
    pub fn get(&self, axis: &str) -> Option<[f64; 3]> {
        match axis {
            "xspace" => Some(self.x),
            "yspace" => Some(self.y),
            "zspace" => Some(self.z),
            _ => None,
        }
    }
}

/// The ordered axes of a volume.
///
/// Each axis descriptor is owned by the set. Deriving a set from another
/// one duplicates the descriptors through the storage engine.
#[derive(Debug, Default, PartialEq)]
pub struct DimensionSet {
    dims: Vec<DimensionHandle>,
    cosines: DirectionCosines,
}

impl DimensionSet {
    /// Read the axes of an open container in apparent order.
    ///
    /// The direction cosines of the world axes are left at their defaults;
    /// see [`load_cosines`](#method.load_cosines).
    pub fn from_container(container: &dyn Container) -> Result<Self> {
        Ok(DimensionSet {
            dims: container.dimensions(DimOrder::Apparent)?,
            cosines: DirectionCosines::default(),
        })
    }

    /// Describe the axes of a new volume.
    ///
    /// An axis named `vector_dimension` becomes a record axis and ignores
    /// its start, step and direction cosines. Every other axis is spatial;
    /// `xspace`, `yspace` and `zspace` take their direction from `cosines`.
    ///
    /// # Errors
    ///
    /// - `MincError::InvalidDescription` if the lists differ in length, are
    /// empty, or a spatial axis has a step of zero.
    pub fn describe<S: AsRef<str>>(
        engine: &dyn Engine,
        names: &[S],
        sizes: &[usize],
        starts: &[f64],
        steps: &[f64],
        cosines: DirectionCosines,
    ) -> Result<Self> {
        if names.is_empty() {
            return Err(MincError::InvalidDescription(
                "at least one dimension is required".to_string(),
            ));
        }
        if sizes.len() != names.len() || starts.len() != names.len() || steps.len() != names.len()
        {
            return Err(MincError::InvalidDescription(format!(
                "{} dimension names but {} sizes, {} starts and {} steps",
                names.len(),
                sizes.len(),
                starts.len(),
                steps.len()
            )));
        }

        let mut dims = Vec::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            let name = name.as_ref();
            if name == VECTOR_DIMENSION {
                dims.push(engine.create_dimension(name, DimClass::Record, sizes[i])?);
                continue;
            }
            if steps[i] == 0. {
                return Err(MincError::InvalidDescription(format!(
                    "dimension {} has a step of zero",
                    name
                )));
            }
            let mut dim = engine.create_dimension(name, DimClass::Spatial, sizes[i])?;
            dim.set_separation(steps[i]);
            dim.set_start(starts[i]);
            if let Some(c) = cosines.get(name) {
                dim.set_cosines(c);
            }
            dims.push(dim);
        }
        Ok(DimensionSet { dims, cosines })
    }

    /// Copy the axes of `other`, restricted to the names in `keep` if
    /// given. The axes keep the relative order they have in `other`, and
    /// each one is duplicated through `engine`. The direction cosines of
    /// the three world axes are copied whichever axes are kept.
    ///
    /// # Errors
    ///
    /// - `MincError::InvalidDescription` if `keep` names an axis which
    /// `other` does not have, or keeps no axis at all.
    pub fn copy_subset<S: AsRef<str>>(
        engine: &dyn Engine,
        other: &DimensionSet,
        keep: Option<&[S]>,
    ) -> Result<Self> {
        if let Some(keep) = keep {
            if let Some(missing) = keep.iter().find(|k| other.get(k.as_ref()).is_none()) {
                return Err(MincError::InvalidDescription(format!(
                    "no dimension named {}",
                    missing.as_ref()
                )));
            }
        }
        let mut dims = Vec::new();
        for dim in &other.dims {
            let kept = keep.map_or(true, |keep| keep.iter().any(|k| k.as_ref() == dim.name()));
            if kept {
                dims.push(engine.copy_dimension(dim)?);
            }
        }
        if dims.is_empty() {
            return Err(MincError::InvalidDescription(
                "at least one dimension is required".to_string(),
            ));
        }
        Ok(DimensionSet {
            dims,
            cosines: other.cosines,
        })
    }

    /// Fetch the direction cosines of the three world axes from their
    /// descriptors.
    ///
    /// # Errors
    ///
    /// - `MincError::DirectionCosinesUnavailable` if one of `xspace`,
    /// `yspace` or `zspace` is missing or has no direction cosines.
    pub fn load_cosines(&mut self) -> Result<()> {
        let mut found = [[0.; 3]; 3];
        for (c, name) in found.iter_mut().zip(SPATIAL_DIMENSIONS.iter()) {
            *c = self
                .get(name)
                .and_then(DimensionHandle::cosines)
                .ok_or_else(|| MincError::DirectionCosinesUnavailable(name.to_string()))?;
        }
        self.cosines = DirectionCosines {
            x: found[0],
            y: found[1],
            z: found[2],
        };
        Ok(())
    }

    pub(crate) fn with_cosines(mut self, cosines: DirectionCosines) -> Self {
        self.cosines = cosines;
        self
    }

    /// The axis descriptors, in order.
    pub fn handles(&self) -> &[DimensionHandle] {
        &self.dims
    }

    /// The descriptor of the named axis.
    pub fn get(&self, name: &str) -> Option<&DimensionHandle> {
        self.dims.iter().find(|d| d.name() == name)
    }

    /// Number of axes.
    pub fn len(&self) -> usize {
        self.dims.len()
    }

    /// Whether there are no axes at all.
    pub fn is_empty(&self) -> bool {
        self.dims.is_empty()
    }

    /// Number of voxels along each axis.
    pub fn sizes(&self) -> Vec<usize> {
        self.dims.iter().map(DimensionHandle::size).collect()
    }

    /// Total number of voxels.
    pub fn voxel_count(&self) -> usize {
        if self.dims.is_empty() {
            0
        } else {
            self.dims.iter().map(DimensionHandle::size).product()
        }
    }

    /// World coordinate of the first voxel along each axis.
    pub fn starts(&self) -> Vec<f64> {
        self.dims.iter().map(DimensionHandle::start).collect()
    }

    /// Voxel separation along each axis.
    pub fn separations(&self) -> Vec<f64> {
        self.dims.iter().map(DimensionHandle::separation).collect()
    }

    /// Axis names.
    pub fn names(&self) -> Vec<String> {
        self.dims.iter().map(|d| d.name().to_string()).collect()
    }

    /// Direction cosines of the three world axes.
    pub fn cosines(&self) -> &DirectionCosines {
        &self.cosines
    }

    /// Voxel to world matrix over the axes with direction cosines.
    pub fn affine(&self) -> Result<Affine4> {
        affine::voxel_to_world_affine(&self.dims.iter().collect::<Vec<_>>())
    }
}
