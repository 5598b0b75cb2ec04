//! Typed volume and hyperslab access to MINC2 files.
//!
//! A [`Volume`] binds a MINC container to its dimensions and an optional
//! in-memory voxel array whose element type, the working type, is chosen
//! at run time from the eight kinds of [`NumericKind`]. Volumes are opened
//! or created through the functions of the [`factory`] module, read and
//! written whole or by [`HyperSlab`], and closed exactly once.
//!
//! Containers are handled by a storage [`Engine`]. The crate ships with
//! [`FileEngine`], which keeps containers in a compact binary file
//! (gzip-compressed when the path ends in `.gz`).
//!
//! # Example
//!
//! ```no_run
//! use minc::{volume_from_file, VolumeOptions};
//!
//! let mut volume = volume_from_file("brain.mnc", true, &VolumeOptions::new())?;
//! println!("{:?} {:?}", volume.dimnames(), volume.sizes());
//! let slice = volume.get_hyperslab(&[10, 0, 0], &[1, 256, 256], None)?;
//! println!("mean of slice 10: {:?}", slice.data().mean());
//! volume.close()?;
//! # Ok::<(), minc::MincError>(())
//! ```
//!
//! [`Volume`]: ./volume/struct.Volume.html
//! [`NumericKind`]: ./typedef/enum.NumericKind.html
//! [`factory`]: ./factory/index.html
//! [`HyperSlab`]: ./volume/hyperslab/struct.HyperSlab.html
//! [`Engine`]: ./engine/trait.Engine.html
//! [`FileEngine`]: ./engine/file/struct.FileEngine.html
#![deny(missing_debug_implementations)]
#![warn(missing_docs, unused_extern_crates, trivial_casts, unused_results)]

#[macro_use] extern crate quick_error;
#[macro_use] extern crate num_derive;

pub mod affine;
mod coords;
pub mod dimension;
pub mod engine;
pub mod error;
pub mod factory;
pub mod options;
pub mod typedef;
pub mod volume;

pub use crate::dimension::{DimensionSet, DirectionCosines};
pub use crate::engine::{Container, DimensionHandle, Engine, FileEngine};
pub use crate::error::{MincError, Result};
pub use crate::factory::{
    volume_from_data, volume_from_description, volume_from_file, volume_from_instance,
    volume_like_file, CopyOptions, VolumeDescription,
};
pub use crate::options::VolumeOptions;
pub use crate::typedef::{DimClass, DimOrder, NumericKind, OpenMode};
pub use crate::volume::{DataElement, HyperSlab, Volume, VoxelData};
