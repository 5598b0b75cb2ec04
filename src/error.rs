//! Types for error handling go here.

use crate::typedef::NumericKind;
use std::io::Error as IOError;
use std::path::PathBuf;

quick_error! {
    /// Error type for all error variants originated by this crate.
    #[derive(Debug)]
    pub enum MincError {
        /// The container could not be opened or created.
        Open(path: PathBuf, err: Box<MincError>) {
            display("Could not open container {}: {}", path.display(), err)
            source(&**err)
        }
        /// The on-disk or requested type code has no registry entry.
        UnsupportedType(code: i32) {
            display("Unsupported data type code {}", code)
        }
        /// The operation requires voxel data which is not available.
        NoData {
            display("No volume data available")
        }
        /// The shape of an assigned array does not match the volume.
        IncorrectDims(expected: Vec<usize>, got: Vec<usize>) {
            display("Incorrect array shape {:?}, volume is {:?}", got, expected)
        }
        /// A write was attempted without a working data type.
        NoDataType {
            display("Working data type of the volume is unknown")
        }
        /// An expected spatial axis has no direction cosines.
        DirectionCosinesUnavailable(axis: String) {
            display("Could not retrieve direction cosines for dimension {}", axis)
        }
        /// An image was about to be created without an on-disk type.
        VolumeTypeUndetermined {
            display("On-disk volume type was not determined")
        }
        /// A label value falls outside the chosen on-disk type.
        LabelRangeViolation(min: f64, max: f64, kind: NumericKind) {
            display("Label range [{}, {}] exceeds the range of {}", min, max, kind)
        }
        /// A write was attempted on a volume opened in read-only mode.
        ReadOnly(path: PathBuf) {
            display("Writing to {} which has been opened in read-only mode", path.display())
        }
        /// Attempted to access a region outside of the volume's boundaries.
        OutOfBounds(start: Vec<usize>, count: Vec<usize>) {
            display("Hyperslab at {:?} with count {:?} is out of bounds", start, count)
        }
        /// The requested combination of operation and data type is not supported.
        NotImplemented(what: &'static str) {
            display("Not implemented: {}", what)
        }
        /// An explicit volume description is inconsistent.
        InvalidDescription(msg: String) {
            display("Invalid volume description: {}", msg)
        }
        /// The bytes of a file do not form a valid container.
        InvalidFormat {
            display("Invalid MINC container")
        }
        /// A storage engine primitive failed.
        Storage(msg: String) {
            display("Storage engine error: {}", msg)
        }
        /// I/O Error
        Io(err: IOError) {
            from()
            source(err)
            display("I/O error: {}", err)
        }
    }
}

/// Alias type for results originated from this crate.
pub type Result<T> = ::std::result::Result<T, MincError>;
