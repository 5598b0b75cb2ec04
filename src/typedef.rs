//! This module contains the types defined by the MINC2 library which
//! this crate exchanges with a storage engine. `NumericKind` is the
//! registry of supported voxel types: each kind is bound to its on-disk
//! type code, its native width and, for integer kinds, the fixed range
//! that normalized reads map into.

use crate::error::{MincError, Result};
use crate::volume::DataElement;
use num_traits::FromPrimitive;
use std::fmt;

/// Voxel value type of a volume, either on disk or in memory.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, FromPrimitive)]
pub enum NumericKind {
    /// 8 bit signed integer.
    // MI_TYPE_BYTE        1
    Byte = 1,
    /// 16 bit signed integer.
    // MI_TYPE_SHORT       3
    Short = 3,
    /// 32 bit signed integer.
    // MI_TYPE_INT         4
    Int = 4,
    /// 32 bit float.
    // MI_TYPE_FLOAT       5
    Float = 5,
    /// 64 bit float = double.
    // MI_TYPE_DOUBLE      6
    Double = 6,
    /// 8 bit unsigned integer.
    // MI_TYPE_UBYTE     100
    UByte = 100,
    /// 16 bit unsigned integer.
    // MI_TYPE_USHORT    101
    UShort = 101,
    /// 32 bit unsigned integer.
    // MI_TYPE_UINT      102
    UInt = 102,
}

impl NumericKind {
    /// All kinds known to the registry.
    pub const ALL: [NumericKind; 8] = [
        NumericKind::Byte,
        NumericKind::Short,
        NumericKind::Int,
        NumericKind::Float,
        NumericKind::Double,
        NumericKind::UByte,
        NumericKind::UShort,
        NumericKind::UInt,
    ];

    /// Look up the kind bound to an on-disk type code.
    ///
    /// # Errors
    ///
    /// - `MincError::UnsupportedType` if no kind has this code.
    pub fn from_disk_code(code: i32) -> Result<Self> {
        NumericKind::from_i32(code).ok_or(MincError::UnsupportedType(code))
    }

    /// The kind of an in-memory array with elements of type `T`.
    ///
    /// ```
    /// # use minc::NumericKind;
    /// # use ndarray::Array3;
    /// let data = Array3::<u16>::zeros((2, 3, 4));
    /// assert_eq!(NumericKind::of_data(&data), NumericKind::UShort);
    /// ```
    pub fn of_data<T, S, D>(_data: &ndarray::ArrayBase<S, D>) -> NumericKind
    where
        T: DataElement,
        S: ndarray::Data<Elem = T>,
        D: ndarray::Dimension,
    {
        T::KIND
    }

    /// The on-disk type code of this kind.
    pub fn disk_code(self) -> i32 {
        self as i32
    }

    /// Retrieve the size of an element of this data type, in bytes.
    pub fn size_of(self) -> usize {
        use NumericKind::*;
        match self {
            Byte | UByte => 1,
            Short | UShort => 2,
            Int | UInt | Float => 4,
            Double => 8,
        }
    }

    /// The fixed `(min, max)` range of integer kinds. Floating point kinds
    /// have no fixed range and yield `None`.
    pub fn range(self) -> Option<(f64, f64)> {
        use NumericKind::*;
        match self {
            Byte => Some((f64::from(i8::MIN), f64::from(i8::MAX))),
            Short => Some((f64::from(i16::MIN), f64::from(i16::MAX))),
            Int => Some((f64::from(i32::MIN), f64::from(i32::MAX))),
            UByte => Some((0., f64::from(u8::MAX))),
            UShort => Some((0., f64::from(u16::MAX))),
            UInt => Some((0., f64::from(u32::MAX))),
            Float | Double => None,
        }
    }

    /// Whether this is one of the two floating point kinds.
    pub fn is_float(self) -> bool {
        self == NumericKind::Float || self == NumericKind::Double
    }

    /// The unsigned kind used as the working type of a label volume
    /// stored with this kind.
    pub fn label_kind(self) -> NumericKind {
        use NumericKind::*;
        match self {
            Byte | UByte => UByte,
            Short | UShort => UShort,
            Int | UInt | Float | Double => UInt,
        }
    }

    /// The short name used by the MINC tools for this kind.
    pub fn name(self) -> &'static str {
        use NumericKind::*;
        match self {
            Byte => "byte",
            Short => "short",
            Int => "int",
            Float => "float",
            Double => "double",
            UByte => "ubyte",
            UShort => "ushort",
            UInt => "uint",
        }
    }
}

impl fmt::Display for NumericKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Class of a dimension.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, FromPrimitive)]
pub enum DimClass {
    /// MI_DIMCLASS_ANY
    Any = 0,
    /// MI_DIMCLASS_SPATIAL
    Spatial = 1,
    /// MI_DIMCLASS_TIME
    Time = 2,
    /// MI_DIMCLASS_SFREQUENCY
    SFrequency = 3,
    /// MI_DIMCLASS_TFREQUENCY
    TFrequency = 4,
    /// MI_DIMCLASS_USER
    User = 5,
    /// MI_DIMCLASS_RECORD
    Record = 6,
}

/// Order in which the dimensions of a container are traversed.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum DimOrder {
    /// Order in which the axes are laid out in the file.
    File,
    /// Order set through `set_apparent_dimension_order`, defaulting to
    /// the file order.
    Apparent,
}

/// Access mode of an opened container.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum OpenMode {
    /// MI2_OPEN_READ
    Read,
    /// MI2_OPEN_RDWR
    ReadWrite,
}

/// Name of the record dimension holding vector components.
pub const VECTOR_DIMENSION: &str = "vector_dimension";

/// Names of the three spatial world axes.
pub const SPATIAL_DIMENSIONS: [&str; 3] = ["xspace", "yspace", "zspace"];

#[cfg(test)]
mod tests {
    use super::NumericKind;

    #[test]
    fn disk_codes_round_trip() {
        for kind in NumericKind::ALL.iter() {
            let code = kind.disk_code();
            let back = NumericKind::from_disk_code(code).unwrap();
            assert_eq!(back.disk_code(), code);
            assert_eq!(back, *kind);
        }
    }

    #[test]
    fn unknown_codes_are_rejected() {
        // MI_TYPE_STRING and MI_TYPE_SCOMPLEX
        assert!(NumericKind::from_disk_code(7).is_err());
        assert!(NumericKind::from_disk_code(1000).is_err());
        assert!(NumericKind::from_disk_code(-1).is_err());
    }

    #[test]
    fn integer_ranges() {
        assert_eq!(NumericKind::UShort.range(), Some((0., 65535.)));
        assert_eq!(NumericKind::Byte.range(), Some((-128., 127.)));
        assert_eq!(NumericKind::Int.range(), Some((-2147483648., 2147483647.)));
        assert_eq!(NumericKind::Float.range(), None);
        assert_eq!(NumericKind::Double.range(), None);
    }

    #[test]
    fn widths() {
        assert_eq!(NumericKind::UByte.size_of(), 1);
        assert_eq!(NumericKind::Short.size_of(), 2);
        assert_eq!(NumericKind::UInt.size_of(), 4);
        assert_eq!(NumericKind::Double.size_of(), 8);
    }

    #[test]
    fn label_kinds_are_unsigned_and_wide_enough() {
        for kind in NumericKind::ALL.iter() {
            let label = kind.label_kind();
            assert!(!label.is_float());
            assert!(label.size_of() >= kind.size_of().min(4));
            assert_eq!(label.range().unwrap().0, 0.);
        }
    }
}
