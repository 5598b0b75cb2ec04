//! This module defines the data element API, which binds the primitive
//! numeric types used for voxel values to their `NumericKind` and lets
//! the volume API move them in and out of a `VoxelData` array.
use super::data::VoxelData;
use crate::typedef::NumericKind;
use ndarray::ArrayD;
use num_traits::{AsPrimitive, Zero};
use std::fmt::Debug;

/// Trait type for characterizing a MINC data element, implemented for
/// the primitive numeric types which are used by the crate to represent
/// voxel values.
pub trait DataElement: 'static + Sized + Copy + Debug + Zero + AsPrimitive<f64> {
    /// The kind mapped to the type T
    const KIND: NumericKind;

    /// Convert a real value into this type. Integer types round to the
    /// nearest value and saturate at their boundaries.
    fn from_real(value: f64) -> Self;

    /// Wrap an array of this element type.
    fn wrap(array: ArrayD<Self>) -> VoxelData;

    /// Borrow the array inside `data` if it holds this element type.
    fn unwrap_ref(data: &VoxelData) -> Option<&ArrayD<Self>>;

    /// Mutably borrow the array inside `data` if it holds this element type.
    fn unwrap_mut(data: &mut VoxelData) -> Option<&mut ArrayD<Self>>;

    /// Take the array out of `data` if it holds this element type.
    fn unwrap(data: VoxelData) -> Option<ArrayD<Self>>;
}

macro_rules! impl_data_element {
    ($t: ty, $kind: ident, $variant: ident, |$v: ident| $conv: expr) => {
        impl DataElement for $t {
            const KIND: NumericKind = NumericKind::$kind;

            fn from_real($v: f64) -> Self {
                $conv
            }

            fn wrap(array: ArrayD<Self>) -> VoxelData {
                VoxelData::$variant(array)
            }

            fn unwrap_ref(data: &VoxelData) -> Option<&ArrayD<Self>> {
                match data {
                    VoxelData::$variant(a) => Some(a),
                    _ => None,
                }
            }

            fn unwrap_mut(data: &mut VoxelData) -> Option<&mut ArrayD<Self>> {
                match data {
                    VoxelData::$variant(a) => Some(a),
                    _ => None,
                }
            }

            fn unwrap(data: VoxelData) -> Option<ArrayD<Self>> {
                match data {
                    VoxelData::$variant(a) => Some(a),
                    _ => None,
                }
            }
        }
    };
}

// `as` casts from floats saturate and map NaN to zero
impl_data_element!(i8, Byte, Byte, |v| v.round() as i8);
impl_data_element!(i16, Short, Short, |v| v.round() as i16);
impl_data_element!(i32, Int, Int, |v| v.round() as i32);
impl_data_element!(u8, UByte, UByte, |v| v.round() as u8);
impl_data_element!(u16, UShort, UShort, |v| v.round() as u16);
impl_data_element!(u32, UInt, UInt, |v| v.round() as u32);
impl_data_element!(f32, Float, Float, |v| v as f32);
impl_data_element!(f64, Double, Double, |v| v);

#[cfg(test)]
mod tests {
    use super::DataElement;
    use crate::typedef::NumericKind;

    #[test]
    fn integer_conversion_rounds_and_saturates() {
        assert_eq!(u8::from_real(3.6), 4);
        assert_eq!(u8::from_real(-3.), 0);
        assert_eq!(u8::from_real(300.), 255);
        assert_eq!(i16::from_real(-2.5), -3);
        assert_eq!(i8::from_real(1e9), 127);
        assert_eq!(u32::from_real(f64::NAN), 0);
    }

    #[test]
    fn kinds() {
        assert_eq!(<u16 as DataElement>::KIND, NumericKind::UShort);
        assert_eq!(<f32 as DataElement>::KIND, NumericKind::Float);
        assert_eq!(<i32 as DataElement>::KIND, NumericKind::Int);
    }
}
