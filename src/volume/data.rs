//! In-memory voxel arrays.
//!
//! A [`VoxelData`] holds an `ndarray` array whose element type is one of
//! the eight kinds in the type registry. It is the only array container
//! exchanged between volumes, hyperslabs and storage engines, so the
//! working type of a volume is a runtime value rather than a type
//! parameter. Conversions between kinds go through real (`f64`) values.
//!
//! [`VoxelData`]: ./enum.VoxelData.html
use super::element::DataElement;
use super::util::{check_region, region, region_mut};
use crate::error::Result;
use crate::typedef::NumericKind;
use ndarray::{Array, ArrayD, Dimension, IxDyn};
use num_traits::AsPrimitive;

/// A voxel array of one of the supported kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum VoxelData {
    /// 8 bit signed integers.
    Byte(ArrayD<i8>),
    /// 16 bit signed integers.
    Short(ArrayD<i16>),
    /// 32 bit signed integers.
    Int(ArrayD<i32>),
    /// 32 bit floats.
    Float(ArrayD<f32>),
    /// 64 bit floats.
    Double(ArrayD<f64>),
    /// 8 bit unsigned integers.
    UByte(ArrayD<u8>),
    /// 16 bit unsigned integers.
    UShort(ArrayD<u16>),
    /// 32 bit unsigned integers.
    UInt(ArrayD<u32>),
}

macro_rules! dispatch {
    ($data: expr, $a: ident => $body: expr) => {
        match $data {
            VoxelData::Byte($a) => $body,
            VoxelData::Short($a) => $body,
            VoxelData::Int($a) => $body,
            VoxelData::Float($a) => $body,
            VoxelData::Double($a) => $body,
            VoxelData::UByte($a) => $body,
            VoxelData::UShort($a) => $body,
            VoxelData::UInt($a) => $body,
        }
    };
}

macro_rules! with_kind {
    ($kind: expr, $t: ident => $body: expr) => {
        match $kind {
            NumericKind::Byte => {
                type $t = i8;
                $body
            }
            NumericKind::Short => {
                type $t = i16;
                $body
            }
            NumericKind::Int => {
                type $t = i32;
                $body
            }
            NumericKind::Float => {
                type $t = f32;
                $body
            }
            NumericKind::Double => {
                type $t = f64;
                $body
            }
            NumericKind::UByte => {
                type $t = u8;
                $body
            }
            NumericKind::UShort => {
                type $t = u16;
                $body
            }
            NumericKind::UInt => {
                type $t = u32;
                $body
            }
        }
    };
}

impl VoxelData {
    /// Create a zero-filled array of the given kind and shape.
    pub fn zeros(kind: NumericKind, shape: &[usize]) -> Self {
        with_kind!(kind, T => T::wrap(ArrayD::<T>::zeros(IxDyn(shape))))
    }

    /// Create an array of the given kind from real values.
    pub fn from_reals(kind: NumericKind, reals: ArrayD<f64>) -> Self {
        with_kind!(kind, T => T::wrap(reals.mapv(T::from_real)))
    }

    /// The kind of the elements in this array.
    pub fn kind(&self) -> NumericKind {
        match self {
            VoxelData::Byte(_) => NumericKind::Byte,
            VoxelData::Short(_) => NumericKind::Short,
            VoxelData::Int(_) => NumericKind::Int,
            VoxelData::Float(_) => NumericKind::Float,
            VoxelData::Double(_) => NumericKind::Double,
            VoxelData::UByte(_) => NumericKind::UByte,
            VoxelData::UShort(_) => NumericKind::UShort,
            VoxelData::UInt(_) => NumericKind::UInt,
        }
    }

    /// The shape of the array.
    pub fn shape(&self) -> &[usize] {
        dispatch!(self, a => a.shape())
    }

    /// The number of axes of the array.
    pub fn ndim(&self) -> usize {
        self.shape().len()
    }

    /// The total number of elements.
    pub fn len(&self) -> usize {
        dispatch!(self, a => a.len())
    }

    /// Whether the array holds no elements at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Convert every element to a real value.
    pub fn to_reals(&self) -> ArrayD<f64> {
        dispatch!(self, a => a.mapv(|v| -> f64 { v.as_() }))
    }

    /// Obtain a copy of this array with elements of the given kind.
    /// Conversion to an integer kind rounds and saturates.
    pub fn cast(&self, kind: NumericKind) -> VoxelData {
        if kind == self.kind() {
            self.clone()
        } else {
            VoxelData::from_reals(kind, self.to_reals())
        }
    }

    /// Consuming version of `cast`, which avoids a copy when the kind
    /// already matches.
    pub fn into_kind(self, kind: NumericKind) -> VoxelData {
        if kind == self.kind() {
            self
        } else {
            VoxelData::from_reals(kind, self.to_reals())
        }
    }

    /// Borrow the inner array if it holds elements of type `T`.
    pub fn as_array<T: DataElement>(&self) -> Option<&ArrayD<T>> {
        T::unwrap_ref(self)
    }

    /// Mutably borrow the inner array if it holds elements of type `T`.
    pub fn as_array_mut<T: DataElement>(&mut self) -> Option<&mut ArrayD<T>> {
        T::unwrap_mut(self)
    }

    /// Take the inner array if it holds elements of type `T`.
    pub fn into_array<T: DataElement>(self) -> Option<ArrayD<T>> {
        T::unwrap(self)
    }

    /// Obtain the contents as an array of type `T`, converting if needed.
    pub fn to_array<T: DataElement>(&self) -> ArrayD<T> {
        match T::unwrap_ref(self) {
            Some(a) => a.clone(),
            None => self.to_reals().mapv(T::from_real),
        }
    }

    /// Minimum and maximum of the array as real values, ignoring NaN.
    /// Returns `None` for an empty array.
    pub fn min_max(&self) -> Option<(f64, f64)> {
        if self.is_empty() {
            return None;
        }
        let (min, max) = dispatch!(self, a => a.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(lo, hi), v| {
                let v: f64 = v.as_();
                (lo.min(v), hi.max(v))
            }
        ));
        Some((min, max))
    }

    /// Arithmetic mean of the array as a real value.
    pub fn mean(&self) -> Option<f64> {
        if self.is_empty() {
            return None;
        }
        let sum: f64 = dispatch!(self, a => a.iter().map(|v| -> f64 { v.as_() }).sum());
        Some(sum / self.len() as f64)
    }

    /// Set every element to the given real value.
    pub fn fill(&mut self, value: f64) {
        dispatch!(self, a => a.fill(DataElement::from_real(value)))
    }

    /// Apply a function to the real value of every element, keeping the kind.
    pub fn map_reals<F>(&self, f: F) -> VoxelData
    where
        F: Fn(f64) -> f64,
    {
        dispatch!(self, a => map_converted(a, &f))
    }

    /// Copy out the region starting at `start` with `count` elements along
    /// each axis.
    ///
    /// # Errors
    ///
    /// - `MincError::OutOfBounds` if the region does not fit in the array.
    pub fn region(&self, start: &[usize], count: &[usize]) -> Result<VoxelData> {
        check_region(start, count, self.shape())?;
        Ok(dispatch!(self, a => DataElement::wrap(region(a, start, count).to_owned())))
    }

    /// Overwrite the region starting at `start` with the contents of
    /// `src`, converted to this array's kind.
    ///
    /// # Errors
    ///
    /// - `MincError::OutOfBounds` if `src` placed at `start` does not fit.
    pub fn assign_region(&mut self, start: &[usize], src: &VoxelData) -> Result<()> {
        check_region(start, src.shape(), self.shape())?;
        dispatch!(self, a => assign_converted(a, start, src));
        Ok(())
    }

    /// Reorder the axes so that axis `i` of the result is axis `axes[i]`
    /// of this array. The result is in standard layout.
    pub fn permuted(self, axes: &[usize]) -> VoxelData {
        dispatch!(self, a => DataElement::wrap(
            a.permuted_axes(IxDyn(axes)).as_standard_layout().into_owned()
        ))
    }
}

fn map_converted<T, F>(a: &ArrayD<T>, f: &F) -> VoxelData
where
    T: DataElement,
    F: Fn(f64) -> f64,
{
    T::wrap(a.mapv(|v| T::from_real(f(v.as_()))))
}

fn assign_converted<T: DataElement>(dst: &mut ArrayD<T>, start: &[usize], src: &VoxelData) {
    let values = src.to_array::<T>();
    region_mut(dst, start, values.shape()).assign(&values);
}

impl<T, D> From<Array<T, D>> for VoxelData
where
    T: DataElement,
    D: Dimension,
{
    fn from(array: Array<T, D>) -> Self {
        T::wrap(array.into_dyn())
    }
}

#[cfg(test)]
mod tests {
    use super::VoxelData;
    use crate::typedef::NumericKind;
    use ndarray::{Array, Array3, IxDyn};

    fn ramp() -> VoxelData {
        Array::from_shape_vec((2, 3, 4), (0..24).map(|x| x as f64).collect())
            .unwrap()
            .into()
    }

    #[test]
    fn zeros_have_kind_and_shape() {
        for kind in NumericKind::ALL.iter() {
            let z = VoxelData::zeros(*kind, &[2, 3]);
            assert_eq!(z.kind(), *kind);
            assert_eq!(z.shape(), &[2, 3]);
            assert_eq!(z.min_max(), Some((0., 0.)));
        }
    }

    #[test]
    fn cast_rounds_to_integers() {
        let d: VoxelData = Array::from_shape_vec(IxDyn(&[3]), vec![0.4f64, 1.6, -2.])
            .unwrap()
            .into();
        let u = d.cast(NumericKind::UByte);
        assert_eq!(u.as_array::<u8>().unwrap().as_slice().unwrap(), &[0, 2, 0]);
        let s = d.cast(NumericKind::Short);
        assert_eq!(s.as_array::<i16>().unwrap().as_slice().unwrap(), &[0, 2, -2]);
    }

    #[test]
    fn stats() {
        let d = ramp();
        assert_eq!(d.min_max(), Some((0., 23.)));
        assert_eq!(d.mean(), Some(11.5));
        assert_eq!(VoxelData::zeros(NumericKind::Float, &[0, 3]).min_max(), None);
    }

    #[test]
    fn region_and_assign() {
        let mut d = ramp();
        let r = d.region(&[1, 0, 2], &[1, 3, 2]).unwrap();
        assert_eq!(r.shape(), &[1, 3, 2]);
        assert_eq!(
            r.as_array::<f64>().unwrap().iter().cloned().collect::<Vec<_>>(),
            vec![14., 15., 18., 19., 22., 23.]
        );
        assert!(d.region(&[1, 0, 3], &[1, 3, 2]).is_err());

        let patch: VoxelData = Array3::<u16>::from_elem((1, 1, 2), 100).into();
        d.assign_region(&[0, 2, 1], &patch).unwrap();
        let a = d.as_array::<f64>().unwrap();
        assert_eq!(a[[0, 2, 1]], 100.);
        assert_eq!(a[[0, 2, 2]], 100.);
        assert_eq!(a[[0, 2, 3]], 11.);
        assert!(d.assign_region(&[1, 2, 3], &patch).is_err());
    }

    #[test]
    fn permuted_axes() {
        let d = ramp().permuted(&[2, 0, 1]);
        assert_eq!(d.shape(), &[4, 2, 3]);
        let a = d.as_array::<f64>().unwrap();
        assert_eq!(a[[3, 1, 2]], 23.);
        assert_eq!(a[[1, 0, 1]], 5.);
    }

    #[test]
    fn map_keeps_kind() {
        let d: VoxelData = Array3::<u8>::from_elem((2, 2, 2), 3).into();
        let m = d.map_reals(|v| v * 2.);
        assert_eq!(m.kind(), NumericKind::UByte);
        assert_eq!(m.min_max(), Some((6., 6.)));
    }
}
