//! Miscellaneous volume-related functions
use crate::error::{MincError, Result};
use ndarray::{ArrayBase, ArrayView, ArrayViewMut, Data, DataMut, IxDyn, Slice};

/// Check that a region given by `start` and `count` fits in `shape`.
pub fn check_region(start: &[usize], count: &[usize], shape: &[usize]) -> Result<()> {
    let fits = start.len() == shape.len()
        && count.len() == shape.len()
        && start
            .iter()
            .zip(count)
            .zip(shape)
            .all(|((s, c), d)| s.checked_add(*c).map_or(false, |end| end <= *d));
    if fits {
        Ok(())
    } else {
        Err(MincError::OutOfBounds(start.to_vec(), count.to_vec()))
    }
}

/// View of the region of `array` starting at `start` with `count`
/// elements along each axis. The region must have been checked.
pub fn region<'a, S>(
    array: &'a ArrayBase<S, IxDyn>,
    start: &[usize],
    count: &[usize],
) -> ArrayView<'a, S::Elem, IxDyn>
where
    S: Data,
{
    array.slice_each_axis(|d| {
        let i = d.axis.index();
        Slice::from(start[i]..start[i] + count[i])
    })
}

/// Mutable counterpart of `region`.
pub fn region_mut<'a, S>(
    array: &'a mut ArrayBase<S, IxDyn>,
    start: &[usize],
    count: &[usize],
) -> ArrayViewMut<'a, S::Elem, IxDyn>
where
    S: DataMut,
{
    array.slice_each_axis_mut(|d| {
        let i = d.axis.index();
        Slice::from(start[i]..start[i] + count[i])
    })
}
