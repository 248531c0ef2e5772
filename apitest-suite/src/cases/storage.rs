// Copyright (c) The apitest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Backing memory: data pointers, offsets and sizes.

use super::{ensure_eq, fixture, Case, CaseContext, CaseError};
use ndarray::{s, ArrayBase, Dimension, RawData};

pub(super) const CASES: &[Case] = &[
    Case::shared("storage", "Storage", storage),
    Case::shared("storage", "StorageOffset", storage_offset),
    Case::shared("storage", "HasStorage", has_storage),
    Case::shared("storage", "StorageNbytes", storage_nbytes),
    Case::shared("storage", "SlicedTensorStorageOffset", sliced_tensor_storage_offset),
    Case::shared("storage", "StorageDataPtr", storage_data_ptr),
];

/// Offset of `view`'s first element from `base`'s, in elements.
///
/// Both must point into the same allocation; this only compares addresses.
fn element_offset<S, T, D, E>(base: &ArrayBase<S, D>, view: &ArrayBase<T, E>) -> isize
where
    S: RawData,
    T: RawData<Elem = S::Elem>,
    D: Dimension,
    E: Dimension,
{
    let size = std::mem::size_of::<S::Elem>() as isize;
    (view.as_ptr() as isize - base.as_ptr() as isize) / size
}

fn storage(cx: &CaseContext<'_>) -> Result<(), CaseError> {
    let tensor = fixture();
    let mut file = cx.open_record()?;
    file.record(!tensor.as_ptr().is_null())?;
    file.save()?;
    Ok(())
}

fn storage_offset(cx: &CaseContext<'_>) -> Result<(), CaseError> {
    let tensor = fixture();
    let mut file = cx.open_record()?;
    file.record(element_offset(&tensor, &tensor))?;
    file.save()?;
    Ok(())
}

fn has_storage(cx: &CaseContext<'_>) -> Result<(), CaseError> {
    let tensor = fixture();
    let mut file = cx.open_record()?;
    file.record(tensor.as_slice_memory_order().is_some())?;
    file.save()?;
    Ok(())
}

fn storage_nbytes(cx: &CaseContext<'_>) -> Result<(), CaseError> {
    let tensor = fixture();
    let nbytes = tensor
        .as_slice_memory_order()
        .map_or(0, std::mem::size_of_val);
    // 2 * 3 * 4 elements of 4 bytes each.
    let expected_nbytes = 24 * std::mem::size_of::<f32>();

    let mut file = cx.open_record()?;
    file.record(nbytes)?
        .record(expected_nbytes)?
        .record(nbytes >= expected_nbytes)?;
    file.save()?;
    Ok(())
}

fn sliced_tensor_storage_offset(cx: &CaseContext<'_>) -> Result<(), CaseError> {
    let tensor = fixture();
    let sliced = tensor.slice(s![1..2, .., ..]);
    ensure_eq("sliced shape", &[1, 3, 4][..], sliced.shape())?;

    let offset = element_offset(&tensor, &sliced);
    let shares_storage = tensor
        .as_slice_memory_order()
        .is_some_and(|memory| memory.as_ptr_range().contains(&sliced.as_ptr()));

    let mut file = cx.open_record()?;
    file.record(shares_storage)?
        .record(offset)?
        .record(offset > 0)?;
    file.save()?;
    Ok(())
}

fn storage_data_ptr(cx: &CaseContext<'_>) -> Result<(), CaseError> {
    let tensor = fixture();
    let storage_ptr = tensor.as_slice_memory_order().map(<[f32]>::as_ptr);
    let mut file = cx.open_record()?;
    file.record(storage_ptr == Some(tensor.as_ptr()))?;
    file.save()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Axis;

    #[test]
    fn element_offset_counts_elements_across_dimensions() {
        let tensor = fixture();
        assert_eq!(element_offset(&tensor, &tensor), 0);
        assert_eq!(element_offset(&tensor, &tensor.slice(s![1.., .., ..])), 12);

        // A lower-dimensional view into the same memory.
        let row = tensor.index_axis(Axis(0), 1);
        assert_eq!(element_offset(&tensor, &row.index_axis(Axis(0), 2)), 20);
    }
}
