// Copyright (c) The apitest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tensor metadata accessors and simple in-place operations.

use super::{element_facts, ensure_eq, fixture, Case, CaseContext, CaseError};
use ndarray::{s, Axis, ErrorKind};

pub(super) const CASES: &[Case] = &[
    Case::shared("tensor", "ConstructFromShape", construct_from_shape),
    Case::shared("tensor", "DataPtr", data_ptr),
    Case::shared("tensor", "Strides", strides),
    Case::shared("tensor", "Sizes", sizes),
    Case::shared("tensor", "ToType", to_type),
    Case::shared("tensor", "Numel", numel),
    Case::shared("tensor", "DimAndNdimension", dim_and_ndimension),
    Case::shared("tensor", "Contiguous", contiguous),
    Case::shared("tensor", "IsContiguous", is_contiguous),
    Case::shared("tensor", "Fill", fill),
    Case::shared("tensor", "Zero", zero),
    Case::shared("tensor", "Reshape", reshape),
    Case::shared("tensor", "Transpose", transpose),
    Case::shared("tensor", "IsStandardAfterTranspose", is_standard_after_transpose),
    Case::per_case("tensor", "AxisLengthsResult", axis_lengths_result),
    Case::per_case("tensor", "StridesResult", strides_result),
    Case::per_case("tensor", "ViewResult", view_result),
    Case::per_case("tensor", "IntoShapeResult", into_shape_result),
];

fn construct_from_shape(cx: &CaseContext<'_>) -> Result<(), CaseError> {
    let tensor = fixture();
    let mut file = cx.open_record()?;
    file.record(tensor.ndim())?.record(tensor.len())?;
    file.save()?;
    Ok(())
}

fn data_ptr(cx: &CaseContext<'_>) -> Result<(), CaseError> {
    let mut tensor = fixture();
    let mut file = cx.open_record()?;
    file.record(!tensor.as_ptr().is_null())?
        .record(!tensor.as_mut_ptr().is_null())?;
    file.save()?;
    Ok(())
}

fn strides(cx: &CaseContext<'_>) -> Result<(), CaseError> {
    let tensor = fixture();
    let mut file = cx.open_record()?;
    file.record(tensor.strides().len())?;
    file.save()?;
    Ok(())
}

fn sizes(cx: &CaseContext<'_>) -> Result<(), CaseError> {
    let tensor = fixture();
    let mut file = cx.open_record()?;
    file.record(tensor.shape().len())?
        .record_all(tensor.shape())?;
    file.save()?;
    Ok(())
}

fn to_type(cx: &CaseContext<'_>) -> Result<(), CaseError> {
    let double = fixture().mapv(f64::from);
    let facts = element_facts(&double);
    let mut file = cx.open_record()?;
    file.record(facts.name)?
        .record(facts.size)?
        .record(double[[0, 0, 0]])?;
    file.save()?;
    Ok(())
}

fn numel(cx: &CaseContext<'_>) -> Result<(), CaseError> {
    let tensor = fixture();
    let mut file = cx.open_record()?;
    file.record(tensor.len())?;
    file.save()?;
    Ok(())
}

fn dim_and_ndimension(cx: &CaseContext<'_>) -> Result<(), CaseError> {
    let tensor = fixture();
    let mut file = cx.open_record()?;
    file.record(tensor.ndim())?.record(tensor.shape().len())?;
    file.save()?;
    Ok(())
}

fn contiguous(cx: &CaseContext<'_>) -> Result<(), CaseError> {
    let tensor = fixture();
    let transposed = tensor.t();
    let standard = transposed.as_standard_layout();
    let mut file = cx.open_record()?;
    file.record(standard.is_standard_layout())?;
    file.save()?;
    Ok(())
}

fn is_contiguous(cx: &CaseContext<'_>) -> Result<(), CaseError> {
    let tensor = fixture();
    let mut file = cx.open_record()?;
    file.record(tensor.is_standard_layout())?;
    file.save()?;
    Ok(())
}

fn fill(cx: &CaseContext<'_>) -> Result<(), CaseError> {
    let mut tensor = fixture();
    tensor.fill(5.0);
    let mut file = cx.open_record()?;
    file.record(tensor[[0, 0, 0]])?;
    file.save()?;
    Ok(())
}

fn zero(cx: &CaseContext<'_>) -> Result<(), CaseError> {
    let mut tensor = fixture();
    tensor.fill(0.0);
    let mut file = cx.open_record()?;
    file.record(tensor[[0, 0, 0]])?;
    file.save()?;
    Ok(())
}

fn reshape(cx: &CaseContext<'_>) -> Result<(), CaseError> {
    let reshaped = fixture().into_shape((6, 4))?;
    let mut file = cx.open_record()?;
    file.record(reshaped.len_of(Axis(0)))?
        .record(reshaped.len_of(Axis(1)))?
        .record(reshaped.len())?;
    file.save()?;
    Ok(())
}

fn transpose(cx: &CaseContext<'_>) -> Result<(), CaseError> {
    let tensor = fixture();
    let mut transposed = tensor.view();
    transposed.swap_axes(0, 2);
    let mut file = cx.open_record()?;
    file.record(transposed.len_of(Axis(0)))?
        .record(transposed.len_of(Axis(2)))?;
    file.save()?;
    Ok(())
}

fn is_standard_after_transpose(cx: &CaseContext<'_>) -> Result<(), CaseError> {
    let tensor = fixture();
    let mut file = cx.open_record()?;
    file.record(tensor.t().is_standard_layout())?
        .record(tensor.t().t().is_standard_layout())?;
    file.save()?;
    Ok(())
}

fn axis_lengths_result(cx: &CaseContext<'_>) -> Result<(), CaseError> {
    let tensor = fixture();
    let last = tensor.ndim() - 1;
    ensure_eq("last axis length", Some(&4), tensor.shape().last())?;

    let mut file = cx.open_record()?;
    for axis in 0..tensor.ndim() {
        file.record(tensor.len_of(Axis(axis)))?;
    }
    file.record(tensor.len_of(Axis(last)))?;
    file.save()?;
    Ok(())
}

fn strides_result(cx: &CaseContext<'_>) -> Result<(), CaseError> {
    let tensor = fixture();
    // Standard layout always has a unit stride on the innermost axis.
    ensure_eq("innermost stride", Some(&1), tensor.strides().last())?;

    let mut file = cx.open_record()?;
    file.record(tensor.strides().len())?
        .record_all(tensor.strides())?
        .record(tensor.strides().iter().all(|&stride| stride > 0))?;
    file.save()?;
    Ok(())
}

fn view_result(cx: &CaseContext<'_>) -> Result<(), CaseError> {
    let tensor = fixture();
    let view = tensor.view();
    let mut file = cx.open_record()?;
    file.record(view.as_ptr() == tensor.as_ptr())?
        .record(view.len())?
        .record(view.shape() == tensor.shape())?;
    file.save()?;
    Ok(())
}

/// Reshapes a contiguous and a strided view of the fixture.
///
/// Each attempt records `1` followed by the new axis lengths when it succeeds,
/// or `0` when `ndarray` refuses it. Only a layout refusal counts as an
/// observation; any other shape error fails the case.
fn into_shape_result(cx: &CaseContext<'_>) -> Result<(), CaseError> {
    let tensor = fixture();
    let strided = tensor.slice(s![.., .., ..;2]);
    ensure_eq("strided shape", &[2, 3, 2][..], strided.shape())?;

    let mut file = cx.open_record()?;
    for (view, shape) in [(tensor.view(), (6, 4)), (strided, (3, 4))] {
        match view.into_shape(shape) {
            Ok(reshaped) => {
                file.record(true)?.record_all(reshaped.shape())?;
            }
            Err(error) if error.kind() == ErrorKind::IncompatibleLayout => {
                file.record(false)?;
            }
            Err(error) => return Err(error.into()),
        }
    }
    file.save()?;
    Ok(())
}
