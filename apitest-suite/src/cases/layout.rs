// Copyright (c) The apitest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Memory layout: standard (row-major) vs. Fortran (column-major) order.

use super::{fixture, Case, CaseContext, CaseError, FIXTURE_SHAPE};
use apitest_recorder::record::Ordinal;
use ndarray::{Array, Order, ShapeBuilder};

pub(super) const CASES: &[Case] = &[
    Case::shared("layout", "Layout", layout),
    Case::shared("layout", "LayoutOrderConstants", layout_order_constants),
    Case::shared("layout", "LayoutEnumValues", layout_enum_values),
    Case::shared("layout", "LayoutOutputStream", layout_output_stream),
    Case::shared("layout", "LayoutWithFortranOrder", layout_with_fortran_order),
    Case::shared("layout", "LayoutWithConstant", layout_with_constant),
];

const ORDERS: [Order; 2] = [Order::RowMajor, Order::ColumnMajor];

/// The position of `order` in `ndarray`'s declaration of [`Order`].
///
/// `Order` is non-exhaustive, so it cannot be cast to an integer from outside
/// `ndarray`. A variant added later records as `-1`.
fn order_ordinal(order: Order) -> Ordinal {
    match order {
        Order::RowMajor => Ordinal(0),
        Order::ColumnMajor => Ordinal(1),
        _ => Ordinal(-1),
    }
}

/// The order a standard-layout tensor is stored in.
fn order_of(is_standard_layout: bool) -> Order {
    Order::row_major(is_standard_layout)
}

fn layout(cx: &CaseContext<'_>) -> Result<(), CaseError> {
    let tensor = fixture();
    let mut file = cx.open_record()?;
    file.record(tensor.is_standard_layout())?;
    file.save()?;
    Ok(())
}

fn layout_order_constants(cx: &CaseContext<'_>) -> Result<(), CaseError> {
    let mut file = cx.open_record()?;
    file.record(Order::C == Order::RowMajor)?
        .record(Order::F == Order::ColumnMajor)?
        .record(Order::C != Order::F)?;
    file.save()?;
    Ok(())
}

fn layout_enum_values(cx: &CaseContext<'_>) -> Result<(), CaseError> {
    let mut file = cx.open_record()?;
    for order in ORDERS {
        file.record(order_ordinal(order))?
            .record(order.is_row_major())?
            .record(order.is_column_major())?
            .record(order.transpose() == order)?;
    }
    file.save()?;
    Ok(())
}

fn layout_output_stream(cx: &CaseContext<'_>) -> Result<(), CaseError> {
    let mut file = cx.open_record()?;
    for order in ORDERS {
        file.record(format!("{order:?}"))?;
    }
    file.save()?;
    Ok(())
}

fn layout_with_fortran_order(cx: &CaseContext<'_>) -> Result<(), CaseError> {
    let tensor = Array::<f32, _>::zeros(FIXTURE_SHAPE.f());
    let mut file = cx.open_record()?;
    file.record(tensor.is_standard_layout())?
        .record(tensor.t().is_standard_layout())?
        .record(order_of(tensor.t().is_standard_layout()) == Order::C)?;
    file.record_all(tensor.strides())?;
    file.save()?;
    Ok(())
}

fn layout_with_constant(cx: &CaseContext<'_>) -> Result<(), CaseError> {
    let tensor = fixture();
    let order = order_of(tensor.is_standard_layout());
    let mut file = cx.open_record()?;
    file.record(order == Order::C)?
        .record(order == Order::RowMajor)?
        .record(order != Order::F)?
        .record(order != Order::ColumnMajor)?;
    file.save()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_ordinals_follow_declaration() {
        assert_eq!(order_ordinal(Order::C), Ordinal(0));
        assert_eq!(order_ordinal(Order::F), Ordinal(1));
        assert_eq!(order_ordinal(Order::RowMajor.transpose()), Ordinal(1));
    }
}
