// Copyright (c) The apitest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Element type classification.

use super::{element_facts, fixture, Case, CaseContext, CaseError};
use apitest_recorder::record::Ordinal;
use ndarray::Array;
use num_complex::Complex;

pub(super) const CASES: &[Case] = &[
    Case::shared("scalar_type", "IsComplex", is_complex),
    Case::shared("scalar_type", "IsFloatingPoint", is_floating_point),
    Case::shared("scalar_type", "IsSigned", is_signed),
    Case::shared("scalar_type", "ElementSize", element_size),
    Case::shared("scalar_type", "ScalarType", scalar_type),
];

fn is_complex(cx: &CaseContext<'_>) -> Result<(), CaseError> {
    let complex_float = Array::<Complex<f32>, _>::ones((2, 3));
    let complex_double = Array::<Complex<f64>, _>::ones((2, 3));

    let mut file = cx.open_record()?;
    file.record(element_facts(&fixture()).is_complex)?
        .record(element_facts(&complex_float).is_complex)?
        .record(element_facts(&complex_double).is_complex)?;
    file.save()?;
    Ok(())
}

fn is_floating_point(cx: &CaseContext<'_>) -> Result<(), CaseError> {
    let double = Array::<f64, _>::ones((2, 3));
    let int = Array::<i32, _>::ones((2, 3));
    let long = Array::<i64, _>::ones((2, 3));

    let mut file = cx.open_record()?;
    file.record(element_facts(&fixture()).is_floating_point)?
        .record(element_facts(&double).is_floating_point)?
        .record(element_facts(&int).is_floating_point)?
        .record(element_facts(&long).is_floating_point)?;
    file.save()?;
    Ok(())
}

fn is_signed(cx: &CaseContext<'_>) -> Result<(), CaseError> {
    let int = Array::<i32, _>::ones((2, 3));
    let long = Array::<i64, _>::ones((2, 3));
    let byte = Array::<u8, _>::ones((2, 3));
    let boolean = Array::from_elem((2, 3), true);

    let mut file = cx.open_record()?;
    file.record(element_facts(&fixture()).is_signed)?
        .record(element_facts(&int).is_signed)?
        .record(element_facts(&long).is_signed)?
        .record(element_facts(&byte).is_signed)?
        .record(element_facts(&boolean).is_signed)?;
    file.save()?;
    Ok(())
}

fn element_size(cx: &CaseContext<'_>) -> Result<(), CaseError> {
    let tensor = fixture();
    let double = tensor.mapv(f64::from);
    let complex = tensor.mapv(|x| Complex::new(x, 0.0));

    let mut file = cx.open_record()?;
    for facts in [
        element_facts(&tensor),
        element_facts(&double),
        element_facts(&complex),
    ] {
        file.record(facts.name)?.record(facts.size)?;
    }
    file.save()?;
    Ok(())
}

fn scalar_type(cx: &CaseContext<'_>) -> Result<(), CaseError> {
    let tensor = fixture();
    let double = tensor.mapv(f64::from);
    let long = tensor.mapv(|x| x as i64);
    let boolean = tensor.mapv(|x| x != 0.0);

    let mut file = cx.open_record()?;
    for kind in [
        element_facts(&tensor).kind,
        element_facts(&double).kind,
        element_facts(&long).kind,
        element_facts(&boolean).kind,
    ] {
        file.record(Ordinal(kind as i64))?;
    }
    file.save()?;
    Ok(())
}
