// Copyright (c) The apitest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Element type facts.
//!
//! `ndarray` is generic over its element type and has no runtime dtype, so the
//! facts here are constants written down per Rust type in the table below.
//! Cases that record them observe which type `ndarray` produced (for example
//! the result of `mapv`), not a property `ndarray` reports itself.

use ndarray::{ArrayBase, RawData};
use num_complex::Complex;

/// Numbering of element kinds, as written to golden files.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScalarKind {
    UInt8 = 0,
    Int32 = 3,
    Int64 = 4,
    Float32 = 6,
    Float64 = 7,
    Complex64 = 9,
    Complex128 = 10,
    Bool = 11,
}

/// Static facts about a tensor element type.
pub trait ElementKind: Sized + 'static {
    /// Short type name as written in golden files.
    const NAME: &'static str;
    /// The numbered kind.
    const KIND: ScalarKind;
    /// True for complex numbers.
    const IS_COMPLEX: bool = false;
    /// True for real and complex floating point.
    const IS_FLOATING_POINT: bool = false;
    /// True if the type can represent negative values.
    const IS_SIGNED: bool;
}

macro_rules! element_kind {
    ($($ty:ty => $name:literal, $kind:ident { $($field:ident = $value:expr),* $(,)? }),* $(,)?) => {
        $(
            impl ElementKind for $ty {
                const NAME: &'static str = $name;
                const KIND: ScalarKind = ScalarKind::$kind;
                $(const $field: bool = $value;)*
            }
        )*
    };
}

element_kind! {
    bool => "bool", Bool { IS_SIGNED = false },
    u8 => "uint8", UInt8 { IS_SIGNED = false },
    i32 => "int32", Int32 { IS_SIGNED = true },
    i64 => "int64", Int64 { IS_SIGNED = true },
    f32 => "float32", Float32 { IS_SIGNED = true, IS_FLOATING_POINT = true },
    f64 => "float64", Float64 { IS_SIGNED = true, IS_FLOATING_POINT = true },
    Complex<f32> => "complex64", Complex64 {
        IS_SIGNED = true, IS_FLOATING_POINT = true, IS_COMPLEX = true,
    },
    Complex<f64> => "complex128", Complex128 {
        IS_SIGNED = true, IS_FLOATING_POINT = true, IS_COMPLEX = true,
    },
}

/// [`ElementKind`] facts read off a tensor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ElementFacts {
    /// See [`ElementKind::NAME`].
    pub name: &'static str,
    /// See [`ElementKind::KIND`].
    pub kind: ScalarKind,
    pub is_complex: bool,
    pub is_floating_point: bool,
    pub is_signed: bool,
    /// Size of one element in bytes.
    pub size: usize,
}

/// Returns the element facts for `tensor`'s element type.
pub fn element_facts<S, D>(_tensor: &ArrayBase<S, D>) -> ElementFacts
where
    S: RawData,
    S::Elem: ElementKind,
{
    ElementFacts {
        name: <S::Elem as ElementKind>::NAME,
        kind: <S::Elem as ElementKind>::KIND,
        is_complex: <S::Elem as ElementKind>::IS_COMPLEX,
        is_floating_point: <S::Elem as ElementKind>::IS_FLOATING_POINT,
        is_signed: <S::Elem as ElementKind>::IS_SIGNED,
        size: std::mem::size_of::<S::Elem>(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array;

    #[test]
    fn facts_follow_element_type() {
        let facts = element_facts(&Array::<Complex<f32>, _>::zeros(3));
        assert_eq!(
            facts,
            ElementFacts {
                name: "complex64",
                kind: ScalarKind::Complex64,
                is_complex: true,
                is_floating_point: true,
                is_signed: true,
                size: 8,
            }
        );
        assert_eq!(element_facts(&Array::from_elem(2, true)).size, 1);
        assert!(!element_facts(&Array::<u8, _>::zeros(2)).is_signed);
        assert_eq!(element_facts(&Array::<i64, _>::zeros(2)).kind as i64, 4);
    }
}
