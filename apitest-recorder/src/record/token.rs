// Copyright (c) The apitest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rendering of observed values into record tokens.
//!
//! The rendering is the compatibility contract with the golden files, so it is
//! fixed per type:
//!
//! | type                         | rendering                       |
//! |------------------------------|---------------------------------|
//! | `bool`                       | `0` or `1`                      |
//! | integers                     | decimal                         |
//! | `f32`, `f64`                 | fixed, six fractional digits    |
//! | NaN, infinities              | `nan`, `-nan`, `inf`, `-inf`    |
//! | `&str`, `String`, `char`     | verbatim (no whitespace)        |
//! | [`Ordinal`]                  | the wrapped discriminant        |

use crate::errors::UsageError;
use std::fmt;
use swrite::{swrite, SWrite};

/// A value that can be written to a record file as a single token.
pub trait Token {
    /// Appends the rendering of `self` to `out`.
    ///
    /// The rendering must be a single non-empty run of non-whitespace
    /// characters. Implementations for free-form text check this and return
    /// [`UsageError::InvalidToken`] otherwise.
    fn write_token(&self, out: &mut String) -> Result<(), UsageError>;
}

impl<T: Token + ?Sized> Token for &T {
    fn write_token(&self, out: &mut String) -> Result<(), UsageError> {
        (**self).write_token(out)
    }
}

impl Token for bool {
    fn write_token(&self, out: &mut String) -> Result<(), UsageError> {
        out.push(if *self { '1' } else { '0' });
        Ok(())
    }
}

macro_rules! integer_token {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Token for $ty {
                fn write_token(&self, out: &mut String) -> Result<(), UsageError> {
                    swrite!(out, "{}", self);
                    Ok(())
                }
            }
        )*
    };
}

integer_token!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

macro_rules! float_token {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Token for $ty {
                fn write_token(&self, out: &mut String) -> Result<(), UsageError> {
                    // Rust writes NaN as `NaN` and drops its sign.
                    if self.is_nan() {
                        out.push_str(if self.is_sign_negative() { "-nan" } else { "nan" });
                    } else {
                        swrite!(out, "{:.6}", self);
                    }
                    Ok(())
                }
            }
        )*
    };
}

float_token!(f32, f64);

impl Token for str {
    fn write_token(&self, out: &mut String) -> Result<(), UsageError> {
        if self.is_empty() || self.chars().any(char::is_whitespace) {
            return Err(UsageError::InvalidToken {
                token: self.to_owned(),
            });
        }
        out.push_str(self);
        Ok(())
    }
}

impl Token for String {
    fn write_token(&self, out: &mut String) -> Result<(), UsageError> {
        self.as_str().write_token(out)
    }
}

impl Token for char {
    fn write_token(&self, out: &mut String) -> Result<(), UsageError> {
        if self.is_whitespace() {
            return Err(UsageError::InvalidToken {
                token: self.to_string(),
            });
        }
        out.push(*self);
        Ok(())
    }
}

/// Records an enumerant by its integer discriminant rather than its name.
///
/// ```
/// use apitest_recorder::record::Ordinal;
///
/// # #[allow(dead_code)]
/// #[derive(Clone, Copy)]
/// enum Device { Cpu = 0, Cuda = 1 }
///
/// let token = Ordinal(Device::Cuda as i64);
/// assert_eq!(token.to_string(), "1");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ordinal(pub i64);

impl fmt::Display for Ordinal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Token for Ordinal {
    fn write_token(&self, out: &mut String) -> Result<(), UsageError> {
        self.0.write_token(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn render(token: impl Token) -> Result<String, UsageError> {
        let mut out = String::new();
        token.write_token(&mut out)?;
        Ok(out)
    }

    #[test_case(true, "1"; "true")]
    #[test_case(false, "0"; "false")]
    fn bools(value: bool, expected: &str) {
        assert_eq!(render(value).unwrap(), expected);
    }

    #[test]
    fn integers() {
        assert_eq!(render(24_i64).unwrap(), "24");
        assert_eq!(render(-1_i8).unwrap(), "-1");
        assert_eq!(render(96_usize).unwrap(), "96");
        assert_eq!(render(u128::MAX).unwrap(), u128::MAX.to_string());
    }

    #[test_case(5.0_f32, "5.000000"; "whole")]
    #[test_case(0.0_f32, "0.000000"; "zero")]
    #[test_case(-0.125_f32, "-0.125000"; "negative fraction")]
    fn floats_use_six_fractional_digits(value: f32, expected: &str) {
        assert_eq!(render(value).unwrap(), expected);
        assert_eq!(render(f64::from(value)).unwrap(), expected);
    }

    #[test_case(f32::NAN, f64::NAN, "nan"; "nan")]
    #[test_case(-f32::NAN, -f64::NAN, "-nan"; "negative nan")]
    #[test_case(f32::INFINITY, f64::INFINITY, "inf"; "infinity")]
    #[test_case(f32::NEG_INFINITY, f64::NEG_INFINITY, "-inf"; "negative infinity")]
    fn non_finite_floats(single: f32, double: f64, expected: &str) {
        assert_eq!(render(single).unwrap(), expected);
        assert_eq!(render(double).unwrap(), expected);
    }

    #[test]
    fn text_is_verbatim() {
        assert_eq!(render("Strided").unwrap(), "Strided");
        assert_eq!(render(String::from("RowMajor")).unwrap(), "RowMajor");
        assert_eq!(render('x').unwrap(), "x");
    }

    #[test_case(""; "empty")]
    #[test_case("two words"; "space")]
    #[test_case("tab\t"; "tab")]
    #[test_case("line\n"; "newline")]
    fn text_that_would_split_is_rejected(token: &str) {
        assert_eq!(
            render(token),
            Err(UsageError::InvalidToken {
                token: token.to_owned()
            })
        );
    }

    #[test]
    fn ordinal_renders_discriminant() {
        assert_eq!(render(Ordinal(3)).unwrap(), "3");
        assert_eq!(render(&Ordinal(-1)).unwrap(), "-1");
    }
}
