// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Integer to `f64` conversion with a truncation check.

use core::fmt;

use crate::ScalarError;

/// 2^127, one past `i128::MAX` and the value `i128::MAX` rounds to.
#[allow(clippy::cast_precision_loss)]
const TWO_POW_127: f64 = (1_u128 << 127) as f64;

/// 2^128, the value `u128::MAX` rounds to.
const TWO_POW_128: f64 = TWO_POW_127 * 2.0;

/// Integer types that can be narrowed to `f64` with a truncation check.
pub trait SafeToDouble: Copy + fmt::Display {
    /// Nearest `f64` (IEEE round to nearest, ties to even).
    fn to_double(self) -> f64;

    /// Whether `value` (the result of [`SafeToDouble::to_double`]) converts
    /// back to exactly `self`.
    fn round_trips(self, value: f64) -> bool;
}

macro_rules! impl_lossless {
    ($($ty:ty),* $(,)?) => {$(
        impl SafeToDouble for $ty {
            #[inline]
            fn to_double(self) -> f64 {
                f64::from(self)
            }

            #[inline]
            fn round_trips(self, _value: f64) -> bool {
                true
            }
        }
    )*};
}

// Compared in a wider integer: casting straight back to `$ty` saturates at
// the type bound, which would make 2^63 look like `i64::MAX`.
macro_rules! impl_widened_check {
    ($($ty:ty => $wide:ty),* $(,)?) => {$(
        impl SafeToDouble for $ty {
            #[inline]
            #[allow(clippy::cast_precision_loss)]
            fn to_double(self) -> f64 {
                self as f64
            }

            #[inline]
            #[allow(
                clippy::cast_possible_truncation,
                clippy::cast_sign_loss,
                clippy::cast_lossless
            )]
            fn round_trips(self, value: f64) -> bool {
                (value as $wide) == (self as $wide)
            }
        }
    )*};
}

impl_lossless!(i8, i16, i32, u8, u16, u32);
impl_widened_check!(i64 => i128, u64 => u128, isize => i128, usize => u128);

impl SafeToDouble for i128 {
    #[inline]
    #[allow(clippy::cast_precision_loss)]
    fn to_double(self) -> f64 {
        self as f64
    }

    #[inline]
    #[allow(clippy::cast_possible_truncation)]
    fn round_trips(self, value: f64) -> bool {
        value < TWO_POW_127 && value as i128 == self
    }
}

impl SafeToDouble for u128 {
    #[inline]
    #[allow(clippy::cast_precision_loss)]
    fn to_double(self) -> f64 {
        self as f64
    }

    #[inline]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn round_trips(self, value: f64) -> bool {
        value < TWO_POW_128 && value as u128 == self
    }
}

/// Converts an integer to `f64`, asserting in debug builds that nothing was
/// lost.
///
/// The check is a precondition, not an error path: release builds return the
/// rounded value silently. Use [`try_scalar_safe_to_double`] to validate
/// untrusted input.
#[inline]
pub fn scalar_safe_to_double<T: SafeToDouble>(input: T) -> f64 {
    let value = input.to_double();
    debug_assert!(
        input.round_trips(value),
        "Conversion to double would result in truncation: {input}"
    );
    value
}

/// Converts an integer to `f64`, failing if the value does not round-trip.
pub fn try_scalar_safe_to_double<T: SafeToDouble>(input: T) -> Result<f64, ScalarError> {
    let value = input.to_double();
    if input.round_trips(value) {
        Ok(value)
    } else {
        Err(ScalarError::Truncation {
            ty: core::any::type_name::<T>(),
            value: input.to_string(),
        })
    }
}
