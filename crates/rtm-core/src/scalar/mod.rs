// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Backend-abstracted `f64` scalar arithmetic.
//!
//! [`Scalar`] is the operation set. Two implementations exist:
//!
//! - [`PortableScalar`]: a plain `f64` with every operation defined through
//!   ordinary arithmetic and `libm`. This is the reference definition and is
//!   compiled on every target.
//! - `Sse2Scalar`: the value lives in lane 0 of an `__m128d` register
//!   (the other lane carries a copy). Operations with an SSE2 instruction
//!   sequence use it; the transcendentals have none and evaluate the same
//!   `libm` routine on the extracted lane. Compiled on x86/x86_64 with SSE2.
//!
//! [`Scalard`] names the backend the build selected. The `scalar_*` free
//! functions take and return raw `f64` and route through it; only
//! [`scalar_set`] and [`scalar_cast`] cross the register boundary.
//!
//! Equivalence contract:
//! - Both backends return the same value for every input where the operation
//!   defines a result, bit for bit, including signed zeros, subnormals and
//!   infinities. Any NaN is equivalent to any other NaN.
//! - `min`, `max` and `clamp` do not define which operand survives when one is
//!   NaN. The portable backend follows `f64::min`/`f64::max` (the non-NaN
//!   operand wins); SSE2 `minpd`/`maxpd` return the second operand. This is
//!   left as is.

use core::cmp::Ordering;
use core::fmt;
use core::ops::{Add, Div, Mul, Neg, Sub};

mod convert;
mod portable;
#[cfg(all(
    any(target_arch = "x86", target_arch = "x86_64"),
    target_feature = "sse2"
))]
mod sse2;

pub use convert::{scalar_safe_to_double, try_scalar_safe_to_double, SafeToDouble};
pub use portable::PortableScalar;
#[cfg(all(
    any(target_arch = "x86", target_arch = "x86_64"),
    target_feature = "sse2"
))]
pub use sse2::Sse2Scalar;

/// The scalar backend selected for this build.
#[cfg(all(
    any(target_arch = "x86", target_arch = "x86_64"),
    target_feature = "sse2",
    not(feature = "no_intrinsics")
))]
pub type Scalard = Sse2Scalar;

/// The scalar backend selected for this build.
#[cfg(not(all(
    any(target_arch = "x86", target_arch = "x86_64"),
    target_feature = "sse2",
    not(feature = "no_intrinsics")
)))]
pub type Scalard = PortableScalar;

/// Default threshold for [`scalar_near_equal_default`].
pub const NEAR_EQUAL_THRESHOLD: f64 = 0.00001;

/// Identifies a scalar backend implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BackendKind {
    /// Plain `f64` arithmetic plus `libm`.
    Portable,
    /// SSE2 `__m128d` register, value in lane 0.
    Sse2,
}

impl BackendKind {
    /// Stable lowercase name (`"portable"`, `"sse2"`).
    pub const fn name(self) -> &'static str {
        match self {
            Self::Portable => "portable",
            Self::Sse2 => "sse2",
        }
    }

    /// Whether the backend runs on hardware vector registers.
    pub const fn is_accelerated(self) -> bool {
        matches!(self, Self::Sse2)
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returns the backend [`Scalard`] is bound to in this build.
pub const fn active_backend() -> BackendKind {
    Scalard::BACKEND
}

/// Scalar `f64` arithmetic with interchangeable backends.
///
/// Implementations must agree with [`PortableScalar`] on every input the
/// operation defines (see the module docs for the NaN carve-out on
/// `min`/`max`/`clamp`). Arithmetic operators are required so generic code
/// can write `a - b` without going through `f64`.
pub trait Scalar:
    Copy
    + fmt::Debug
    + PartialEq
    + PartialOrd
    + Send
    + Sync
    + 'static
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
{
    /// Which implementation this is.
    const BACKEND: BackendKind;

    /// Creates a scalar from a floating point value.
    fn from_f64(value: f64) -> Self;

    /// Extracts the floating point value. Exact inverse of [`Scalar::from_f64`].
    fn to_f64(self) -> f64;

    /// Largest integral value not greater than `self`.
    ///
    /// `floor(1.8) = 1.0`, `floor(-1.8) = -2.0`.
    fn floor(self) -> Self;

    /// Smallest integral value not less than `self`.
    ///
    /// `ceil(1.8) = 2.0`, `ceil(-1.8) = -1.0`.
    fn ceil(self) -> Self;

    /// Bounds `self` to `[min, max]` as `min(max(self, min), max)`.
    ///
    /// `min > max` is a caller error, checked in debug builds; release builds
    /// return `max` for such ranges.
    fn clamp(self, min: Self, max: Self) -> Self {
        debug_assert!(
            min.partial_cmp(&max) != Some(Ordering::Greater),
            "invalid clamp range: {min:?} > {max:?}"
        );
        self.max(min).min(max)
    }

    /// Absolute value. Clears the sign bit, so NaN stays NaN.
    fn abs(self) -> Self;

    /// Square root. Negative inputs yield NaN.
    fn sqrt(self) -> Self;

    /// `1 / sqrt(self)`. Zero yields `+Inf`.
    fn sqrt_reciprocal(self) -> Self {
        self.sqrt().reciprocal()
    }

    /// `1 / self`. Signed zeros yield signed infinities.
    fn reciprocal(self) -> Self;

    /// Sine of `self` (radians).
    fn sin(self) -> Self;

    /// Cosine of `self` (radians).
    fn cos(self) -> Self;

    /// Sine and cosine of `self` (radians).
    ///
    /// Results are identical to calling [`Scalar::sin`] and [`Scalar::cos`]
    /// separately.
    fn sin_cos(self) -> (Self, Self) {
        (self.sin(), self.cos())
    }

    /// Arc cosine in `[0, π]`. Inputs outside `[-1, 1]` yield NaN.
    fn acos(self) -> Self;

    /// Arc tangent of `self / other`, using both signs to pick the quadrant.
    fn atan2(self, other: Self) -> Self;

    /// The smaller of the two values.
    fn min(self, other: Self) -> Self;

    /// The larger of the two values.
    fn max(self, other: Self) -> Self;

    /// `abs(self - other) < threshold`. Strict: a difference equal to the
    /// threshold is not near.
    fn near_equal(self, other: Self, threshold: Self) -> bool;

    /// False for NaN and ±Inf.
    fn is_finite(self) -> bool;

    /// Rounds half away from zero: `round(1.5) = 2`, `round(-1.5) = -2`.
    fn symmetric_round(self) -> Self;

    /// `self - floor(self)`; non-negative for finite inputs of either sign.
    fn fraction(self) -> Self {
        self - self.floor()
    }
}

#[inline]
fn unary(input: f64, op: impl FnOnce(Scalard) -> Scalard) -> f64 {
    op(Scalard::from_f64(input)).to_f64()
}

#[inline]
fn binary(lhs: f64, rhs: f64, op: impl FnOnce(Scalard, Scalard) -> Scalard) -> f64 {
    op(Scalard::from_f64(lhs), Scalard::from_f64(rhs)).to_f64()
}

/// Creates a scalar from a floating point value.
#[inline]
pub fn scalar_set(value: f64) -> Scalard {
    Scalard::from_f64(value)
}

/// Casts a scalar back into a floating point value.
#[inline]
pub fn scalar_cast(input: Scalard) -> f64 {
    input.to_f64()
}

/// Largest integral value not greater than `input`.
///
/// `scalar_floor(1.8) = 1.0`, `scalar_floor(-1.8) = -2.0`.
#[inline]
pub fn scalar_floor(input: f64) -> f64 {
    unary(input, Scalar::floor)
}

/// Smallest integral value not less than `input`.
///
/// `scalar_ceil(1.8) = 2.0`, `scalar_ceil(-1.8) = -1.0`.
#[inline]
pub fn scalar_ceil(input: f64) -> f64 {
    unary(input, Scalar::ceil)
}

/// Returns `input` bounded to `[min, max]`.
#[inline]
pub fn scalar_clamp(input: f64, min: f64, max: f64) -> f64 {
    Scalard::from_f64(input)
        .clamp(Scalard::from_f64(min), Scalard::from_f64(max))
        .to_f64()
}

/// Absolute value of `input`.
#[inline]
pub fn scalar_abs(input: f64) -> f64 {
    unary(input, Scalar::abs)
}

/// Square root of `input`.
#[inline]
pub fn scalar_sqrt(input: f64) -> f64 {
    unary(input, Scalar::sqrt)
}

/// Reciprocal square root of `input`.
#[inline]
pub fn scalar_sqrt_reciprocal(input: f64) -> f64 {
    unary(input, Scalar::sqrt_reciprocal)
}

/// Reciprocal of `input`.
#[inline]
pub fn scalar_reciprocal(input: f64) -> f64 {
    unary(input, Scalar::reciprocal)
}

/// Sine of `angle` (radians).
#[inline]
pub fn scalar_sin(angle: f64) -> f64 {
    unary(angle, Scalar::sin)
}

/// Cosine of `angle` (radians).
#[inline]
pub fn scalar_cos(angle: f64) -> f64 {
    unary(angle, Scalar::cos)
}

/// Sine and cosine of `angle` (radians), as `(sin, cos)`.
#[inline]
pub fn scalar_sincos(angle: f64) -> (f64, f64) {
    let (s, c) = Scalard::from_f64(angle).sin_cos();
    (s.to_f64(), c.to_f64())
}

/// Arc cosine of `value`.
#[inline]
pub fn scalar_acos(value: f64) -> f64 {
    unary(value, Scalar::acos)
}

/// Arc tangent of `x / y` using the signs of both to resolve the quadrant.
#[inline]
pub fn scalar_atan2(x: f64, y: f64) -> f64 {
    binary(x, y, Scalar::atan2)
}

/// The smaller of the two inputs.
#[inline]
pub fn scalar_min(left: f64, right: f64) -> f64 {
    binary(left, right, Scalar::min)
}

/// The larger of the two inputs.
#[inline]
pub fn scalar_max(left: f64, right: f64) -> f64 {
    binary(left, right, Scalar::max)
}

/// True when `abs(lhs - rhs) < threshold`.
#[inline]
pub fn scalar_near_equal(lhs: f64, rhs: f64, threshold: f64) -> bool {
    Scalard::from_f64(lhs).near_equal(Scalard::from_f64(rhs), Scalard::from_f64(threshold))
}

/// [`scalar_near_equal`] with [`NEAR_EQUAL_THRESHOLD`].
#[inline]
pub fn scalar_near_equal_default(lhs: f64, rhs: f64) -> bool {
    scalar_near_equal(lhs, rhs, NEAR_EQUAL_THRESHOLD)
}

/// True when `input` is neither NaN nor infinite.
#[inline]
pub fn scalar_is_finite(input: f64) -> bool {
    Scalard::from_f64(input).is_finite()
}

/// Rounds `input` half away from zero.
///
/// `scalar_symmetric_round(1.5) = 2.0`, `scalar_symmetric_round(1.2) = 1.0`,
/// `scalar_symmetric_round(-1.5) = -2.0`, `scalar_symmetric_round(-1.2) = -1.0`.
#[inline]
pub fn scalar_symmetric_round(input: f64) -> f64 {
    unary(input, Scalar::symmetric_round)
}

/// Fractional part of `value`, `value - floor(value)`.
#[inline]
pub fn scalar_fraction(value: f64) -> f64 {
    unary(value, Scalar::fraction)
}
