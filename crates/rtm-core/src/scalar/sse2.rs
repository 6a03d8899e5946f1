// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! SSE2 scalar backend (x86/x86_64).
//!
//! The value is broadcast to both lanes of an `__m128d`; results are read
//! from lane 0. Packed (`_pd`) forms are used throughout since both lanes
//! always hold the same value.
//!
//! SSE2 has no rounding instruction (`roundsd` is SSE4.1), so `floor`/`ceil`
//! round to nearest by adding and subtracting 2^52, then correct by one. The
//! transcendentals have no SSE2 sequence at all and run the portable `libm`
//! routine on the extracted lane.
//!
//! Every intrinsic used here is SSE2, which this module requires at compile
//! time (`target_feature = "sse2"`), so the `unsafe` blocks only discharge the
//! target-feature obligation.

#![allow(unsafe_code, unused_unsafe)]

use core::cmp::Ordering;
use core::fmt;
use core::ops::{Add, Div, Mul, Neg, Sub};

#[cfg(target_arch = "x86")]
use core::arch::x86::{
    __m128d, _mm_add_pd, _mm_and_pd, _mm_andnot_pd, _mm_cmpeq_pd, _mm_cmpge_pd, _mm_cmpgt_pd,
    _mm_cmplt_pd, _mm_cvtsd_f64, _mm_div_pd, _mm_max_pd, _mm_min_pd, _mm_movemask_pd, _mm_mul_pd,
    _mm_or_pd, _mm_set1_pd, _mm_setzero_pd, _mm_sqrt_pd, _mm_sub_pd, _mm_xor_pd,
};
#[cfg(target_arch = "x86_64")]
use core::arch::x86_64::{
    __m128d, _mm_add_pd, _mm_and_pd, _mm_andnot_pd, _mm_cmpeq_pd, _mm_cmpge_pd, _mm_cmpgt_pd,
    _mm_cmplt_pd, _mm_cvtsd_f64, _mm_div_pd, _mm_max_pd, _mm_min_pd, _mm_movemask_pd, _mm_mul_pd,
    _mm_or_pd, _mm_set1_pd, _mm_setzero_pd, _mm_sqrt_pd, _mm_sub_pd, _mm_xor_pd,
};

use super::{BackendKind, Scalar};

/// 2^52: every `f64` at or above this magnitude is already integral.
const TWO_POW_52: f64 = 4503599627370496.0;

/// SSE2 register-backed `f64` scalar.
#[derive(Copy, Clone)]
#[repr(transparent)]
pub struct Sse2Scalar(__m128d);

impl Sse2Scalar {
    /// Wraps a register. Lane 0 is the value; lane 1 is ignored.
    #[inline]
    pub fn from_register(register: __m128d) -> Self {
        Self(register)
    }

    /// The underlying register.
    #[inline]
    pub fn register(self) -> __m128d {
        self.0
    }

    #[inline]
    fn sign_mask() -> __m128d {
        unsafe { _mm_set1_pd(-0.0) }
    }

    #[inline]
    fn lane0_set(mask: __m128d) -> bool {
        unsafe { (_mm_movemask_pd(mask) & 1) == 1 }
    }

    #[inline]
    fn map_lane(self, f: impl FnOnce(f64) -> f64) -> Self {
        Self::from_f64(f(self.to_f64()))
    }

    /// Round to nearest (ties to even) for `|x| < 2^52`; garbage otherwise,
    /// which [`Self::keep_integral`] discards.
    #[inline]
    fn round_nearest(x: __m128d) -> __m128d {
        unsafe {
            let magic = _mm_or_pd(_mm_set1_pd(TWO_POW_52), _mm_and_pd(x, Self::sign_mask()));
            _mm_sub_pd(_mm_add_pd(x, magic), magic)
        }
    }

    /// Picks `candidate` where `|x| < 2^52`, `x` itself elsewhere (large
    /// values, ±Inf and NaN are their own floor/ceil). The sign of `x` is
    /// copied onto `candidate` so results in `(-1, -0]` come out as `-0.0`.
    #[inline]
    fn keep_integral(x: __m128d, candidate: __m128d) -> __m128d {
        unsafe {
            let sign = Self::sign_mask();
            let signed = _mm_or_pd(candidate, _mm_and_pd(x, sign));
            let small = _mm_cmplt_pd(_mm_andnot_pd(sign, x), _mm_set1_pd(TWO_POW_52));
            _mm_or_pd(_mm_and_pd(small, signed), _mm_andnot_pd(small, x))
        }
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Sse2Scalar {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.to_f64().serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Sse2Scalar {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        f64::deserialize(deserializer).map(Self::from_f64)
    }
}

impl Default for Sse2Scalar {
    fn default() -> Self {
        Self(unsafe { _mm_setzero_pd() })
    }
}

impl fmt::Debug for Sse2Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Sse2Scalar").field(&self.to_f64()).finish()
    }
}

impl fmt::Display for Sse2Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_f64())
    }
}

impl PartialEq for Sse2Scalar {
    fn eq(&self, other: &Self) -> bool {
        self.to_f64() == other.to_f64()
    }
}

impl PartialOrd for Sse2Scalar {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.to_f64().partial_cmp(&other.to_f64())
    }
}

impl From<f64> for Sse2Scalar {
    fn from(value: f64) -> Self {
        Self::from_f64(value)
    }
}

impl From<Sse2Scalar> for f64 {
    fn from(value: Sse2Scalar) -> Self {
        value.to_f64()
    }
}

impl Scalar for Sse2Scalar {
    const BACKEND: BackendKind = BackendKind::Sse2;

    #[inline]
    fn from_f64(value: f64) -> Self {
        Self(unsafe { _mm_set1_pd(value) })
    }

    #[inline]
    fn to_f64(self) -> f64 {
        unsafe { _mm_cvtsd_f64(self.0) }
    }

    #[inline]
    fn floor(self) -> Self {
        unsafe {
            let x = self.0;
            let rounded = Self::round_nearest(x);
            // Rounding went up: step back down by one.
            let overshoot = _mm_and_pd(_mm_cmpgt_pd(rounded, x), _mm_set1_pd(1.0));
            Self(Self::keep_integral(x, _mm_sub_pd(rounded, overshoot)))
        }
    }

    #[inline]
    fn ceil(self) -> Self {
        unsafe {
            let x = self.0;
            let rounded = Self::round_nearest(x);
            let undershoot = _mm_and_pd(_mm_cmplt_pd(rounded, x), _mm_set1_pd(1.0));
            Self(Self::keep_integral(x, _mm_add_pd(rounded, undershoot)))
        }
    }

    #[inline]
    fn abs(self) -> Self {
        Self(unsafe { _mm_andnot_pd(Self::sign_mask(), self.0) })
    }

    #[inline]
    fn sqrt(self) -> Self {
        Self(unsafe { _mm_sqrt_pd(self.0) })
    }

    #[inline]
    fn reciprocal(self) -> Self {
        Self(unsafe { _mm_div_pd(_mm_set1_pd(1.0), self.0) })
    }

    #[inline]
    fn sin(self) -> Self {
        self.map_lane(libm::sin)
    }

    #[inline]
    fn cos(self) -> Self {
        self.map_lane(libm::cos)
    }

    #[inline]
    fn acos(self) -> Self {
        self.map_lane(libm::acos)
    }

    #[inline]
    fn atan2(self, other: Self) -> Self {
        Self::from_f64(libm::atan2(self.to_f64(), other.to_f64()))
    }

    #[inline]
    fn min(self, other: Self) -> Self {
        Self(unsafe { _mm_min_pd(self.0, other.0) })
    }

    #[inline]
    fn max(self, other: Self) -> Self {
        Self(unsafe { _mm_max_pd(self.0, other.0) })
    }

    #[inline]
    fn near_equal(self, other: Self, threshold: Self) -> bool {
        let diff = (self - other).abs();
        Self::lane0_set(unsafe { _mm_cmplt_pd(diff.0, threshold.0) })
    }

    #[inline]
    fn is_finite(self) -> bool {
        // x - x is +0 for finite x and NaN for ±Inf/NaN.
        unsafe {
            let zero = _mm_sub_pd(self.0, self.0);
            Self::lane0_set(_mm_cmpeq_pd(zero, _mm_setzero_pd()))
        }
    }

    #[inline]
    fn symmetric_round(self) -> Self {
        unsafe {
            let x = self.0;
            let half = _mm_set1_pd(0.5);
            let up = Self(_mm_add_pd(x, half)).floor().0;
            let down = Self(_mm_sub_pd(x, half)).ceil().0;
            let non_negative = _mm_cmpge_pd(x, _mm_setzero_pd());
            Self(_mm_or_pd(
                _mm_and_pd(non_negative, up),
                _mm_andnot_pd(non_negative, down),
            ))
        }
    }
}

impl Add for Sse2Scalar {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(unsafe { _mm_add_pd(self.0, rhs.0) })
    }
}

impl Sub for Sse2Scalar {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(unsafe { _mm_sub_pd(self.0, rhs.0) })
    }
}

impl Mul for Sse2Scalar {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        Self(unsafe { _mm_mul_pd(self.0, rhs.0) })
    }
}

impl Div for Sse2Scalar {
    type Output = Self;
    fn div(self, rhs: Self) -> Self {
        Self(unsafe { _mm_div_pd(self.0, rhs.0) })
    }
}

impl Neg for Sse2Scalar {
    type Output = Self;
    fn neg(self) -> Self {
        Self(unsafe { _mm_xor_pd(self.0, Self::sign_mask()) })
    }
}
