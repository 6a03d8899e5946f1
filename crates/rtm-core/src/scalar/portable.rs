// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Reference scalar backend: a plain `f64` and `libm`.
//!
//! `libm` rather than the `std` float methods keeps the transcendental
//! results independent of the platform C library, so both backends (and every
//! target) share one definition of `sin`, `cos`, `acos` and `atan2`.

use core::fmt;
use core::ops::{Add, Div, Mul, Neg, Sub};

use super::{BackendKind, Scalar};

/// Portable `f64` scalar.
#[derive(Debug, Copy, Clone, Default, PartialEq, PartialOrd)]
pub struct PortableScalar {
    value: f64,
}

impl PortableScalar {
    /// Zero.
    pub const ZERO: Self = Self::new(0.0);

    /// One.
    pub const ONE: Self = Self::new(1.0);

    /// Wraps `value` unchanged. No canonicalization: `-0.0`, subnormals and
    /// NaN payloads are stored as given.
    pub const fn new(value: f64) -> Self {
        Self { value }
    }

    /// The wrapped value.
    pub const fn value(self) -> f64 {
        self.value
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for PortableScalar {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.value.serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for PortableScalar {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        f64::deserialize(deserializer).map(Self::new)
    }
}

impl From<f64> for PortableScalar {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<PortableScalar> for f64 {
    fn from(value: PortableScalar) -> Self {
        value.value
    }
}

impl fmt::Display for PortableScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl Scalar for PortableScalar {
    const BACKEND: BackendKind = BackendKind::Portable;

    #[inline]
    fn from_f64(value: f64) -> Self {
        Self::new(value)
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self.value
    }

    #[inline]
    fn floor(self) -> Self {
        Self::new(libm::floor(self.value))
    }

    #[inline]
    fn ceil(self) -> Self {
        Self::new(libm::ceil(self.value))
    }

    #[inline]
    fn abs(self) -> Self {
        Self::new(libm::fabs(self.value))
    }

    #[inline]
    fn sqrt(self) -> Self {
        Self::new(libm::sqrt(self.value))
    }

    #[inline]
    fn reciprocal(self) -> Self {
        Self::new(1.0 / self.value)
    }

    #[inline]
    fn sin(self) -> Self {
        Self::new(libm::sin(self.value))
    }

    #[inline]
    fn cos(self) -> Self {
        Self::new(libm::cos(self.value))
    }

    #[inline]
    fn acos(self) -> Self {
        Self::new(libm::acos(self.value))
    }

    #[inline]
    fn atan2(self, other: Self) -> Self {
        Self::new(libm::atan2(self.value, other.value))
    }

    #[inline]
    fn min(self, other: Self) -> Self {
        Self::new(self.value.min(other.value))
    }

    #[inline]
    fn max(self, other: Self) -> Self {
        Self::new(self.value.max(other.value))
    }

    #[inline]
    fn near_equal(self, other: Self, threshold: Self) -> bool {
        libm::fabs(self.value - other.value) < threshold.value
    }

    #[inline]
    fn is_finite(self) -> bool {
        self.value.is_finite()
    }

    #[inline]
    fn symmetric_round(self) -> Self {
        if self.value >= 0.0 {
            Self::new(libm::floor(self.value + 0.5))
        } else {
            Self::new(libm::ceil(self.value - 0.5))
        }
    }
}

impl Add for PortableScalar {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.value + rhs.value)
    }
}

impl Sub for PortableScalar {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.value - rhs.value)
    }
}

impl Mul for PortableScalar {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        Self::new(self.value * rhs.value)
    }
}

impl Div for PortableScalar {
    type Output = Self;
    fn div(self, rhs: Self) -> Self {
        Self::new(self.value / rhs.value)
    }
}

impl Neg for PortableScalar {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.value)
    }
}
