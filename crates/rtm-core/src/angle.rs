// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Unit-safe angles.
//!
//! An [`Angle`] always stores radians. The only way to build one from a number
//! is [`radians`] or [`degrees`] (or their `Angle::from_*` twins), so the unit
//! of every bare float that becomes an angle is spelled out at the call site.
//! There are no setters and no arithmetic; angle math belongs to the layers
//! built on top of this crate.
//!
//! Conversion factors are derived from [`K_PI`] for every width.

use core::fmt;

use crate::constants::K_PI;

/// Float widths an [`Angle`] can be stored in.
pub trait AngleFloat:
    Copy + fmt::Debug + fmt::Display + Default + PartialEq + PartialOrd + Send + Sync + 'static
{
    /// π/180 at this width.
    const DEG_TO_RAD: Self;
    /// 180/π at this width.
    const RAD_TO_DEG: Self;
    /// Zero.
    const ZERO: Self;

    /// Multiplies by [`AngleFloat::DEG_TO_RAD`].
    fn deg_to_rad(self) -> Self;

    /// Multiplies by [`AngleFloat::RAD_TO_DEG`].
    fn rad_to_deg(self) -> Self;
}

// π is narrowed first and then divided at f32, so f32 callers see the same
// factor no matter which module computed it.
#[allow(clippy::cast_possible_truncation)]
impl AngleFloat for f32 {
    const DEG_TO_RAD: Self = K_PI as f32 / 180.0;
    const RAD_TO_DEG: Self = 180.0 / K_PI as f32;
    const ZERO: Self = 0.0;

    #[inline]
    fn deg_to_rad(self) -> Self {
        self * Self::DEG_TO_RAD
    }

    #[inline]
    fn rad_to_deg(self) -> Self {
        self * Self::RAD_TO_DEG
    }
}

impl AngleFloat for f64 {
    const DEG_TO_RAD: Self = K_PI / 180.0;
    const RAD_TO_DEG: Self = 180.0 / K_PI;
    const ZERO: Self = 0.0;

    #[inline]
    fn deg_to_rad(self) -> Self {
        self * Self::DEG_TO_RAD
    }

    #[inline]
    fn rad_to_deg(self) -> Self {
        self * Self::RAD_TO_DEG
    }
}

/// Converts degrees into radians.
#[inline]
pub fn scalar_deg_to_rad<T: AngleFloat>(deg: T) -> T {
    deg.deg_to_rad()
}

/// Converts radians into degrees.
#[inline]
pub fn scalar_rad_to_deg<T: AngleFloat>(rad: T) -> T {
    rad.rad_to_deg()
}

/// An angle, stored in radians.
///
/// The field is private; a raw float cannot be turned into an angle without
/// naming its unit:
///
/// ```compile_fail
/// let angle = rtm_core::Angle::<f32> { radians: 1.0 };
/// ```
///
/// ```
/// use rtm_core::{degrees, radians};
///
/// let quarter = degrees(90.0_f64);
/// assert!((quarter.as_radians() - core::f64::consts::FRAC_PI_2).abs() < 1e-12);
/// assert_eq!(radians(0.5_f32).as_radians(), 0.5);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct Angle<T: AngleFloat = f32> {
    radians: T,
}

impl<T: AngleFloat> Angle<T> {
    /// The zero angle (also the `Default`).
    pub const ZERO: Self = Self { radians: T::ZERO };

    /// Constructs an angle from a value in radians. Stored as given.
    #[inline]
    pub fn from_radians(rad: T) -> Self {
        Self { radians: rad }
    }

    /// Constructs an angle from a value in degrees.
    #[inline]
    pub fn from_degrees(deg: T) -> Self {
        Self {
            radians: scalar_deg_to_rad(deg),
        }
    }

    /// The angle in radians.
    #[inline]
    pub fn as_radians(self) -> T {
        self.radians
    }

    /// The angle in degrees.
    #[inline]
    pub fn as_degrees(self) -> T {
        scalar_rad_to_deg(self.radians)
    }
}

impl<T: AngleFloat> fmt::Display for Angle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} rad", self.radians)
    }
}

#[cfg(feature = "serde")]
impl<T> serde::Serialize for Angle<T>
where
    T: AngleFloat + serde::Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.radians.serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de, T> serde::Deserialize<'de> for Angle<T>
where
    T: AngleFloat + serde::Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        T::deserialize(deserializer).map(radians)
    }
}

/// Constructs an angle from a value in radians.
#[inline]
pub fn radians<T: AngleFloat>(rad: T) -> Angle<T> {
    Angle::from_radians(rad)
}

/// Constructs an angle from a value in degrees.
#[inline]
pub fn degrees<T: AngleFloat>(deg: T) -> Angle<T> {
    Angle::from_degrees(deg)
}

/// Maps a float width to its angle type.
pub trait AngleType {
    /// The angle type storing this width.
    type Angle;
}

impl AngleType for f32 {
    type Angle = Angle<f32>;
}

impl AngleType for f64 {
    type Angle = Angle<f64>;
}

/// The angle type for float width `T`.
pub type AngleOf<T> = <T as AngleType>::Angle;
