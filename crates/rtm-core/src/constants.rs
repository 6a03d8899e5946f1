// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Every π-derived value in the crate is computed from [`K_PI`]. Narrower
//! widths cast from it instead of redefining the literal, so degree/radian
//! conversions agree between modules.

/// π to full `f64` precision.
pub const K_PI: f64 = core::f64::consts::PI;

/// 2π.
pub const K_PI_2: f64 = K_PI * 2.0;

/// π/2.
pub const K_PI_DIV_TWO: f64 = K_PI * 0.5;

/// π/180, the degree-to-radian factor.
pub const K_DEG_TO_RAD: f64 = K_PI / 180.0;

/// 180/π, the radian-to-degree factor.
pub const K_RAD_TO_DEG: f64 = 180.0 / K_PI;
