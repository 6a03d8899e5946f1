// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! rtm-core: platform-abstracted scalar math and unit-safe angles.
//!
//! The scalar layer exposes one `f64` operation set through the [`Scalar`]
//! trait with two interchangeable backends: [`PortableScalar`] (plain `f64`
//! arithmetic plus `libm`) and, on x86/x86_64 targets with SSE2,
//! [`Sse2Scalar`](scalar::Sse2Scalar) (value held in lane 0 of an `__m128d`).
//! [`Scalard`] names whichever backend the build selected; the `scalar_*` free
//! functions route through it.
//!
//! The angle layer stores rotations in radians and only hands them out through
//! [`radians`] and [`degrees`], so a bare number never silently changes unit.
#![deny(missing_docs, rust_2018_idioms, unused_must_use)]
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
#![allow(
    clippy::must_use_candidate,
    clippy::return_self_not_must_use,
    clippy::unreadable_literal,
    clippy::missing_const_for_fn,
    clippy::suboptimal_flops,
    clippy::redundant_pub_crate,
    clippy::many_single_char_names,
    clippy::module_name_repetitions,
    clippy::use_self,
    clippy::float_cmp
)]

/// Unit-safe angle wrapper and degree/radian conversions.
pub mod angle;
/// Shared numeric constants (π and friends).
pub mod constants;
mod error;
/// Backend equivalence probe: evaluate and compare scalar operations by name.
pub mod probe;
/// Backend-abstracted `f64` scalar operations.
pub mod scalar;
/// Serde helpers that keep NaN and ±Inf apart in text formats.
#[cfg(feature = "serde")]
pub mod wire;

pub use angle::{
    degrees, radians, scalar_deg_to_rad, scalar_rad_to_deg, Angle, AngleFloat, AngleOf, AngleType,
};
pub use error::ScalarError;
pub use scalar::{
    active_backend, scalar_abs, scalar_acos, scalar_atan2, scalar_cast, scalar_ceil, scalar_clamp,
    scalar_cos, scalar_floor, scalar_fraction, scalar_is_finite, scalar_max, scalar_min,
    scalar_near_equal, scalar_near_equal_default, scalar_reciprocal, scalar_safe_to_double,
    scalar_set, scalar_sin, scalar_sincos, scalar_sqrt, scalar_sqrt_reciprocal,
    scalar_symmetric_round, try_scalar_safe_to_double, BackendKind, PortableScalar, SafeToDouble,
    Scalar, Scalard, NEAR_EQUAL_THRESHOLD,
};
