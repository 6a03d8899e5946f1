// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
//! The documented scalar properties, checked on every backend compiled for
//! this target in the same run (not only whichever one `Scalard` names).

use proptest::prelude::*;
use rtm_core::{PortableScalar, Scalar, Scalard};

fn s<S: Scalar>(v: f64) -> S {
    S::from_f64(v)
}

fn same_bits(a: f64, b: f64) -> bool {
    a.to_bits() == b.to_bits() || (a.is_nan() && b.is_nan())
}

fn documented_examples<S: Scalar>() {
    assert_eq!(s::<S>(1.8).floor().to_f64(), 1.0);
    assert_eq!(s::<S>(-1.8).floor().to_f64(), -2.0);
    assert_eq!(s::<S>(1.8).ceil().to_f64(), 2.0);
    assert_eq!(s::<S>(-1.8).ceil().to_f64(), -1.0);
    assert_eq!(s::<S>(1.5).symmetric_round().to_f64(), 2.0);
    assert_eq!(s::<S>(1.2).symmetric_round().to_f64(), 1.0);
    assert_eq!(s::<S>(-1.5).symmetric_round().to_f64(), -2.0);
    assert_eq!(s::<S>(-1.2).symmetric_round().to_f64(), -1.0);
    assert_eq!(s::<S>(-2.75).fraction().to_f64(), 0.25);
    assert_eq!(s::<S>(5.0).clamp(s(0.0), s(1.0)).to_f64(), 1.0);
    assert_eq!(s::<S>(0.0).reciprocal().to_f64(), f64::INFINITY);
    assert_eq!(s::<S>(-0.0).reciprocal().to_f64(), f64::NEG_INFINITY);
    assert!(s::<S>(-1.0).sqrt().to_f64().is_nan());
    assert!(!s::<S>(1.0).near_equal(s(1.5), s(0.5)));
    assert!(s::<S>(f64::MAX).is_finite());
    assert!(!s::<S>(f64::NAN).is_finite());
    assert!(!s::<S>(f64::NEG_INFINITY).is_finite());
}

fn round_trip<S: Scalar>(x: f64) -> Result<(), TestCaseError> {
    prop_assert!(same_bits(S::from_f64(x).to_f64(), x));
    Ok(())
}

fn floor_ceil_bracket<S: Scalar>(x: f64) -> Result<(), TestCaseError> {
    let (lo, hi) = (s::<S>(x).floor().to_f64(), s::<S>(x).ceil().to_f64());
    prop_assert!(lo <= x && x <= hi);
    prop_assert!(hi - lo <= 1.0);
    prop_assert_eq!(lo, lo.trunc());
    prop_assert_eq!(hi, hi.trunc());
    Ok(())
}

fn abs_clears_sign<S: Scalar>(x: f64) -> Result<(), TestCaseError> {
    let a = s::<S>(x).abs().to_f64();
    prop_assert!(!a.is_sign_negative());
    prop_assert!(same_bits(a, x.abs()));
    Ok(())
}

fn reciprocal_inverts<S: Scalar>(x: f64) -> Result<(), TestCaseError> {
    let product = s::<S>(x).reciprocal().to_f64() * x;
    prop_assert!((product - 1.0).abs() <= 1e-9);
    Ok(())
}

fn pythagorean<S: Scalar>(theta: f64) -> Result<(), TestCaseError> {
    let (sin, cos) = s::<S>(theta).sin_cos();
    let (sin, cos) = (sin.to_f64(), cos.to_f64());
    prop_assert!(((sin * sin + cos * cos) - 1.0).abs() <= 1e-9);
    prop_assert!(same_bits(sin, s::<S>(theta).sin().to_f64()));
    prop_assert!(same_bits(cos, s::<S>(theta).cos().to_f64()));
    Ok(())
}

fn near_equal_boundary<S: Scalar>(a: f64, t: f64) -> Result<(), TestCaseError> {
    prop_assert!(s::<S>(a).near_equal(s(a), s(t)));
    prop_assert!(!s::<S>(a).near_equal(s(a + t), s(t)));
    Ok(())
}

fn fraction_in_unit_interval<S: Scalar>(x: f64) -> Result<(), TestCaseError> {
    let f = s::<S>(x).fraction().to_f64();
    prop_assert!((0.0..=1.0).contains(&f));
    Ok(())
}

fn finite() -> impl Strategy<Value = f64> {
    any::<f64>().prop_filter("finite", |v| v.is_finite())
}

#[test]
fn documented_examples_hold_on_every_backend() {
    documented_examples::<PortableScalar>();
    documented_examples::<Scalard>();
    #[cfg(all(
        any(target_arch = "x86", target_arch = "x86_64"),
        target_feature = "sse2"
    ))]
    documented_examples::<rtm_core::scalar::Sse2Scalar>();
}

// Runs one property on the portable backend, the active alias and, where it
// exists, SSE2 explicitly (the alias is portable under `no_intrinsics`).
macro_rules! on_every_backend {
    ($check:ident($($arg:expr),*)) => {{
        $check::<PortableScalar>($($arg),*)?;
        $check::<Scalard>($($arg),*)?;
        #[cfg(all(
            any(target_arch = "x86", target_arch = "x86_64"),
            target_feature = "sse2"
        ))]
        $check::<rtm_core::scalar::Sse2Scalar>($($arg),*)?;
    }};
}

proptest! {
    #[test]
    fn set_then_get_is_identity(x in any::<f64>()) {
        on_every_backend!(round_trip(x));
    }

    #[test]
    fn floor_and_ceil_bracket_the_input(x in finite()) {
        on_every_backend!(floor_ceil_bracket(x));
    }

    #[test]
    fn abs_is_never_negative(x in any::<f64>()) {
        on_every_backend!(abs_clears_sign(x));
    }

    #[test]
    fn reciprocal_inverts_within_1e9(x in prop_oneof![1.0e-300..1.0e300_f64, -1.0e300..-1.0e-300_f64]) {
        on_every_backend!(reciprocal_inverts(x));
    }

    #[test]
    fn pythagorean_identity_and_sincos(theta in -1.0e6..1.0e6_f64) {
        on_every_backend!(pythagorean(theta));
    }

    // Dyadic values keep `a + t - a == t` exact.
    #[test]
    fn near_equal_is_strict(a in -1_000_000_i32..1_000_000, k in -10_i32..10) {
        let (a, t) = (f64::from(a), 2.0_f64.powi(k));
        on_every_backend!(near_equal_boundary(a, t));
    }

    #[test]
    fn fraction_stays_in_unit_interval(x in -1.0e9..1.0e9_f64) {
        on_every_backend!(fraction_in_unit_interval(x));
    }
}
