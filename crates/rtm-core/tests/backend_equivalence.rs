// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
//! Every backend compiled for this target must agree with `PortableScalar`.
//!
//! Comparison is bit for bit (NaN matches NaN). `min`/`max`/`clamp` skip
//! NaN operands and accept either zero sign, see `rtm_core::probe`.

use rtm_core::probe::{self, ScalarOp, SPECIAL_VALUES};
use rtm_core::{PortableScalar, Scalar, Scalard};

fn assert_equivalent<C: Scalar>(op: ScalarOp, samples: &[Vec<f64>]) {
    let report = probe::compare::<PortableScalar, C>(op, samples, 0.0).expect("probe");
    assert!(
        report.is_equivalent(),
        "{op}: {} divergence(s), first {:?}",
        report.divergences.len(),
        report.divergences.first()
    );
}

#[test]
fn active_backend_matches_portable_on_special_values() {
    for op in ScalarOp::ALL {
        assert_equivalent::<Scalard>(op, &probe::sample_args(op, &SPECIAL_VALUES));
    }
}

#[test]
fn active_backend_matches_portable_across_a_sweep() {
    let mut pool = probe::sweep(-1000.0, 1000.0, 4001);
    pool.extend(probe::sweep(-1.0, 1.0, 257));
    for op in ScalarOp::ALL {
        assert_equivalent::<Scalard>(op, &probe::sample_args(op, &pool));
    }
}

#[cfg(all(
    any(target_arch = "x86", target_arch = "x86_64"),
    target_feature = "sse2"
))]
mod sse2 {
    use super::*;
    use proptest::prelude::*;
    use rtm_core::scalar::Sse2Scalar;

    fn arb_f64() -> impl Strategy<Value = f64> {
        prop_oneof![
            4 => any::<f64>(),
            2 => -1.0e6..1.0e6_f64,
            1 => prop::sample::select(SPECIAL_VALUES.to_vec()),
        ]
    }

    fn check(op: ScalarOp, args: Vec<f64>) -> Result<(), TestCaseError> {
        let samples = probe::sample_args(op, &args);
        let report =
            probe::compare::<PortableScalar, Sse2Scalar>(op, &samples, 0.0).expect("probe");
        prop_assert!(
            report.is_equivalent(),
            "{op}: {:?}",
            report.divergences.first()
        );
        Ok(())
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(2048))]

        #[test]
        fn unary_ops_match_portable(x in arb_f64()) {
            for op in ScalarOp::ALL.into_iter().filter(|op| op.arity() == 1) {
                check(op, vec![x])?;
            }
        }

        #[test]
        fn binary_ops_match_portable(x in arb_f64(), y in arb_f64()) {
            for op in [ScalarOp::Atan2, ScalarOp::Min, ScalarOp::Max] {
                let report = probe::compare::<PortableScalar, Sse2Scalar>(op, &[vec![x, y]], 0.0)
                    .expect("probe");
                prop_assert!(report.is_equivalent(), "{op}({x:e}, {y:e})");
            }
        }

        #[test]
        fn clamp_matches_portable(x in arb_f64(), a in -1.0e6..1.0e6_f64, b in -1.0e6..1.0e6_f64) {
            let (lo, hi) = if a > b { (b, a) } else { (a, b) };
            let report =
                probe::compare::<PortableScalar, Sse2Scalar>(ScalarOp::Clamp, &[vec![x, lo, hi]], 0.0)
                    .expect("probe");
            prop_assert!(report.is_equivalent());
        }

        #[test]
        fn near_equal_matches_portable(a in arb_f64(), b in arb_f64(), t in 0.0..10.0_f64) {
            let report =
                probe::compare::<PortableScalar, Sse2Scalar>(ScalarOp::NearEqual, &[vec![a, b, t]], 0.0)
                    .expect("probe");
            prop_assert!(report.is_equivalent());
        }

        #[test]
        fn arithmetic_matches_f64(a in arb_f64(), b in arb_f64()) {
            let (x, y) = (Sse2Scalar::from_f64(a), Sse2Scalar::from_f64(b));
            let same = |got: Sse2Scalar, want: f64| {
                let got = got.to_f64();
                (got.is_nan() && want.is_nan()) || got.to_bits() == want.to_bits()
            };
            prop_assert!(same(x + y, a + b));
            prop_assert!(same(x - y, a - b));
            prop_assert!(same(x * y, a * b));
            prop_assert!(same(x / y, a / b));
            prop_assert!(same(-x, -a));
        }
    }

    #[test]
    fn unary_ops_match_portable_on_every_special_value() {
        for op in ScalarOp::ALL.into_iter().filter(|op| op.arity() == 1) {
            check(op, SPECIAL_VALUES.to_vec()).expect("equivalent");
        }
    }
}
