// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]

use rtm_core::probe::{self, Divergence, Outcome, ScalarOp};
use rtm_core::{degrees, radians, Angle, BackendKind, PortableScalar, Scalar, Scalard};

#[test]
fn scalars_serialize_as_bare_numbers() {
    let json = serde_json::to_string(&PortableScalar::new(-2.5)).expect("serialize");
    assert_eq!(json, "-2.5");
    let back: Scalard = serde_json::from_str("0.125").expect("deserialize");
    assert_eq!(back.to_f64(), 0.125);
}

#[test]
fn angles_serialize_as_radians() {
    let json = serde_json::to_string(&radians(1.5_f64)).expect("serialize");
    assert_eq!(json, "1.5");
    let back: Angle<f64> = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, radians(1.5));

    let quarter: Angle<f32> =
        serde_json::from_str(&serde_json::to_string(&degrees(90.0_f32)).expect("serialize"))
            .expect("deserialize");
    assert_eq!(quarter, degrees(90.0_f32));
}

#[test]
fn backend_and_op_names_are_snake_case() {
    assert_eq!(
        serde_json::to_string(&BackendKind::Sse2).expect("serialize"),
        "\"sse2\""
    );
    assert_eq!(
        serde_json::to_string(&ScalarOp::SqrtReciprocal).expect("serialize"),
        "\"sqrt_reciprocal\""
    );
    let op: ScalarOp = serde_json::from_str("\"sincos\"").expect("deserialize");
    assert_eq!(op, ScalarOp::SinCos);
}

#[test]
fn probe_reports_serialize() {
    let samples = probe::sample_args(ScalarOp::Floor, &[1.5, -2.5]);
    let report = probe::compare::<PortableScalar, PortableScalar>(ScalarOp::Floor, &samples, 0.0)
        .expect("probe");
    let value = serde_json::to_value(&report).expect("serialize");
    assert_eq!(value["op"], "floor");
    assert_eq!(value["reference"], "portable");
    assert_eq!(value["samples"], 2);
    assert_eq!(value["divergences"].as_array().map(Vec::len), Some(0));
}

#[test]
fn non_finite_outcomes_keep_their_identity() {
    let divergence = Divergence {
        inputs: vec![f64::NAN, f64::NEG_INFINITY, 2.0],
        reference: Outcome::Value(f64::INFINITY),
        candidate: Outcome::Pair(f64::NAN, -0.5),
    };
    let json = serde_json::to_string(&divergence).expect("serialize");
    assert_eq!(
        json,
        r#"{"inputs":["NaN","-inf",2.0],"reference":{"value":"inf"},"candidate":{"pair":["NaN",-0.5]}}"#
    );
}
