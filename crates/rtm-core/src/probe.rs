// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Backend equivalence probe.
//!
//! [`ScalarOp`] names every operation of [`Scalar`] so it can be evaluated
//! from raw `f64` arguments on any backend. [`compare`] runs one operation on
//! a reference and a candidate backend over a sample set and collects every
//! input where they disagree.
//!
//! Agreement rules:
//! - any NaN matches any NaN; a NaN never matches a number;
//! - otherwise values must be equal, with matching zero signs, or within the
//!   caller's tolerance;
//! - for `min`, `max` and `clamp` (which operand survives is not defined)
//!   samples containing NaN are skipped and `-0.0 == +0.0`.

use core::fmt;
use core::str::FromStr;

use crate::constants::{K_PI_2, K_PI_DIV_TWO};
use crate::scalar::{BackendKind, PortableScalar, Scalar, Scalard};
use crate::ScalarError;

/// Boundary inputs appended to every sweep. The quarter and full turns sit on
/// the quadrant edges of `sin`, `cos` and `atan2`.
pub const SPECIAL_VALUES: [f64; 17] = [
    0.0,
    -0.0,
    1.0,
    -1.0,
    0.5,
    -0.5,
    f64::MIN_POSITIVE,
    -f64::MIN_POSITIVE,
    f64::from_bits(1),
    f64::MAX,
    f64::MIN,
    f64::INFINITY,
    f64::NEG_INFINITY,
    f64::NAN,
    K_PI_DIV_TWO,
    -K_PI_DIV_TWO,
    K_PI_2,
];

/// One operation of the scalar layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ScalarOp {
    /// `floor(x)`
    Floor,
    /// `ceil(x)`
    Ceil,
    /// `clamp(x, min, max)`
    Clamp,
    /// `abs(x)`
    Abs,
    /// `sqrt(x)`
    Sqrt,
    /// `1 / sqrt(x)`
    SqrtReciprocal,
    /// `1 / x`
    Reciprocal,
    /// `sin(x)`
    Sin,
    /// `cos(x)`
    Cos,
    /// `(sin(x), cos(x))`
    #[cfg_attr(feature = "serde", serde(rename = "sincos"))]
    SinCos,
    /// `acos(x)`
    Acos,
    /// `atan2(x, y)`
    Atan2,
    /// `min(a, b)`
    Min,
    /// `max(a, b)`
    Max,
    /// `abs(a - b) < threshold`
    NearEqual,
    /// `is_finite(x)`
    IsFinite,
    /// half-away-from-zero rounding
    SymmetricRound,
    /// `x - floor(x)`
    Fraction,
}

impl ScalarOp {
    /// Every operation, in declaration order.
    pub const ALL: [Self; 18] = [
        Self::Floor,
        Self::Ceil,
        Self::Clamp,
        Self::Abs,
        Self::Sqrt,
        Self::SqrtReciprocal,
        Self::Reciprocal,
        Self::Sin,
        Self::Cos,
        Self::SinCos,
        Self::Acos,
        Self::Atan2,
        Self::Min,
        Self::Max,
        Self::NearEqual,
        Self::IsFinite,
        Self::SymmetricRound,
        Self::Fraction,
    ];

    /// Name used by [`FromStr`] and [`fmt::Display`].
    pub const fn name(self) -> &'static str {
        match self {
            Self::Floor => "floor",
            Self::Ceil => "ceil",
            Self::Clamp => "clamp",
            Self::Abs => "abs",
            Self::Sqrt => "sqrt",
            Self::SqrtReciprocal => "sqrt_reciprocal",
            Self::Reciprocal => "reciprocal",
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::SinCos => "sincos",
            Self::Acos => "acos",
            Self::Atan2 => "atan2",
            Self::Min => "min",
            Self::Max => "max",
            Self::NearEqual => "near_equal",
            Self::IsFinite => "is_finite",
            Self::SymmetricRound => "symmetric_round",
            Self::Fraction => "fraction",
        }
    }

    /// Number of `f64` arguments the operation takes.
    pub const fn arity(self) -> usize {
        match self {
            Self::Clamp | Self::NearEqual => 3,
            Self::Atan2 | Self::Min | Self::Max => 2,
            _ => 1,
        }
    }

    /// False for operations whose result on NaN operands or on `±0` ties is
    /// backend-defined.
    pub const fn defines_operand_choice(self) -> bool {
        !matches!(self, Self::Min | Self::Max | Self::Clamp)
    }

    /// Evaluates the operation on backend `S`.
    ///
    /// `clamp` arguments are validated here: an inverted range is reported as
    /// [`ScalarError::InvalidRange`] rather than tripping the debug assertion.
    pub fn evaluate<S: Scalar>(self, args: &[f64]) -> Result<Outcome, ScalarError> {
        if args.len() != self.arity() {
            return Err(ScalarError::Arity {
                op: self.name(),
                expected: self.arity(),
                got: args.len(),
            });
        }
        if self == Self::Clamp && args[1] > args[2] {
            return Err(ScalarError::InvalidRange {
                min: args[1],
                max: args[2],
            });
        }

        let arg = |i: usize| S::from_f64(args[i]);
        let value = |s: S| Outcome::Value(s.to_f64());

        Ok(match self {
            Self::Floor => value(arg(0).floor()),
            Self::Ceil => value(arg(0).ceil()),
            Self::Clamp => value(arg(0).clamp(arg(1), arg(2))),
            Self::Abs => value(arg(0).abs()),
            Self::Sqrt => value(arg(0).sqrt()),
            Self::SqrtReciprocal => value(arg(0).sqrt_reciprocal()),
            Self::Reciprocal => value(arg(0).reciprocal()),
            Self::Sin => value(arg(0).sin()),
            Self::Cos => value(arg(0).cos()),
            Self::SinCos => {
                let (s, c) = arg(0).sin_cos();
                Outcome::Pair(s.to_f64(), c.to_f64())
            }
            Self::Acos => value(arg(0).acos()),
            Self::Atan2 => value(arg(0).atan2(arg(1))),
            Self::Min => value(arg(0).min(arg(1))),
            Self::Max => value(arg(0).max(arg(1))),
            Self::NearEqual => Outcome::Flag(arg(0).near_equal(arg(1), arg(2))),
            Self::IsFinite => Outcome::Flag(arg(0).is_finite()),
            Self::SymmetricRound => value(arg(0).symmetric_round()),
            Self::Fraction => value(arg(0).fraction()),
        })
    }
}

impl fmt::Display for ScalarOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScalarOp {
    type Err = ScalarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|op| op.name() == wanted)
            .ok_or_else(|| ScalarError::UnknownOp(s.to_owned()))
    }
}

/// Result of evaluating a [`ScalarOp`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Outcome {
    /// A single value.
    Value(
        #[cfg_attr(feature = "serde", serde(serialize_with = "crate::wire::serialize_f64"))] f64,
    ),
    /// `(sin, cos)`.
    Pair(
        #[cfg_attr(feature = "serde", serde(serialize_with = "crate::wire::serialize_f64"))] f64,
        #[cfg_attr(feature = "serde", serde(serialize_with = "crate::wire::serialize_f64"))] f64,
    ),
    /// A predicate result.
    Flag(bool),
}

impl Outcome {
    /// Whether two outcomes agree under the probe rules (see module docs).
    pub fn agrees_with(self, other: Self, tolerance: f64, strict_zero: bool) -> bool {
        match (self, other) {
            (Self::Value(a), Self::Value(b)) => values_agree(a, b, tolerance, strict_zero),
            (Self::Pair(a0, a1), Self::Pair(b0, b1)) => {
                values_agree(a0, b0, tolerance, strict_zero)
                    && values_agree(a1, b1, tolerance, strict_zero)
            }
            (Self::Flag(a), Self::Flag(b)) => a == b,
            _ => false,
        }
    }

    /// Largest absolute difference between the two outcomes; `+Inf` when one
    /// side is NaN and the other is not, `1.0` for differing flags.
    pub fn distance(self, other: Self) -> f64 {
        match (self, other) {
            (Self::Value(a), Self::Value(b)) => value_distance(a, b),
            (Self::Pair(a0, a1), Self::Pair(b0, b1)) => {
                value_distance(a0, b0).max(value_distance(a1, b1))
            }
            (Self::Flag(a), Self::Flag(b)) => {
                if a == b {
                    0.0
                } else {
                    1.0
                }
            }
            _ => f64::INFINITY,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => write!(f, "{v:e}"),
            Self::Pair(s, c) => write!(f, "({s:e}, {c:e})"),
            Self::Flag(b) => write!(f, "{b}"),
        }
    }
}

fn values_agree(a: f64, b: f64, tolerance: f64, strict_zero: bool) -> bool {
    if a.is_nan() || b.is_nan() {
        return a.is_nan() && b.is_nan();
    }
    if a == b {
        return !(strict_zero && a == 0.0 && a.is_sign_negative() != b.is_sign_negative());
    }
    (a - b).abs() <= tolerance
}

fn value_distance(a: f64, b: f64) -> f64 {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => 0.0,
        (false, false) if a == b => 0.0,
        (false, false) => (a - b).abs(),
        _ => f64::INFINITY,
    }
}

/// One input where the candidate disagreed with the reference.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Divergence {
    /// Operation arguments.
    #[cfg_attr(
        feature = "serde",
        serde(serialize_with = "crate::wire::serialize_f64_slice")
    )]
    pub inputs: Vec<f64>,
    /// Reference backend result.
    pub reference: Outcome,
    /// Candidate backend result.
    pub candidate: Outcome,
}

/// Summary of one [`compare`] run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ProbeReport {
    /// Operation probed.
    pub op: ScalarOp,
    /// Backend treated as ground truth.
    pub reference: BackendKind,
    /// Backend under test.
    pub candidate: BackendKind,
    /// Samples evaluated on both backends.
    pub samples: usize,
    /// Samples skipped because the operation leaves them undefined.
    pub skipped: usize,
    /// Largest [`Outcome::distance`] seen across agreeing and diverging samples.
    #[cfg_attr(feature = "serde", serde(serialize_with = "crate::wire::serialize_f64"))]
    pub max_abs_diff: f64,
    /// Every disagreeing sample, in input order.
    pub divergences: Vec<Divergence>,
}

impl ProbeReport {
    /// True when no sample diverged.
    pub fn is_equivalent(&self) -> bool {
        self.divergences.is_empty()
    }
}

/// `count` evenly spaced values from `min` to `max` inclusive.
///
/// Bounds must be finite. Ranges wider than `f64::MAX` (e.g. `-MAX..=MAX`)
/// interpolate each bound separately so the span never overflows.
pub fn sweep(min: f64, max: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![min],
        _ => {
            let span = max - min;
            #[allow(clippy::cast_precision_loss)]
            let last = (count - 1) as f64;
            #[allow(clippy::cast_precision_loss)]
            let mut values: Vec<f64> = (0..count)
                .map(|i| {
                    let t = i as f64 / last;
                    if span.is_finite() {
                        min + span * t
                    } else {
                        min * (1.0 - t) + max * t
                    }
                })
                .collect();
            if let Some(end) = values.last_mut() {
                *end = max;
            }
            values
        }
    }
}

/// Builds argument tuples for `op` from a pool of values.
///
/// Unary operations take each value; wider operations pair each value with
/// others drawn at fixed strides through the pool. `clamp` bounds are ordered
/// and `near_equal` thresholds made non-negative so every tuple satisfies the
/// operation's precondition.
pub fn sample_args(op: ScalarOp, pool: &[f64]) -> Vec<Vec<f64>> {
    let n = pool.len();
    if n == 0 {
        return Vec::new();
    }
    let at = |i: usize, stride: usize, offset: usize| pool[(i * stride + offset) % n];

    (0..n)
        .map(|i| {
            let x = pool[i];
            match op {
                ScalarOp::Atan2 | ScalarOp::Min | ScalarOp::Max => vec![x, at(i, 7, 3)],
                ScalarOp::Clamp => {
                    let (a, b) = (at(i, 7, 3), at(i, 13, 5));
                    if a > b {
                        vec![x, b, a]
                    } else {
                        vec![x, a, b]
                    }
                }
                ScalarOp::NearEqual => vec![x, at(i, 7, 3), at(i, 13, 5).abs()],
                _ => vec![x],
            }
        })
        .collect()
}

/// Runs `op` on backends `R` (reference) and `C` (candidate) for every sample.
pub fn compare<R: Scalar, C: Scalar>(
    op: ScalarOp,
    samples: &[Vec<f64>],
    tolerance: f64,
) -> Result<ProbeReport, ScalarError> {
    let strict_zero = op.defines_operand_choice();
    let mut report = ProbeReport {
        op,
        reference: R::BACKEND,
        candidate: C::BACKEND,
        samples: 0,
        skipped: 0,
        max_abs_diff: 0.0,
        divergences: Vec::new(),
    };

    for inputs in samples {
        if !op.defines_operand_choice() && inputs.iter().any(|v| v.is_nan()) {
            report.skipped += 1;
            continue;
        }
        let reference = op.evaluate::<R>(inputs)?;
        let candidate = op.evaluate::<C>(inputs)?;
        report.samples += 1;
        report.max_abs_diff = report.max_abs_diff.max(reference.distance(candidate));
        if !reference.agrees_with(candidate, tolerance, strict_zero) {
            report.divergences.push(Divergence {
                inputs: inputs.clone(),
                reference,
                candidate,
            });
        }
    }

    Ok(report)
}

/// Compares [`Scalard`] against [`PortableScalar`] for `op` over a sweep of
/// `count` values in `[min, max]` plus [`SPECIAL_VALUES`].
///
/// Both bounds must be finite with `min <= max`; anything else is
/// [`ScalarError::InvalidRange`].
pub fn probe_active_backend(
    op: ScalarOp,
    min: f64,
    max: f64,
    count: usize,
    tolerance: f64,
) -> Result<ProbeReport, ScalarError> {
    if !(min.is_finite() && max.is_finite() && min <= max) {
        return Err(ScalarError::InvalidRange { min, max });
    }
    let mut pool = sweep(min, max, count);
    pool.extend_from_slice(&SPECIAL_VALUES);
    compare::<PortableScalar, Scalard>(op, &sample_args(op, &pool), tolerance)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_from_str() {
        for op in ScalarOp::ALL {
            assert_eq!(op.name().parse::<ScalarOp>(), Ok(op));
        }
        assert_eq!("Sqrt-Reciprocal".parse::<ScalarOp>(), Ok(ScalarOp::SqrtReciprocal));
        assert_eq!(
            "tan".parse::<ScalarOp>(),
            Err(ScalarError::UnknownOp("tan".to_owned()))
        );
    }

    #[test]
    fn evaluate_checks_arity_and_clamp_range() {
        assert_eq!(
            ScalarOp::Atan2.evaluate::<PortableScalar>(&[1.0]),
            Err(ScalarError::Arity {
                op: "atan2",
                expected: 2,
                got: 1
            })
        );
        assert_eq!(
            ScalarOp::Clamp.evaluate::<PortableScalar>(&[0.5, 1.0, 0.0]),
            Err(ScalarError::InvalidRange { min: 1.0, max: 0.0 })
        );
    }

    #[test]
    fn sweep_hits_both_ends() {
        let values = sweep(-1.0, 1.0, 5);
        assert_eq!(values, vec![-1.0, -0.5, 0.0, 0.5, 1.0]);
        assert!(sweep(0.0, 1.0, 0).is_empty());
        assert_eq!(sweep(3.0, 9.0, 1), vec![3.0]);
    }

    #[test]
    fn sweep_spans_the_whole_finite_line() {
        assert_eq!(sweep(-f64::MAX, f64::MAX, 3), vec![-f64::MAX, 0.0, f64::MAX]);
        let values = sweep(-f64::MAX, f64::MAX, 101);
        assert!(values.iter().all(|v| v.is_finite()));
        assert!(values.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn active_backend_rejects_non_finite_bounds() {
        for (min, max) in [
            (f64::NAN, 1.0),
            (0.0, f64::NAN),
            (f64::NEG_INFINITY, 1.0),
            (0.0, f64::INFINITY),
            (1.0, 0.0),
        ] {
            let result = probe_active_backend(ScalarOp::Floor, min, max, 3, 0.0);
            assert!(
                matches!(result, Err(ScalarError::InvalidRange { .. })),
                "[{min}, {max}] accepted"
            );
        }
        assert!(probe_active_backend(ScalarOp::Floor, -f64::MAX, f64::MAX, 3, 0.0).is_ok());
    }

    #[test]
    fn sample_args_respect_preconditions() {
        let pool = sweep(-4.0, 4.0, 17);
        for args in sample_args(ScalarOp::Clamp, &pool) {
            assert!(args[1] <= args[2]);
        }
        for args in sample_args(ScalarOp::NearEqual, &pool) {
            assert!(args[2] >= 0.0);
        }
    }

    #[test]
    fn agreement_distinguishes_signed_zero_only_when_strict() {
        let pos = Outcome::Value(0.0);
        let neg = Outcome::Value(-0.0);
        assert!(!pos.agrees_with(neg, 0.0, true));
        assert!(pos.agrees_with(neg, 0.0, false));
        assert!(Outcome::Value(f64::NAN).agrees_with(Outcome::Value(-f64::NAN), 0.0, true));
        assert!(!Outcome::Value(f64::NAN).agrees_with(Outcome::Value(1.0), 1e9, true));
    }

    #[test]
    fn portable_against_itself_is_equivalent() {
        let pool = sweep(-10.0, 10.0, 64);
        for op in ScalarOp::ALL {
            let report =
                compare::<PortableScalar, PortableScalar>(op, &sample_args(op, &pool), 0.0)
                    .expect("self comparison");
            assert!(report.is_equivalent(), "{op}: {:?}", report.divergences);
            assert_eq!(report.max_abs_diff, 0.0);
        }
    }
}
