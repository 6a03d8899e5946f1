// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Error type for the recoverable corners of the scalar layer.
//!
//! Numeric domain errors are never reported here: they propagate as NaN/Inf.

use thiserror::Error;

/// Errors surfaced by checked conversions and the equivalence probe.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScalarError {
    /// An integer does not survive the round trip through `f64`.
    #[error("converting {value} ({ty}) to f64 would truncate")]
    Truncation {
        /// Source integer type name.
        ty: &'static str,
        /// Source value, formatted.
        value: String,
    },
    /// No scalar operation goes by this name.
    #[error("unknown scalar operation: {0}")]
    UnknownOp(String),
    /// Wrong number of arguments for an operation.
    #[error("{op} expects {expected} argument(s), got {got}")]
    Arity {
        /// Operation name.
        op: &'static str,
        /// Arguments the operation takes.
        expected: usize,
        /// Arguments supplied.
        got: usize,
    },
    /// A `[min, max]` range that is inverted or has a non-finite bound.
    #[error("invalid range: [{min}, {max}]")]
    InvalidRange {
        /// Lower bound supplied.
        min: f64,
        /// Upper bound supplied.
        max: f64,
    },
}
