// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Serde helpers for `f64` fields that may hold NaN or ±Inf.
//!
//! Text formats such as JSON have no literal for non-finite numbers and
//! `serde_json` writes them as `null`, which makes NaN and ±Inf
//! indistinguishable. With `#[serde(serialize_with = ...)]` these helpers
//! write finite values as numbers and the rest as the strings `"NaN"`, `"inf"`
//! and `"-inf"`.

use serde::{Serialize, Serializer};

/// Serializes one `f64`, spelling out non-finite values.
pub fn serialize_f64<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let value = *value;
    if value.is_finite() {
        serializer.serialize_f64(value)
    } else if value.is_nan() {
        serializer.serialize_str("NaN")
    } else if value.is_sign_positive() {
        serializer.serialize_str("inf")
    } else {
        serializer.serialize_str("-inf")
    }
}

/// Serializes a sequence of `f64` with [`serialize_f64`] applied to each.
pub fn serialize_f64_slice<S>(values: &[f64], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_seq(values.iter().copied().map(Spelled))
}

struct Spelled(f64);

impl Serialize for Spelled {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serialize_f64(&self.0, serializer)
    }
}
