// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! Table and JSON output for each command.

use anyhow::{Context, Result};
use clap::ValueEnum;
use comfy_table::Table;
use rtm_core::probe::{Outcome, ProbeReport, ScalarOp};
use rtm_core::{wire, Angle, BackendKind};
use serde::Serialize;

/// Rows of the divergence table printed before eliding the rest.
const MAX_DIVERGENCE_ROWS: usize = 20;

/// Output format for every command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Human-readable tables.
    Table,
    /// Pretty-printed JSON on stdout.
    Json,
}

/// `rtm backend` output.
#[derive(Serialize)]
pub struct BackendView {
    pub backend: BackendKind,
    pub accelerated: bool,
}

/// `rtm eval` output.
#[derive(Serialize)]
pub struct EvalView {
    pub op: ScalarOp,
    pub backend: BackendKind,
    #[serde(serialize_with = "wire::serialize_f64_slice")]
    pub args: Vec<f64>,
    pub result: Outcome,
}

/// `rtm angle` output, widened to `f64` for printing.
#[derive(Serialize)]
pub struct AngleView {
    pub width: &'static str,
    #[serde(serialize_with = "wire::serialize_f64")]
    pub radians: f64,
    #[serde(serialize_with = "wire::serialize_f64")]
    pub degrees: f64,
}

impl AngleView {
    pub fn from_f64(angle: Angle<f64>) -> Self {
        Self {
            width: "f64",
            radians: angle.as_radians(),
            degrees: angle.as_degrees(),
        }
    }

    pub fn from_f32(angle: Angle<f32>) -> Self {
        Self {
            width: "f32",
            radians: f64::from(angle.as_radians()),
            degrees: f64::from(angle.as_degrees()),
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("serializing output")?;
    println!("{json}");
    Ok(())
}

fn print_fields(rows: Vec<(&str, String)>) {
    let mut table = Table::new();
    table.set_header(vec!["field", "value"]);
    for (field, value) in rows {
        table.add_row(vec![field.to_owned(), value]);
    }
    println!("{table}");
}

fn join(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| format!("{v:e}"))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn backend(format: Format, view: &BackendView) -> Result<()> {
    match format {
        Format::Json => print_json(view),
        Format::Table => {
            print_fields(vec![
                ("backend", view.backend.to_string()),
                ("accelerated", view.accelerated.to_string()),
            ]);
            Ok(())
        }
    }
}

pub fn eval(format: Format, view: &EvalView) -> Result<()> {
    match format {
        Format::Json => print_json(view),
        Format::Table => {
            print_fields(vec![
                ("op", view.op.to_string()),
                ("backend", view.backend.to_string()),
                ("args", join(&view.args)),
                ("result", view.result.to_string()),
            ]);
            Ok(())
        }
    }
}

pub fn angle(format: Format, view: &AngleView) -> Result<()> {
    match format {
        Format::Json => print_json(view),
        Format::Table => {
            print_fields(vec![
                ("width", view.width.to_owned()),
                ("radians", view.radians.to_string()),
                ("degrees", view.degrees.to_string()),
            ]);
            Ok(())
        }
    }
}

pub fn probe(format: Format, report: &ProbeReport) -> Result<()> {
    if format == Format::Json {
        return print_json(report);
    }

    print_fields(vec![
        ("op", report.op.to_string()),
        ("reference", report.reference.to_string()),
        ("candidate", report.candidate.to_string()),
        ("samples", report.samples.to_string()),
        ("skipped", report.skipped.to_string()),
        ("max_abs_diff", format!("{:e}", report.max_abs_diff)),
        ("divergences", report.divergences.len().to_string()),
    ]);

    if !report.divergences.is_empty() {
        let mut table = Table::new();
        table.set_header(vec!["inputs", "reference", "candidate"]);
        for d in report.divergences.iter().take(MAX_DIVERGENCE_ROWS) {
            table.add_row(vec![
                join(&d.inputs),
                d.reference.to_string(),
                d.candidate.to_string(),
            ]);
        }
        println!("{table}");
        let hidden = report.divergences.len().saturating_sub(MAX_DIVERGENCE_ROWS);
        if hidden > 0 {
            println!("... {hidden} more");
        }
    }
    Ok(())
}
