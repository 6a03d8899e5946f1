// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! rtm CLI entrypoint.
//!
//! Developer-facing commands for inspecting the scalar layer of `rtm-core`:
//!
//! - `rtm backend`: which backend `Scalard` is bound to in this build.
//! - `rtm eval <op> <args..>`: evaluate one operation on the active or the
//!   portable backend.
//! - `rtm angle --degrees <v> | --radians <v>`: unit conversion through
//!   `Angle`.
//! - `rtm probe <op>`: compare the active backend against the portable one
//!   over a sweep plus boundary values.
//!
//! # Usage
//! ```text
//! rtm [--format table|json] <command> [options]
//! ```
//!
//! `--format` falls back to `RTM_OUTPUT`. Logs go to stderr and follow
//! `RUST_LOG` (default `info`). The CLI exits with code `0` on success and
//! non-zero on invalid input or when `probe` finds a divergence.

#![deny(rust_2018_idioms)]
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
    clippy::dbg_macro
)]
// The CLI is expected to print to stdout/stderr.
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod render;

use anyhow::{bail, Result};
use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};
use rtm_core::probe::{self, ScalarOp};
use rtm_core::{
    active_backend, degrees, radians, BackendKind, PortableScalar, ScalarError, Scalard,
};
use tracing::{debug, info, warn};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::render::{AngleView, BackendView, EvalView, Format};

#[derive(Parser)]
#[command(
    name = "rtm",
    about = "Inspect and cross-check the rtm scalar backends",
    version,
    disable_help_subcommand = true
)]
struct Cli {
    /// Output format.
    #[arg(
        long,
        value_enum,
        global = true,
        env = "RTM_OUTPUT",
        default_value_t = Format::Table
    )]
    format: Format,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report the backend `Scalard` is bound to.
    Backend,
    /// Evaluate one scalar operation.
    Eval(EvalArgs),
    /// Convert an angle between degrees and radians.
    Angle(AngleArgs),
    /// Compare the active backend against the portable backend.
    Probe(ProbeArgs),
}

/// Backend `eval` runs on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum BackendChoice {
    /// Whatever `Scalard` is bound to.
    Active,
    /// Always the portable backend.
    Portable,
}

#[derive(Args)]
struct EvalArgs {
    /// Backend to evaluate on.
    #[arg(long, value_enum, default_value_t = BackendChoice::Active)]
    backend: BackendChoice,

    /// Operation name, e.g. `floor`, `sqrt_reciprocal`, `atan2`.
    #[arg(value_parser = parse_op)]
    op: ScalarOp,

    /// Operation arguments (`nan` and `inf` are accepted).
    #[arg(allow_negative_numbers = true)]
    args: Vec<f64>,
}

/// Storage width for `angle`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Width {
    /// Single precision.
    F32,
    /// Double precision.
    F64,
}

#[derive(Args)]
#[command(group(ArgGroup::new("unit").required(true).args(["degrees", "radians"])))]
struct AngleArgs {
    /// Input in degrees.
    #[arg(long, allow_negative_numbers = true)]
    degrees: Option<f64>,

    /// Input in radians.
    #[arg(long, allow_negative_numbers = true)]
    radians: Option<f64>,

    /// Float width the angle is stored in.
    #[arg(long, value_enum, default_value_t = Width::F64)]
    width: Width,
}

#[derive(Args)]
struct ProbeArgs {
    /// Operation name.
    #[arg(value_parser = parse_op)]
    op: ScalarOp,

    /// Lower end of the sweep.
    #[arg(long, default_value_t = -1000.0, allow_negative_numbers = true)]
    min: f64,

    /// Upper end of the sweep.
    #[arg(long, default_value_t = 1000.0, allow_negative_numbers = true)]
    max: f64,

    /// Number of evenly spaced sweep values (boundary values are always added).
    #[arg(long, default_value_t = 4096)]
    samples: usize,

    /// Largest absolute difference accepted as agreement.
    #[arg(long, default_value_t = 0.0)]
    tolerance: f64,
}

fn parse_op(s: &str) -> Result<ScalarOp, ScalarError> {
    s.parse()
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Backend => run_backend(cli.format),
        Commands::Eval(args) => run_eval(cli.format, args),
        Commands::Angle(args) => run_angle(cli.format, args),
        Commands::Probe(args) => run_probe(cli.format, args),
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run_backend(format: Format) -> Result<()> {
    let backend = active_backend();
    render::backend(
        format,
        &BackendView {
            backend,
            accelerated: backend.is_accelerated(),
        },
    )
}

fn run_eval(format: Format, args: EvalArgs) -> Result<()> {
    let (backend, result) = match args.backend {
        BackendChoice::Active => (active_backend(), args.op.evaluate::<Scalard>(&args.args)?),
        BackendChoice::Portable => (
            BackendKind::Portable,
            args.op.evaluate::<PortableScalar>(&args.args)?,
        ),
    };
    debug!(op = %args.op, %backend, %result, "evaluated");
    render::eval(
        format,
        &EvalView {
            op: args.op,
            backend,
            args: args.args,
            result,
        },
    )
}

fn run_angle(format: Format, args: AngleArgs) -> Result<()> {
    let view = match (args.width, args.degrees, args.radians) {
        (Width::F64, Some(d), _) => AngleView::from_f64(degrees(d)),
        (Width::F64, None, Some(r)) => AngleView::from_f64(radians(r)),
        (Width::F32, Some(d), _) => AngleView::from_f32(degrees(narrow(d))),
        (Width::F32, None, Some(r)) => AngleView::from_f32(radians(narrow(r))),
        (_, None, None) => bail!("one of --degrees or --radians is required"),
    };
    render::angle(format, &view)
}

#[allow(clippy::cast_possible_truncation)]
fn narrow(value: f64) -> f32 {
    value as f32
}

fn run_probe(format: Format, args: ProbeArgs) -> Result<()> {
    let report =
        probe::probe_active_backend(args.op, args.min, args.max, args.samples, args.tolerance)?;

    info!(
        op = %report.op,
        reference = %report.reference,
        candidate = %report.candidate,
        samples = report.samples,
        skipped = report.skipped,
        max_abs_diff = report.max_abs_diff,
        divergences = report.divergences.len(),
        "probe finished"
    );
    for d in &report.divergences {
        warn!(
            op = %report.op,
            inputs = ?d.inputs,
            reference = %d.reference,
            candidate = %d.candidate,
            "backends diverge"
        );
    }

    render::probe(format, &report)?;

    if !report.is_equivalent() {
        bail!(
            "{}: {} divergence(s) between {} and {}",
            report.op,
            report.divergences.len(),
            report.reference,
            report.candidate
        );
    }
    Ok(())
}

