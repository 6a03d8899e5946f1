// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

//! rtm repository maintenance tasks.
//!
//! This crate exists to provide a single, discoverable entrypoint for repo automation via
//! `cargo xtask …` (see `.cargo/config.toml`).
//!
//! Invariants:
//! - This is *not* production runtime code; it only shells out to `cargo`.
//! - Every lane runs even if an earlier one fails, so one invocation reports all of them.

// Lane banners go to stderr next to cargo's own output.
#![allow(clippy::print_stderr)]

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::process::Command;

#[derive(Parser)]
#[command(
    name = "xtask",
    about = "rtm repo maintenance tasks (cargo xtask …)",
    disable_help_subcommand = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the rtm-core test suite once per backend lane.
    Lanes(LanesArgs),
}

/// A feature configuration of `rtm-core` worth testing on its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Lane {
    /// Default features: `Scalard` is SSE2 where the target has it.
    Default,
    /// `no_intrinsics`: `Scalard` is forced to the portable backend.
    NoIntrinsics,
    /// `serde` on top of the default backend.
    Serde,
}

impl Lane {
    const ALL: [Self; 3] = [Self::Default, Self::NoIntrinsics, Self::Serde];

    fn features(self) -> Option<&'static str> {
        match self {
            Self::Default => None,
            Self::NoIntrinsics => Some("no_intrinsics"),
            Self::Serde => Some("serde"),
        }
    }
}

#[derive(Args)]
struct LanesArgs {
    /// Lanes to run (repeatable). Defaults to all of them.
    #[arg(long = "lane", value_enum)]
    lanes: Vec<Lane>,

    /// Test the release profile (debug assertions off).
    #[arg(long)]
    release: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Lanes(args) => run_lanes(args),
    }
}

fn run_lanes(args: LanesArgs) -> Result<()> {
    let lanes = if args.lanes.is_empty() {
        Lane::ALL.to_vec()
    } else {
        args.lanes
    };
    let cargo = std::env::var("CARGO").unwrap_or_else(|_| "cargo".to_owned());

    let mut failed = Vec::new();
    for lane in lanes {
        let mut cmd = Command::new(&cargo);
        cmd.args(["test", "--package", "rtm-core"]);
        if let Some(features) = lane.features() {
            cmd.args(["--features", features]);
        }
        if args.release {
            cmd.arg("--release");
        }

        eprintln!("xtask: lane {lane:?}");
        let status = cmd
            .status()
            .with_context(|| format!("failed to spawn `{cargo}` for lane {lane:?}"))?;
        if !status.success() {
            failed.push(format!("{lane:?} ({status})"));
        }
    }

    if !failed.is_empty() {
        bail!("lanes failed: {}", failed.join(", "));
    }

    Ok(())
}
