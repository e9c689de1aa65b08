//! Plotline CLI
//!
//! Loads series JSON plus an optional chart config, rebuilds the chart model
//! and prints it as JSON. Also resolves pixels to buckets and replays brush
//! drags, which makes the pointer math easy to check from a shell.

mod config;
mod report;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use plotline_charts::{ChartState, SeriesChart};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Inspect Plotline chart models
#[derive(Parser, Debug)]
#[command(name = "plotline")]
#[command(about = "Inspect chart models, invert pixels and replay brush gestures")]
#[command(version)]
struct Cli {
    /// More logging (-v debug, -vv trace); RUST_LOG wins when set
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rebuild the chart and print scales, buckets, stacks and legend
    Inspect {
        #[command(flatten)]
        source: Source,
    },
    /// Resolve an x pixel to a key and bucket
    #[command(allow_negative_numbers = true)]
    Invert {
        #[command(flatten)]
        source: Source,
        /// X position in plot pixels
        px: f64,
    },
    /// Replay a user drag between two x pixels
    #[command(allow_negative_numbers = true)]
    Brush {
        #[command(flatten)]
        source: Source,
        from: f64,
        to: f64,
    },
}

#[derive(Args, Debug)]
struct Source {
    /// Series input (`{"series": [...]}` JSON)
    data: PathBuf,

    /// Chart options (.toml or .json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Single-line JSON output
    #[arg(long)]
    compact: bool,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn to_json<T: serde::Serialize>(value: &T, compact: bool) -> Result<String> {
    let out = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    };
    out.context("Failed to serialize report")
}

fn run(command: Command) -> Result<String> {
    match command {
        Command::Inspect { source } => {
            let config = config::load_config(source.config.as_deref())?;
            let input = config::load_input(&source.data)?;
            let state = ChartState::build(&input, &config)
                .with_context(|| format!("Failed to build chart from {}", source.data.display()))?;
            to_json(&report::inspect(&state, &config), source.compact)
        }
        Command::Invert { source, px } => {
            let config = config::load_config(source.config.as_deref())?;
            let input = config::load_input(&source.data)?;
            let state = ChartState::build(&input, &config)
                .with_context(|| format!("Failed to build chart from {}", source.data.display()))?;
            to_json(&report::invert(&state, px), source.compact)
        }
        Command::Brush { source, from, to } => {
            let config = config::load_config(source.config.as_deref())?;
            let input = config::load_input(&source.data)?;
            let mut chart = SeriesChart::new(config, input)
                .with_context(|| format!("Failed to build chart from {}", source.data.display()))?;
            let report = report::brush(&mut chart, from, to);
            debug!(events = report.brush_events, "brush replayed");
            to_json(&report, source.compact)
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let out = run(cli.command)?;
    println!("{out}");
    Ok(())
}
