//! veboost-cli: scenario runner and decay calculator.
//!
//! `run` replays a JSON scenario against the in-memory escrow, registry and
//! a manual clock, printing one JSON line per step. `curve` evaluates the
//! decay schedule directly.

mod scenario;

use std::io;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use tracing::{error, info};

/// Boost delegation toolkit.
#[derive(Parser, Debug)]
#[command(name = "veboost-cli", version, about = "Replay boost scenarios and inspect decay curves")]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    /// Log output format ("text" or "json")
    #[arg(long, default_value = "text", global = true)]
    log_format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Execute a scenario file and print each step's outcome as JSON.
    Run {
        /// Path to the scenario JSON.
        scenario: PathBuf,
    },
    /// Evaluate a boost schedule at one instant.
    Curve(CurveArgs),
}

#[derive(Args, Debug)]
struct CurveArgs {
    /// Initial magnitude.
    #[arg(long, allow_hyphen_values = true)]
    initial: i128,

    /// Schedule start time.
    #[arg(long)]
    start: u64,

    /// Expiry time (end of the grant phase).
    #[arg(long)]
    expiry: u64,

    /// Cancel time (end of the debt phase).
    #[arg(long)]
    cancel: u64,

    /// Instant to evaluate.
    #[arg(long)]
    at: u64,
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log_level, &cli.log_format);

    let result = match cli.command {
        Commands::Run { scenario } => run(&scenario),
        Commands::Curve(args) => curve(&args),
    };

    if let Err(e) = result {
        error!("{e:#}");
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(path: &Path) -> Result<()> {
    let scenario = scenario::Scenario::load(path)?;
    let stdout = io::stdout();
    let outcomes = scenario
        .execute(&mut stdout.lock())
        .with_context(|| format!("scenario {} failed", path.display()))?;
    info!(steps = outcomes.len(), "scenario complete");
    Ok(())
}

fn curve(args: &CurveArgs) -> Result<()> {
    if args.cancel <= args.expiry || args.expiry < args.start {
        bail!(
            "schedule must satisfy start <= expiry < cancel (got {} / {} / {})",
            args.start,
            args.expiry,
            args.cancel
        );
    }
    let value = veboost_decay::boost_value(args.initial, args.start, args.expiry, args.cancel, args.at)
        .context("evaluating decay curve")?;
    println!("{value}");
    Ok(())
}

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` takes precedence over `--log-level`.
fn init_logging(level_str: &str, format: &str) {
    use tracing_subscriber::filter::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_str));

    // logs go to stderr so stdout stays machine-readable
    if format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_level(true).with_writer(io::stderr))
            .init();
    }
}
