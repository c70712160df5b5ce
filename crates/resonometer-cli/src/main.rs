//! Resonometer CLI - SPL calibration from Helmholtz resonator recordings.

mod commands;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "resonometer")]
#[command(author, version, about = "Resonator-based SPL calibration", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Measure the maximum resonance level of recordings
    Analyze(commands::analyze::AnalyzeArgs),

    /// Estimate the calibration offset of a recording device
    Calibrate(commands::calibrate::CalibrateArgs),

    /// Show format, peak level and resonance of a recording
    Info(commands::info::InfoArgs),

    /// Generate test signals
    Generate(commands::generate::GenerateArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Analyze(args) => commands::analyze::run(args),
        Commands::Calibrate(args) => commands::calibrate::run(args),
        Commands::Info(args) => commands::info::run(args),
        Commands::Generate(args) => commands::generate::run(args),
    }
}
