//! Shared CLI helpers used across multiple commands.

use anyhow::Context;
use clap::{Args, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use resonometer_config::{
    BandEdge, ErrorPolicy, FrequencyRange, LevelUnit, MeterConfig, Window, default_config_path,
};
use resonometer_pipeline::{Aggregator, FileEvent, RunReport, WidthRun};
use std::path::{Path, PathBuf};

/// Error policy choices for CLI
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum CliPolicy {
    /// Stop at the first failing file
    Abort,
    /// Warn and continue with the next file
    Skip,
}

impl From<CliPolicy> for ErrorPolicy {
    fn from(p: CliPolicy) -> Self {
        match p {
            CliPolicy::Abort => ErrorPolicy::Abort,
            CliPolicy::Skip => ErrorPolicy::Skip,
        }
    }
}

/// Band edge choices for CLI
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum CliBandEdge {
    /// One extra bin below the band (reference numbers)
    Legacy,
    /// Nearest bins on both sides
    Symmetric,
}

impl From<CliBandEdge> for BandEdge {
    fn from(b: CliBandEdge) -> Self {
        match b {
            CliBandEdge::Legacy => BandEdge::Legacy,
            CliBandEdge::Symmetric => BandEdge::Symmetric,
        }
    }
}

/// Window function choices for CLI
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum CliWindow {
    /// Uniform weights
    Rectangular,
    /// Hann taper
    Hann,
}

impl From<CliWindow> for Window {
    fn from(w: CliWindow) -> Self {
        match w {
            CliWindow::Rectangular => Window::Rectangular,
            CliWindow::Hann => Window::Hann,
        }
    }
}

/// Analysis options shared by `analyze` and `calibrate`.
///
/// Every option overrides the value from the configuration file.
#[derive(Args)]
pub struct MeterArgs {
    /// Configuration file (default: user config dir, if present)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Window width in milliseconds (repeat or comma-separate for several)
    #[arg(short = 'w', long = "width", value_name = "MS", value_delimiter = ',')]
    pub widths: Vec<f64>,

    /// Step between windows as a fraction of the width
    #[arg(short = 's', long = "step", value_name = "FRAC")]
    pub step: Option<f64>,

    /// Width of the integration band around the resonance in Hz
    #[arg(short = 'r', long = "band", value_name = "HZ")]
    pub band: Option<f64>,

    /// Report levels relative to raw sample units instead of full scale
    #[arg(long)]
    pub raw: bool,

    /// Calibration offset in dB added to every level
    #[arg(long, value_name = "DB", allow_negative_numbers = true)]
    pub offset: Option<f64>,

    /// What to do when a file cannot be processed
    #[arg(long, value_enum)]
    pub policy: Option<CliPolicy>,

    /// Lower band edge rule
    #[arg(long, value_enum)]
    pub band_edge: Option<CliBandEdge>,

    /// Window function
    #[arg(long, value_enum)]
    pub window: Option<CliWindow>,

    /// Also compute the average level spectrum between MIN and MAX Hz
    #[arg(long, num_args = 2, value_names = ["MIN", "MAX"])]
    pub spectrum_range: Option<Vec<f64>>,

    /// Write the full report as JSON
    #[arg(long, value_name = "PATH")]
    pub json: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

impl MeterArgs {
    /// Load the configuration file and apply command-line overrides.
    pub fn load_config(&self) -> anyhow::Result<MeterConfig> {
        let mut config = match &self.config {
            Some(path) => MeterConfig::load(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => {
                let path = default_config_path();
                if path.is_file() {
                    tracing::info!(path = %path.display(), "using default config");
                    MeterConfig::load(&path)?
                } else {
                    MeterConfig::default()
                }
            }
        };

        if !self.widths.is_empty() {
            config.window_widths_ms.clone_from(&self.widths);
        }
        if let Some(step) = self.step {
            config.step_fraction = step;
        }
        if let Some(band) = self.band {
            config.band_width_hz = band;
        }
        if self.raw {
            config.level_unit = LevelUnit::Raw;
        }
        if let Some(offset) = self.offset {
            config.calibration_offset_db = offset;
        }
        if let Some(policy) = self.policy {
            config.error_policy = policy.into();
        }
        if let Some(edge) = self.band_edge {
            config.band_edge = edge.into();
        }
        if let Some(window) = self.window {
            config.window = window.into();
        }
        if let Some(range) = parse_range(self.spectrum_range.as_deref()) {
            config.spectrum_range_hz = Some(range);
        }
        Ok(config)
    }
}

/// Turn a two-value CLI argument into a frequency range.
pub fn parse_range(values: Option<&[f64]>) -> Option<FrequencyRange> {
    match values {
        Some(&[min, max]) => Some(FrequencyRange::new(min, max)),
        _ => None,
    }
}

/// Run the aggregator over `files`, drawing a progress bar unless disabled.
pub fn run_aggregator(
    config: &MeterConfig,
    files: &[PathBuf],
    show_progress: bool,
) -> anyhow::Result<Vec<WidthRun>> {
    let total = config.window_widths_ms.len() * files.len();
    let pb = if show_progress && total > 1 {
        ProgressBar::new(total as u64)
    } else {
        ProgressBar::hidden()
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-"),
    );

    let runs = Aggregator::new(config)
        .with_observer(|event| match event {
            FileEvent::Started {
                path,
                window_width_ms,
                ..
            } => pb.set_message(format!("{} @ {window_width_ms} ms", file_label(path))),
            FileEvent::Finished { .. } | FileEvent::Failed { .. } => pb.inc(1),
        })
        .run(files);
    pb.finish_and_clear();

    Ok(runs?)
}

/// Print the per-file table and statistics of one window width.
pub fn print_run(run: &WidthRun) {
    println!(
        "Window {:.1} ms: {} analysed, {} failed",
        run.window_width_s * 1e3,
        run.results.len(),
        run.failures.len()
    );

    if !run.results.is_empty() {
        println!(
            "  {:<32} {:>12} {:>14} {:>9}",
            "File", "Resonance", "Max level", "At"
        );
        for r in &run.results {
            println!(
                "  {:<32} {:>9.1} Hz {:>9.2} {:<4} {:>7.3} s",
                r.file_name,
                r.resonance_hz,
                r.max_level_db,
                r.unit.suffix(),
                r.max_level_time_s
            );
        }
    }

    for failure in &run.failures {
        println!("  failed: {}: {}", failure.file.display(), failure.error);
    }

    if let Some(stats) = &run.stats {
        println!(
            "  Mean: {:.2} {}, std: {:.2} dB (n = {})",
            stats.mean_db, stats.unit, stats.std_db, stats.count
        );
    }
}

/// Write `report` as pretty JSON.
pub fn write_json(path: &Path, report: &RunReport) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    println!("Wrote report to {}", path.display());
    Ok(())
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
