//! Level analysis of resonator recordings.

use clap::Args;
use resonometer_pipeline::RunReport;
use std::path::PathBuf;

use super::common::{MeterArgs, print_run, run_aggregator, write_json};

/// Measure the maximum band level of each recording.
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Input WAV files
    #[arg(value_name = "FILES")]
    pub files: Vec<PathBuf>,

    #[command(flatten)]
    pub meter: MeterArgs,
}

/// Run the analyze command.
pub fn run(args: AnalyzeArgs) -> anyhow::Result<()> {
    let config = args.meter.load_config()?;
    let runs = run_aggregator(&config, &args.files, !args.meter.no_progress)?;

    for run in &runs {
        print_run(run);
        if let Some(spectrum_range) = config.spectrum_range_hz {
            for result in &run.results {
                let peak = result.spectrum.as_ref().and_then(|s| s.peak());
                if let Some((freq, level)) = peak {
                    println!(
                        "  {}: spectrum peak in {spectrum_range} at {freq:.1} Hz, {level:.2} {}",
                        result.file_name, result.unit
                    );
                }
            }
        }
    }

    if let Some(path) = &args.meter.json {
        write_json(path, &RunReport::analysis(&config, runs))?;
    }

    Ok(())
}
