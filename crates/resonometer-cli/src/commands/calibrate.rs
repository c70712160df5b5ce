//! Calibration offset estimation.

use clap::Args;
use resonometer_config::find_resonator;
use resonometer_pipeline::{CalibrationOutcome, RunReport};
use std::path::PathBuf;

use super::common::{MeterArgs, parse_range, print_run, run_aggregator, write_json};

/// Estimate the SPL calibration offset from resonator recordings.
#[derive(Args)]
pub struct CalibrateArgs {
    /// Input WAV files
    #[arg(value_name = "FILES")]
    pub files: Vec<PathBuf>,

    #[command(flatten)]
    pub meter: MeterArgs,

    /// Resonator preset name or TOML file
    #[arg(long, value_name = "NAME")]
    pub resonator: Option<String>,

    /// Accepted resonance frequency range in Hz
    #[arg(short = 'f', long = "freq-range", num_args = 2, value_names = ["MIN", "MAX"])]
    pub freq_range: Option<Vec<f64>>,
}

/// Run the calibrate command.
pub fn run(args: CalibrateArgs) -> anyhow::Result<()> {
    let mut config = args.meter.load_config()?;
    if let Some(name) = &args.resonator {
        config.resonator = find_resonator(name)?;
    }
    if let Some(range) = parse_range(args.freq_range.as_deref()) {
        config.resonator.accepted_range = range;
    }

    let runs = run_aggregator(&config, &args.files, !args.meter.no_progress)?;
    let report = RunReport::calibration(&config, runs);

    let resonator = &config.resonator;
    println!(
        "Resonator: {} ({:.2} dB SPL +- {:.2} dB, accepted {})",
        resonator.name,
        resonator.reference_level_db,
        resonator.reference_uncertainty_db,
        resonator.accepted_range
    );

    for width in &report.widths {
        print_run(&width.run);
        match &width.calibration {
            Some(CalibrationOutcome::Calibrated(cal)) => {
                for warning in &cal.excluded {
                    println!("  excluded: {warning}");
                }
                println!(
                    "  Offset: {:+.2} dB, uncertainty: {:.2} dB ({} valid, mean {:.2} {})",
                    cal.offset_db, cal.uncertainty_db, cal.num_valid, cal.mean_level_db, cal.unit
                );
            }
            Some(CalibrationOutcome::NoValidInput { excluded }) => {
                for warning in excluded {
                    println!("  excluded: {warning}");
                }
                println!("  no valid sound files");
            }
            None => {}
        }
    }

    if let Some(path) = &args.meter.json {
        write_json(path, &report)?;
    }

    Ok(())
}
