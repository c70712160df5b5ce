//! Summary of a single recording.

use clap::Args;
use resonometer_analysis::{detect_resonance, remove_dc};
use resonometer_io::read_recording;
use std::path::PathBuf;

/// Show the format, peak and resonance of a recording.
#[derive(Args)]
pub struct InfoArgs {
    /// Path to the WAV file
    pub file: PathBuf,
}

/// Run the info command.
pub fn run(args: InfoArgs) -> anyhow::Result<()> {
    let recording = read_recording(&args.file)?;
    let full_scale = recording.full_scale();
    let peak = recording.samples.iter().fold(0.0f64, |m, x| m.max(x.abs()));

    let mut signal = recording.samples.clone();
    let dc = remove_dc(&mut signal);
    let resonance_hz = detect_resonance(&signal, f64::from(recording.sample_rate))?;

    println!("File:        {}", args.file.display());
    println!(
        "Format:      {} {}-bit, {} channel(s)",
        recording.format, recording.bits_per_sample, recording.channels
    );
    println!("Sample Rate: {} Hz", recording.sample_rate);
    println!(
        "Duration:    {:.3}s ({} frames)",
        recording.duration_secs(),
        recording.samples.len()
    );
    println!("Full Scale:  {full_scale}");
    if peak > 0.0 {
        println!(
            "Peak:        {peak} ({:.2} dBFS)",
            20.0 * (peak / full_scale).log10()
        );
    } else {
        println!("Peak:        silent");
    }
    println!("DC Offset:   {dc:.2}");
    println!("Resonance:   {resonance_hz:.1} Hz (channel 1)");

    Ok(())
}
