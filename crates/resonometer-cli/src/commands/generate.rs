//! Test signal generation command.

use clap::{Args, Subcommand};
use resonometer_analysis::sine;
use resonometer_io::{WavSpec, full_scale_value, write_wav};
use std::path::PathBuf;

#[derive(Args)]
pub struct GenerateArgs {
    #[command(subcommand)]
    command: GenerateCommand,
}

#[derive(Subcommand)]
enum GenerateCommand {
    /// Generate a 16-bit sine tone
    Tone {
        /// Output WAV file
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Frequency in Hz
        #[arg(long, default_value = "170.0")]
        freq: f64,

        /// Duration in seconds
        #[arg(long, default_value = "1.0")]
        duration: f64,

        /// Sample rate
        #[arg(long, default_value = "44100")]
        sample_rate: u32,

        /// Amplitude as a fraction of full scale (0-1)
        #[arg(long, default_value = "0.5")]
        amplitude: f64,

        /// Number of channels (the tone is written to every channel)
        #[arg(long, default_value = "1")]
        channels: u16,
    },
}

pub fn run(args: GenerateArgs) -> anyhow::Result<()> {
    match args.command {
        GenerateCommand::Tone {
            output,
            freq,
            duration,
            sample_rate,
            amplitude,
            channels,
        } => {
            anyhow::ensure!(channels > 0, "channel count must be at least 1");
            anyhow::ensure!(
                (0.0..=1.0).contains(&amplitude),
                "amplitude must be between 0 and 1, got {amplitude}"
            );

            println!("Generating sine tone...");
            println!("  {freq} Hz for {duration:.2}s");

            let spec = WavSpec {
                channels,
                sample_rate,
                ..WavSpec::default()
            };
            let peak = amplitude * full_scale_value(spec.format, spec.bits_per_sample);
            let num_samples = (duration * f64::from(sample_rate)) as usize;
            let mono = sine(freq, f64::from(sample_rate), num_samples, peak);
            let samples: Vec<f64> = mono
                .iter()
                .flat_map(|&s| std::iter::repeat_n(s, usize::from(channels)))
                .collect();

            write_wav(&output, &samples, spec)?;
            println!("Wrote {} frames to {}", mono.len(), output.display());
        }
    }

    Ok(())
}
