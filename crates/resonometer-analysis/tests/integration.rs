//! Integration tests for resonometer-analysis.
//!
//! Runs the full signal chain (DC removal, resonance detection, sliding band
//! power, level conversion, statistics) on synthetic bottle tones with known
//! level.

use proptest::prelude::*;
use resonometer_analysis::{
    AggregateStats, BandEdge, LevelReference, LevelUnit, SlidingAnalyzer, SlidingParams, Window,
    detect_resonance, even_window_len, extract_segment, remove_dc, sine,
};

const FULL_SCALE_I16: f64 = 32767.0;

/// Run the chain on one signal and return (resonance, max level).
fn max_level(
    signal: &[f64],
    sample_rate: f64,
    params: SlidingParams,
    unit: LevelUnit,
) -> (f64, f64) {
    let mut signal = signal.to_vec();
    remove_dc(&mut signal);
    let f_res = detect_resonance(&signal, sample_rate).unwrap();
    let analyzer = SlidingAnalyzer::new(sample_rate, f_res, params).unwrap();
    let reference = LevelReference::for_unit(unit, FULL_SCALE_I16, sample_rate);
    let series = reference.convert_steps(analyzer.steps(&signal)).unwrap();
    (f_res, series.max_level_db().unwrap())
}

// ---------------------------------------------------------------------------
// Reference scenario
// ---------------------------------------------------------------------------

#[test]
fn half_scale_bottle_tone_reads_minus_nine_dbfs() {
    // 1 s, 44.1 kHz, 170 Hz, amplitude half of int16 max, 35 ms / 0.5 / 120 Hz.
    // A sine at half scale carries (1/2)^2 / 2 of full-scale power: -9.03 dB FS.
    let sample_rate = 44100.0;
    let signal = sine(170.0, sample_rate, 44100, FULL_SCALE_I16 / 2.0);

    let (f_res, max_db) = max_level(
        &signal,
        sample_rate,
        SlidingParams::default(),
        LevelUnit::FullScale,
    );

    assert!((f_res - 170.0).abs() <= 1.0, "resonance {f_res}");
    let expected = 10.0 * (1.0_f64 / 8.0).log10();
    assert!(
        (max_db - expected).abs() < 0.5,
        "max level {max_db:.3} dB FS, expected about {expected:.3}"
    );
}

#[test]
fn full_scale_sine_reads_minus_three_dbfs() {
    let sample_rate = 48000.0;
    let signal = sine(175.0, sample_rate, 48000, FULL_SCALE_I16);
    let (_, max_db) = max_level(
        &signal,
        sample_rate,
        SlidingParams::default(),
        LevelUnit::FullScale,
    );
    assert!((max_db + 3.01).abs() < 0.5, "max level {max_db:.3}");
}

#[test]
fn halving_amplitude_lowers_level_by_six_db() {
    let sample_rate = 44100.0;
    let loud = sine(165.0, sample_rate, 44100, 20000.0);
    let quiet: Vec<f64> = loud.iter().map(|x| x / 2.0).collect();
    let params = SlidingParams::default();

    let (_, loud_db) = max_level(&loud, sample_rate, params, LevelUnit::FullScale);
    let (_, quiet_db) = max_level(&quiet, sample_rate, params, LevelUnit::FullScale);
    assert!(((loud_db - quiet_db) - 6.0206).abs() < 1e-6);
}

#[test]
fn raw_and_full_scale_differ_by_full_scale_power() {
    let sample_rate = 44100.0;
    let signal = sine(170.0, sample_rate, 22050, 1000.0);
    let params = SlidingParams::default();

    let (_, fs_db) = max_level(&signal, sample_rate, params, LevelUnit::FullScale);
    let (_, raw_db) = max_level(&signal, sample_rate, params, LevelUnit::Raw);
    let expected = 20.0 * FULL_SCALE_I16.log10();
    assert!(((raw_db - fs_db) - expected).abs() < 1e-6);
}

#[test]
fn dc_offset_does_not_move_the_level() {
    let sample_rate = 44100.0;
    let clean = sine(170.0, sample_rate, 44100, 8000.0);
    let offset: Vec<f64> = clean.iter().map(|x| x + 3000.0).collect();
    let params = SlidingParams::default();

    let (f_clean, clean_db) = max_level(&clean, sample_rate, params, LevelUnit::FullScale);
    let (f_offset, offset_db) = max_level(&offset, sample_rate, params, LevelUnit::FullScale);
    assert_eq!(f_clean, f_offset);
    assert!((clean_db - offset_db).abs() < 1e-6);
}

#[test]
fn legacy_band_never_reads_below_symmetric() {
    let sample_rate = 44100.0;
    let signal = sine(170.0, sample_rate, 44100, 10000.0);
    let legacy = SlidingParams::default();
    let symmetric = SlidingParams {
        band_edge: BandEdge::Symmetric,
        ..legacy
    };

    let (_, legacy_db) = max_level(&signal, sample_rate, legacy, LevelUnit::FullScale);
    let (_, symmetric_db) = max_level(&signal, sample_rate, symmetric, LevelUnit::FullScale);
    assert!(legacy_db >= symmetric_db);
    assert!(legacy_db - symmetric_db < 0.1);
}

#[test]
fn hann_window_still_finds_the_level() {
    let sample_rate = 44100.0;
    let signal = sine(170.0, sample_rate, 44100, FULL_SCALE_I16 / 2.0);
    let params = SlidingParams {
        window: Window::Hann,
        ..SlidingParams::default()
    };
    let (_, max_db) = max_level(&signal, sample_rate, params, LevelUnit::FullScale);
    // Hann attenuates mean power by 3/8 (-4.26 dB)
    assert!((max_db - (-9.03 - 4.26)).abs() < 0.5, "max level {max_db:.3}");
}

#[test]
fn sliding_analyzer_is_idempotent() {
    let sample_rate = 16000.0;
    let signal = sine(180.0, sample_rate, 16000, 123.0);
    let analyzer = SlidingAnalyzer::new(sample_rate, 180.0, SlidingParams::default()).unwrap();
    let a: Vec<_> = analyzer.steps(&signal).collect();
    let b: Vec<_> = analyzer.steps(&signal).collect();
    assert_eq!(a, b);
}

#[test]
fn stats_over_file_maxima() {
    let sample_rate = 44100.0;
    let levels: Vec<f64> = [4000.0, 8000.0]
        .iter()
        .map(|&a| {
            let signal = sine(170.0, sample_rate, 44100, a);
            max_level(&signal, sample_rate, SlidingParams::default(), LevelUnit::FullScale).1
        })
        .collect();
    let stats = AggregateStats::from_levels(&levels, LevelUnit::FullScale).unwrap();
    assert_eq!(stats.count, 2);
    // Levels are 6.02 dB apart, so the population std is half of that.
    assert!((stats.std_db - 3.0103).abs() < 1e-3);
}

// ---------------------------------------------------------------------------
// Windowing invariants
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn segment_is_even_and_matches_window(
        width_ms in 1.0f64..200.0,
        start_frac in 0.0f64..0.5,
        rate_idx in 0usize..3,
    ) {
        let sample_rate = [8000.0, 44100.0, 48000.0][rate_idx];
        let width_s = width_ms * 1e-3;
        let signal = vec![1.0; sample_rate as usize];

        let segment =
            extract_segment(&signal, sample_rate, start_frac, width_s, Window::Rectangular)
                .unwrap();
        prop_assert_eq!(segment.len(), segment.coefficients.len());
        prop_assert_eq!(segment.len() % 2, 0);
        prop_assert_eq!(segment.len(), even_window_len(width_s, sample_rate));
    }
}
