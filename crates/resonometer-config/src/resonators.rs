//! Factory resonators bundled with resonometer.
//!
//! Each entry describes a physical resonator whose sound level at the
//! recording distance has been measured with a calibrated level meter.

use crate::Resonator;
use resonometer_analysis::FrequencyRange;

/// Array of factory resonator names for external access.
pub static RESONATOR_PRESET_NAMES: &[&str] = &["beer-bottle"];

/// TOML content for factory resonators, embedded at compile time.
static RESONATOR_PRESETS_TOML: &[(&str, &str)] = &[("beer-bottle", BEER_BOTTLE)];

/// 0.5 l longneck beer bottle, blown at the fundamental, 50 cm / arm length.
const BEER_BOTTLE: &str = r#"
name = "beer-bottle"
description = "0.5 l longneck bottle blown at the fundamental, 50 cm from the device"
reference_level_db = 92.79
reference_uncertainty_db = 0.5
accepted_range = { min_hz = 160.0, max_hz = 180.0 }
"#;

/// The default resonator, constructed without parsing.
pub(crate) fn beer_bottle() -> Resonator {
    Resonator {
        name: "beer-bottle".to_string(),
        description: Some(
            "0.5 l longneck bottle blown at the fundamental, 50 cm from the device".to_string(),
        ),
        reference_level_db: 92.79,
        reference_uncertainty_db: 0.5,
        accepted_range: FrequencyRange::new(160.0, 180.0),
    }
}

/// Look up a factory resonator by name (case-insensitive, `_` and `-` are
/// interchangeable).
pub fn resonator_preset(name: &str) -> Option<Resonator> {
    let wanted = normalize(name);
    RESONATOR_PRESETS_TOML
        .iter()
        .find(|(n, _)| normalize(n) == wanted)
        .and_then(|(_, toml_str)| toml::from_str(toml_str).ok())
}

/// All factory resonators.
pub fn resonator_presets() -> Vec<Resonator> {
    RESONATOR_PRESETS_TOML
        .iter()
        .filter_map(|(_, toml_str)| toml::from_str(toml_str).ok())
        .collect()
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase().replace('_', "-")
}
