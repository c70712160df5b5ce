//! Platform-specific paths for configuration and user resonators.
//!
//! # Directory Structure
//!
//! - **User config**: `~/.config/resonometer/` (Linux), `~/Library/Application Support/resonometer/` (macOS), `%APPDATA%\resonometer\` (Windows)
//! - **User resonators**: `<user config>/resonators/`
//!
//! # Example
//!
//! ```rust,no_run
//! use resonometer_config::paths;
//!
//! let config_path = paths::default_config_path();
//! println!("Config: {:?}", config_path);
//!
//! // Factory resonators first, then <user config>/resonators/<name>.toml
//! let bottle = paths::find_resonator("beer-bottle").unwrap();
//! println!("{} dB", bottle.reference_level_db);
//! ```

use std::path::{Path, PathBuf};

use crate::{ConfigError, Resonator, resonator_preset};

/// Application name used for directory paths.
const APP_NAME: &str = "resonometer";

/// File name of the default configuration.
const CONFIG_FILE: &str = "resonometer.toml";

/// Subdirectory name for user resonators.
const RESONATORS_SUBDIR: &str = "resonators";

/// Returns the user-specific configuration directory.
///
/// Returns a fallback path if the config directory cannot be determined.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Returns the path of the configuration file loaded when none is given.
pub fn default_config_path() -> PathBuf {
    user_config_dir().join(CONFIG_FILE)
}

/// Returns the directory searched for user-defined resonators.
pub fn user_resonators_dir() -> PathBuf {
    user_config_dir().join(RESONATORS_SUBDIR)
}

/// Resolve a resonator by name or path.
///
/// Searches in the following order:
/// 1. An existing TOML file at `name`
/// 2. Factory resonators
/// 3. The user resonators directory
///
/// # Errors
///
/// [`ConfigError::ResonatorNotFound`] if nothing matches, or a read/parse
/// error if a matching file is malformed.
pub fn find_resonator(name: &str) -> Result<Resonator, ConfigError> {
    find_resonator_in(name, &user_resonators_dir())
}

/// Like [`find_resonator`], searching `dir` instead of the user directory.
pub fn find_resonator_in(name: &str, dir: &Path) -> Result<Resonator, ConfigError> {
    let path = PathBuf::from(name);
    if path.is_file() {
        return load_resonator(&path);
    }

    if let Some(resonator) = resonator_preset(name) {
        return Ok(resonator);
    }

    let filename = if name.ends_with(".toml") {
        name.to_string()
    } else {
        format!("{name}.toml")
    };
    let user_path = dir.join(filename);
    if user_path.is_file() {
        return load_resonator(&user_path);
    }

    Err(ConfigError::ResonatorNotFound(name.to_string()))
}

fn load_resonator(path: &Path) -> Result<Resonator, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
    Ok(toml::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const WINE_BOTTLE: &str = r#"
name = "wine-bottle"
reference_level_db = 88.0
reference_uncertainty_db = 1.0
accepted_range = { min_hz = 110.0, max_hz = 130.0 }
"#;

    #[test]
    fn config_paths_live_under_app_dir() {
        assert!(user_config_dir().ends_with(APP_NAME));
        assert!(default_config_path().ends_with("resonometer/resonometer.toml"));
        assert!(user_resonators_dir().ends_with("resonometer/resonators"));
    }

    #[test]
    fn factory_resonator_wins() {
        let dir = TempDir::new().unwrap();
        let found = find_resonator_in("beer-bottle", dir.path()).unwrap();
        assert_eq!(found.reference_level_db, 92.79);
    }

    #[test]
    fn user_resonator_by_name() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("wine-bottle.toml"), WINE_BOTTLE).unwrap();

        let found = find_resonator_in("wine-bottle", dir.path()).unwrap();
        assert_eq!(found.name, "wine-bottle");
        assert_eq!(found.accepted_range.min_hz, 110.0);
    }

    #[test]
    fn resonator_by_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(&path, WINE_BOTTLE).unwrap();

        let found = find_resonator_in(path.to_str().unwrap(), Path::new("/nonexistent")).unwrap();
        assert_eq!(found.reference_level_db, 88.0);
    }

    #[test]
    fn missing_resonator() {
        let dir = TempDir::new().unwrap();
        let err = find_resonator_in("tuba", dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ResonatorNotFound(ref n) if n == "tuba"));
    }

    #[test]
    fn malformed_resonator_is_a_parse_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("broken.toml"), "name = 3").unwrap();
        let err = find_resonator_in("broken", dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::TomlParse(_)));
    }
}
