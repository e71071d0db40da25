//! Tool configuration module.
//!
//! Handles loading, validating, and merging `thumbsmith.toml`. Stock defaults
//! are serialized from [`Config::default`] and the user file is deep-merged on
//! top, so a config file only needs the keys it wants to change.
//!
//! ## Config File Location
//!
//! `thumbsmith.toml` in the working directory, or any file passed with
//! `--config <path>`.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [imagemagick]
//! # executable = "/usr/local/bin/convert"  # Explicit resizer path
//! search_paths = []                         # Extra dirs searched before PATH
//!
//! [processing]
//! # max_processes = 4                       # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name looked up in the working directory.
pub const CONFIG_FILENAME: &str = "thumbsmith.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Tool configuration loaded from `thumbsmith.toml`.
///
/// All fields have defaults. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Where to find the ImageMagick executable.
    pub imagemagick: ImageMagickConfig,
    /// Worker pool settings.
    pub processing: ProcessingConfig,
}

impl Config {
    /// Reject values that deserialize but cannot be used.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self
            .imagemagick
            .executable
            .as_ref()
            .is_some_and(|p| p.as_os_str().is_empty())
        {
            return Err(ConfigError::Validation(
                "imagemagick.executable must not be empty".into(),
            ));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// ImageMagick lookup settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImageMagickConfig {
    /// Explicit path to `convert` (`magick` on Windows). Used when it exists.
    pub executable: Option<PathBuf>,
    /// Directories searched for the executable before `PATH`.
    pub search_paths: Vec<PathBuf>,
}

/// Worker pool settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Number of rayon workers for multi-file commands.
///
/// All cores unless `max_processes` asks for fewer.
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism().map_or(1, |n| n.get());
    config.max_processes.map_or(cores, |n| n.min(cores))
}

// =============================================================================
// Layered loading
// =============================================================================

/// [`Config::default`] as a TOML table.
///
/// This is the base layer user overrides are merged onto.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(Config::default()).expect("default config must serialize")
}

/// Deep-merge `overlay` into `base`.
///
/// Tables merge per key; anything else in `overlay` (arrays included)
/// replaces the base value outright.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                let value = match base_table.remove(&key) {
                    Some(existing) => merge_toml(existing, value),
                    None => value,
                };
                base_table.insert(key, value);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist and `Err` if it exists but
/// contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Layer the user file (if any) over `base` and build a validated [`Config`].
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<Config, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: Config = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load `thumbsmith.toml` from `dir`, falling back to defaults when absent.
pub fn load_config(dir: &Path) -> Result<Config, ConfigError> {
    let overlay = load_raw_config(&dir.join(CONFIG_FILENAME))?;
    resolve_config(stock_defaults_value(), overlay)
}

/// Load an explicitly named config file, which must exist.
pub fn load_config_file(path: &Path) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path)?;
    let overlay: toml::Value = toml::from_str(&content)?;
    resolve_config(stock_defaults_value(), Some(overlay))
}

/// Returns a fully-commented stock `thumbsmith.toml`.
///
/// Printed by `thumbsmith gen-config`.
pub fn stock_config_toml() -> &'static str {
    r##"# thumbsmith Configuration
# ========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# thumbsmith reads ./thumbsmith.toml, or the file given with --config.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# ImageMagick
# ---------------------------------------------------------------------------
[imagemagick]
# Explicit path to the resizer executable (`convert`, or `magick` on Windows).
# Used when the file exists; otherwise the search continues below.
# executable = "/usr/local/bin/convert"

# Directories searched for the executable before falling back to PATH.
search_paths = []

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel workers for multi-file commands.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
