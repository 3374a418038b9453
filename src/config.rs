//! Pipeline configuration.
//!
//! Settings come from an optional `datagen.toml`. Stock defaults are the base
//! layer; the user file overrides only the keys it names. Command-line flags
//! override both.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! domain = "tfc"            # Namespace the built-in generators write into
//! locale = "en_us"          # Lang file name: <domain>/lang/<locale>.json
//!
//! [output]
//! root = "generated"        # Output directory (created if missing)
//! indent = 2                # JSON indent width, 0 = compact
//! manifest = false          # Record produced paths in .datagen-manifest.json
//! clean = "deferred"        # "deferred" or "eager"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::handle::ResourceHandle;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILENAME: &str = "datagen.toml";

/// Widest accepted JSON indent.
const MAX_INDENT: usize = 8;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatagenConfig {
    /// Namespace for the built-in generators.
    pub domain: String,
    /// Locale of the per-domain lang table.
    pub locale: String,
    /// Where and how output is written.
    pub output: OutputConfig,
}

impl Default for DatagenConfig {
    fn default() -> Self {
        Self {
            domain: "tfc".to_string(),
            locale: "en_us".to_string(),
            output: OutputConfig::default(),
        }
    }
}

impl DatagenConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // domain and locale both end up as handle segments
        ResourceHandle::new(&self.domain, "lang", &[&self.locale])
            .map_err(|e| ConfigError::Validation(e.to_string()))?;
        if self.output.indent > MAX_INDENT {
            return Err(ConfigError::Validation(format!(
                "output.indent must be 0-{MAX_INDENT}"
            )));
        }
        if self.output.root.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "output.root must not be empty".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub root: PathBuf,
    pub indent: usize,
    pub manifest: bool,
    pub clean: CleanPolicy,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("generated"),
            indent: 2,
            manifest: false,
            clean: CleanPolicy::default(),
        }
    }
}

/// When stale files from a previous run are removed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CleanPolicy {
    /// Delete stale files only after every new file has been written.
    /// A failed run leaves the previous output untouched.
    #[default]
    Deferred,
    /// Delete every previously present file before generating.
    Eager,
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(DatagenConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value. `Ok(None)` if it does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Load config from `path`, merged over stock defaults and validated.
///
/// A missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<DatagenConfig, ConfigError> {
    let base = stock_defaults_value();
    let merged = match load_raw_config(path)? {
        Some(overlay) => merge_toml(base, overlay),
        None => base,
    };
    let config: DatagenConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `datagen.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# tfc-datagen configuration
# =========================
# All options are optional. Values shown are the defaults.

# Namespace the built-in generators write into. Lowercase letters, digits
# and '_' only.
domain = "tfc"

# Locale of the per-domain lang table: <domain>/lang/<locale>.json
locale = "en_us"

[output]
# Output directory. Every file under it that a run does not produce is
# deleted at the end of that run.
root = "generated"

# JSON indent width in spaces (0-8). 0 writes compact single-line JSON.
indent = 2

# Write .datagen-manifest.json listing every produced path. Optional; stale
# detection always uses a directory listing.
manifest = false

# When to remove stale files:
#   "deferred"  after all new files are written (a failed run changes nothing)
#   "eager"     before generating
clean = "deferred"
"##
}
