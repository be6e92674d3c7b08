//! Deck configuration module.
//!
//! Handles loading, validating, and merging `carousel.toml`. Stock defaults
//! are the base layer; a `carousel.toml` in the deck source directory
//! overrides any subset of them.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [tracking]
//! threshold = 0.5           # Visibility ratio that commits a slide as active
//!
//! [viewport]
//! slide_width = 1280.0      # Slide width used by the simulated viewport
//!
//! [strings]
//! # placeholders = "strings" # Root of placeholder sheets (omit for English)
//! language = "default"      # "default" reads <root>/placeholders.json
//!
//! [render]
//! standalone = true         # Full HTML document with embedded stylesheet
//!
//! [processing]
//! max_processes = 4         # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::tracker::DEFAULT_THRESHOLD;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name looked up in the deck source directory.
pub const CONFIG_FILE: &str = "carousel.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Deck configuration loaded from `carousel.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CarouselConfig {
    /// Active-slide commitment settings.
    pub tracking: TrackingConfig,
    /// Simulated viewport geometry.
    pub viewport: ViewportConfig,
    /// Where localized labels come from.
    pub strings: StringsConfig,
    /// HTML output shape.
    pub render: RenderConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl CarouselConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = self.tracking.threshold;
        if !(t > 0.0 && t <= 1.0) {
            return Err(ConfigError::Validation(
                "tracking.threshold must be in (0, 1]".into(),
            ));
        }
        if !(self.viewport.slide_width > 0.0) || !self.viewport.slide_width.is_finite() {
            return Err(ConfigError::Validation(
                "viewport.slide_width must be a positive number".into(),
            ));
        }
        if self.strings.language.trim().is_empty() {
            return Err(ConfigError::Validation(
                "strings.language must not be empty".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrackingConfig {
    /// Intersection ratio at or above which a slide becomes active.
    pub threshold: f64,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewportConfig {
    pub slide_width: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            slide_width: 1280.0,
        }
    }
}

/// String table source.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StringsConfig {
    /// Directory holding placeholder sheets, relative to the deck source.
    /// When absent, the built-in English labels are used.
    pub placeholders: Option<String>,
    /// Sheet language. `"default"` is the root sheet.
    pub language: String,
}

impl Default for StringsConfig {
    fn default() -> Self {
        Self {
            placeholders: None,
            language: "default".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Wrap the carousel in a full HTML page. `false` writes a bare fragment.
    pub standalone: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { standalone: true }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel render workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(CarouselConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// Tables merge key-by-key; any other overlay value replaces the base value.
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

/// Load `carousel.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the directory has no `carousel.toml`.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    Ok(Some(toml::from_str(&content)?))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<CarouselConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: CarouselConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `carousel.toml` in `dir`, on top of stock defaults.
pub fn load_config(dir: &Path) -> Result<CarouselConfig, ConfigError> {
    resolve_config(stock_defaults_value(), load_raw_config(dir)?)
}

/// Fully-commented stock `carousel.toml`. Printed by `gen-config`.
pub fn stock_config_toml() -> &'static str {
    r##"# Carousel Deck Configuration
# ===========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Place this file as carousel.toml in the deck source directory.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Active slide tracking
# ---------------------------------------------------------------------------
[tracking]
# A slide becomes active when its visible fraction rises from below this
# value to at or above it. Must be greater than 0 and at most 1.
threshold = 0.5

# ---------------------------------------------------------------------------
# Simulated viewport (used by `simulate`)
# ---------------------------------------------------------------------------
[viewport]
# Width of one slide in pixels. Slides are laid out edge to edge.
slide_width = 1280.0

# ---------------------------------------------------------------------------
# Localized labels
# ---------------------------------------------------------------------------
[strings]
# Directory holding placeholder sheets, relative to the source directory.
# Omit to use the built-in English labels.
# placeholders = "strings"

# Sheet language. "default" reads <placeholders>/placeholders.json,
# anything else reads <placeholders>/<language>/placeholders.json.
language = "default"

# ---------------------------------------------------------------------------
# Output
# ---------------------------------------------------------------------------
[render]
# Write a full HTML page with the stock stylesheet.
# Set to false to write only the carousel fragment.
standalone = true

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel render workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
