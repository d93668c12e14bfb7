//! Codec configuration module.
//!
//! Handles loading and validating a codec `config.toml`. Every table is
//! `#[serde(default)]`, so a user file only needs the keys it wants to
//! override.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [encoding]
//! jpeg_quality = 75         # JPEG quality (1-100)
//!
//! [resample]
//! filter = "triangle"       # nearest | triangle | catmull-rom | gaussian | lanczos3
//! ```
//!
//! Unknown keys are rejected to catch typos early.
//!
//! The resulting [`CodecConfig`] is turned into a codec with
//! [`RustCodec::from_config`](crate::imaging::RustCodec::from_config).

use crate::imaging::ResampleFilter;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Codec configuration loaded from TOML.
///
/// All fields have defaults. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CodecConfig {
    /// Encoder settings.
    pub encoding: EncodingConfig,
    /// Resample-copy settings.
    pub resample: ResampleConfig,
}

impl CodecConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.encoding.jpeg_quality) {
            return Err(ConfigError::Validation(
                "encoding.jpeg_quality must be 1-100".into(),
            ));
        }
        Ok(())
    }
}

/// Encoder settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EncodingConfig {
    /// JPEG quality (1 = worst, 100 = best).
    pub jpeg_quality: u32,
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self { jpeg_quality: 75 }
    }
}

/// Resample-copy settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResampleConfig {
    /// Interpolation filter used when rescaling.
    pub filter: ResampleFilter,
}

// =============================================================================
// Config loading and validation
// =============================================================================

/// Parse a TOML string. Omitted keys keep their stock defaults.
pub fn parse_config(content: &str) -> Result<CodecConfig, ConfigError> {
    let config: CodecConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Load config from a TOML file.
///
/// A missing file yields the stock defaults. Otherwise unknown keys are
/// rejected and the result is validated.
pub fn load_config(path: &Path) -> Result<CodecConfig, ConfigError> {
    if !path.exists() {
        log::debug!("No codec config at {}, using defaults", path.display());
        return Ok(CodecConfig::default());
    }
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Returns a fully-commented stock config file with all keys and explanations.
pub fn stock_config_toml() -> &'static str {
    r##"# simple-image codec configuration
# ================================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Encoding
# ---------------------------------------------------------------------------
[encoding]
# JPEG quality (1 = worst, 100 = best). PNG, GIF and BMP are lossless.
jpeg_quality = 75

# ---------------------------------------------------------------------------
# Resampling
# ---------------------------------------------------------------------------
[resample]
# Interpolation filter used by rescale:
# nearest | triangle | catmull-rom | gaussian | lanczos3
filter = "triangle"
"##
}
