//! Shared configuration for the embroidery encoder
//!
//! This crate provides the single source of truth for encoder settings shared
//! by the library and the exporter binary: step limit, coordinate scale,
//! default label and output location.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest step a DST record can encode, in device units
pub const DEFAULT_MAX_STEP: i32 = 121;

/// Default scale factor (1.0 = input already in device units)
pub const DEFAULT_SCALE: f64 = 1.0;

/// Label used when the caller does not provide one
pub const DEFAULT_LABEL: &str = "embroidery";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid max_step: {0} (must be 1..={max})", max = DEFAULT_MAX_STEP)]
    InvalidMaxStep(i32),
    #[error("Invalid scale_{axis}: {value} (must be finite and non-zero)")]
    InvalidScale { axis: char, value: f64 },
}

/// Encoder configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// Maximum single-axis distance between consecutive stitches
    pub max_step: i32,
    /// Multiplier applied to caller x coordinates
    pub scale_x: f64,
    /// Multiplier applied to caller y coordinates
    pub scale_y: f64,
    /// Header label when none is given per call
    pub label: String,
    /// Directory for exported files
    pub output_dir: PathBuf,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            max_step: DEFAULT_MAX_STEP,
            scale_x: DEFAULT_SCALE,
            scale_y: DEFAULT_SCALE,
            label: DEFAULT_LABEL.to_string(),
            output_dir: PathBuf::from("."),
        }
    }
}

impl EncoderConfig {
    /// Same scale on both axes
    pub fn with_scale(scale: f64) -> Self {
        Self {
            scale_x: scale,
            scale_y: scale,
            ..Default::default()
        }
    }

    /// Check ranges the encoder relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=DEFAULT_MAX_STEP).contains(&self.max_step) {
            return Err(ConfigError::InvalidMaxStep(self.max_step));
        }
        for (axis, value) in [('x', self.scale_x), ('y', self.scale_y)] {
            if !value.is_finite() || value == 0.0 {
                return Err(ConfigError::InvalidScale { axis, value });
            }
        }
        Ok(())
    }

    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults with `EMBROIDERY_*` environment overrides applied.
    ///
    /// Values that fail to parse are ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(step) = lookup("EMBROIDERY_MAX_STEP").and_then(|v| v.parse().ok()) {
            config.max_step = step;
        }
        if let Some(scale) = lookup("EMBROIDERY_SCALE_X").and_then(|v| v.parse().ok()) {
            config.scale_x = scale;
        }
        if let Some(scale) = lookup("EMBROIDERY_SCALE_Y").and_then(|v| v.parse().ok()) {
            config.scale_y = scale;
        }
        if let Some(label) = lookup("EMBROIDERY_LABEL") {
            config.label = label;
        }
        if let Some(dir) = lookup("EMBROIDERY_OUTPUT_DIR") {
            config.output_dir = PathBuf::from(dir);
        }
        config
    }
}
