//! Command-line options and how they layer over the environment config

use std::path::PathBuf;

use clap::Parser;
use embroidery_config::{ConfigError, EncoderConfig};

/// Export a stitch point list as a Tajima DST file
#[derive(Debug, Parser)]
#[command(name = "embroidery-export", version)]
pub struct Cli {
    /// JSON file holding an array of [x, y] points
    pub points: PathBuf,

    /// Design label (header LA field and file name)
    #[arg(long)]
    pub label: Option<String>,

    /// Output directory
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Multiplier for x coordinates
    #[arg(long)]
    pub scale_x: Option<f64>,

    /// Multiplier for y coordinates
    #[arg(long)]
    pub scale_y: Option<f64>,

    /// Maximum step between stitches (1..=121)
    #[arg(long)]
    pub max_step: Option<i32>,

    /// Read the written file back and print its header
    #[arg(long)]
    pub inspect: bool,
}

impl Cli {
    /// Apply flags on top of `base` and validate the result.
    pub fn apply(&self, base: EncoderConfig) -> Result<EncoderConfig, ConfigError> {
        let mut config = base;
        if let Some(label) = &self.label {
            config.label = label.clone();
        }
        if let Some(out) = &self.out {
            config.output_dir = out.clone();
        }
        if let Some(scale) = self.scale_x {
            config.scale_x = scale;
        }
        if let Some(scale) = self.scale_y {
            config.scale_y = scale;
        }
        if let Some(step) = self.max_step {
            config.max_step = step;
        }
        config.validate()?;
        Ok(config)
    }
}
