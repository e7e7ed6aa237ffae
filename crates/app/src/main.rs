//! embroidery-export - write a stitch point list as a Tajima DST file

use anyhow::{Context, Result};
use clap::Parser;
use embroidery::{DstEncoder, DstFile};
use embroidery_config::EncoderConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod points;

use config::Cli;

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    let config = cli.apply(EncoderConfig::from_env())?;
    info!(
        "Exporting {} (scale {}x{}, max step {})",
        cli.points.display(),
        config.scale_x,
        config.scale_y,
        config.max_step
    );

    let points = points::load_points(&cli.points)?;
    let label = config.label.clone();
    let mut encoder = DstEncoder::new(config);

    let Some(path) = encoder
        .export_file(&points, &label)
        .context("DST export failed")?
    else {
        println!("no output (fewer than 2 points)");
        return Ok(());
    };
    println!("{}", path.display());

    if cli.inspect {
        let bytes = std::fs::read(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let file = DstFile::parse(&bytes)?;
        println!("{}", serde_json::to_string_pretty(&file.header)?);
        println!("records: {}", file.records.len());
    }

    Ok(())
}
