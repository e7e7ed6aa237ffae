//! Loading stitch points from JSON

use std::path::Path;

use anyhow::{Context, Result};
use embroidery::Point;

/// Parse a JSON array of `[x, y]` pairs.
pub fn parse_points(json: &str) -> Result<Vec<Point>> {
    let pairs: Vec<[f64; 2]> =
        serde_json::from_str(json).context("expected a JSON array of [x, y] pairs")?;
    Ok(pairs.into_iter().map(|[x, y]| Point::new(x, y)).collect())
}

pub fn load_points(path: &Path) -> Result<Vec<Point>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_points(&json).with_context(|| format!("failed to parse {}", path.display()))
}
