//! Scaling of caller coordinates into device units.
//!
//! How the scale is derived (screen DPI, aspect ratio, a flat constant) is up
//! to the caller; this only applies it.

use glam::DVec2;

use crate::types::Point;

/// Multiply every coordinate by its axis scale.
pub fn convert(points: &[Point], scale_x: f64, scale_y: f64) -> Vec<Point> {
    let scale = DVec2::new(scale_x, scale_y);
    points.iter().map(|&p| p * scale).collect()
}
