use thiserror::Error;
use tracing::warn;

use embroidery_config::ConfigError;

use crate::constants::{HEADER_LEN, LABEL_WIDTH, MAX_COORDINATE};
use crate::types::{Axis, Point};

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: &'static str },
    #[error("Non-finite coordinate at index {index}: ({x}, {y})")]
    NonFiniteCoordinate { index: usize, x: f64, y: f64 },
    #[error("Coordinate at index {index} out of range: ({x}, {y}) (limit ±{limit})", limit = MAX_COORDINATE)]
    CoordinateOutOfRange { index: usize, x: f64, y: f64 },
    #[error("Invalid encoder config: {0}")]
    Config(#[from] ConfigError),
    #[error("Remaining stitch distance should be zero: {axis} delta {delta} left {remainder}")]
    NonZeroRemainder { axis: Axis, delta: i32, remainder: i32 },
    #[error("Header is {len} bytes, exceeds {}", HEADER_LEN)]
    HeaderOverflow { len: usize },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("File is {len} bytes, shorter than the {} byte header", HEADER_LEN)]
    TooShort { len: usize },
    #[error("No end-of-file record")]
    MissingTrailer,
    #[error("Incomplete motion record at byte {offset}")]
    MalformedRecord { offset: usize },
    #[error("Malformed header: {reason}")]
    MalformedHeader { reason: String },
}

/// Reject NaN and infinite coordinates, reporting the first offender.
pub fn validate_finite(points: &[Point]) -> Result<(), EncodeError> {
    match points.iter().position(|p| !p.is_finite()) {
        Some(index) => Err(EncodeError::NonFiniteCoordinate {
            index,
            x: points[index].x,
            y: points[index].y,
        }),
        None => Ok(()),
    }
}

/// Reject coordinates beyond [`MAX_COORDINATE`] on either axis.
pub fn validate_range(points: &[Point]) -> Result<(), EncodeError> {
    let limit = Point::splat(MAX_COORDINATE);
    match points.iter().position(|p| p.abs().cmpgt(limit).any()) {
        Some(index) => Err(EncodeError::CoordinateOutOfRange {
            index,
            x: points[index].x,
            y: points[index].y,
        }),
        None => Ok(()),
    }
}

/// Integer step between two stitches, truncated toward zero per axis.
pub fn stitch_delta(current: Point, next: Point) -> (i32, i32) {
    let delta = next - current;
    (delta.x as i32, delta.y as i32)
}

/// Check if a step fits in a single record on both axes
pub fn within_step(current: Point, next: Point, max_step: i32) -> bool {
    let (dx, dy) = stitch_delta(current, next);
    dx.abs() <= max_step && dy.abs() <= max_step
}

/// Make a label safe for the `LA` field.
///
/// Keeps the first 15 characters and replaces anything outside printable
/// ASCII with `?`.
pub fn sanitize_label(label: &str) -> String {
    let char_count = label.chars().count();
    if char_count > LABEL_WIDTH {
        warn!(
            "Label {:?} is {} characters, truncating to {}",
            label, char_count, LABEL_WIDTH
        );
    }

    let sanitized: String = label
        .chars()
        .take(LABEL_WIDTH)
        .map(|c| if c == ' ' || c.is_ascii_graphic() { c } else { '?' })
        .collect();

    if sanitized.chars().zip(label.chars()).any(|(a, b)| a != b) {
        warn!("Label {:?} contains non-printable characters", label);
    }

    sanitized
}
