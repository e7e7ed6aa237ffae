use crate::types::{BoundingBox, Point};
use crate::validation::EncodeError;

/// Min/max extents over a stitch path.
///
/// Starts from the first point and folds in the rest. An empty path has no
/// bounding box.
pub fn bounding_box(points: &[Point]) -> Result<BoundingBox, EncodeError> {
    let (&first, rest) = points.split_first().ok_or(EncodeError::InvalidInput {
        reason: "bounding box of an empty path",
    })?;

    let mut bounds = BoundingBox::from_point(first);
    for &point in rest {
        bounds.include(point);
    }
    Ok(bounds)
}
