//! Stitch splitting
//!
//! A DST record moves the needle at most 121 units per axis. Longer steps are
//! broken up by inserting evenly spaced points between the two stitches.
//!
//! The split points are interpolated from the *next* stitch back toward the
//! current one (`next + frac * (current - next)`), and every newly created
//! step is checked again before the walk moves on. Output depends on this
//! exact arithmetic, so both must be kept.

use tracing::trace;

use crate::constants::MAX_STITCH_STEP;
use crate::types::Point;
use crate::validation::within_step;

/// Split with the standard DST step limit.
pub fn split(points: &[Point]) -> Vec<Point> {
    split_with_max_step(points, MAX_STITCH_STEP)
}

/// Insert intermediate points so that no step exceeds `max_step` on either axis.
///
/// The input is left untouched; a fresh path is returned. Paths with fewer
/// than two points come back unchanged.
///
/// Coordinates must be finite. `max_step` is clamped to `1..=121`, the range
/// a single record can carry.
pub fn split_with_max_step(points: &[Point], max_step: i32) -> Vec<Point> {
    let max_step = max_step.clamp(1, MAX_STITCH_STEP);
    let Some((&first, rest)) = points.split_first() else {
        return Vec::new();
    };

    let mut path = Vec::with_capacity(points.len());
    path.push(first);

    // Targets still to be reached from the end of `path`, nearest on top
    let mut pending: Vec<Point> = Vec::new();

    for &target in rest {
        pending.push(target);

        while let Some(next) = pending.pop() {
            // `path` is never empty here
            let current = path[path.len() - 1];

            if within_step(current, next, max_step) {
                path.push(next);
                continue;
            }

            let count = split_count(current, next, max_step);
            trace!(
                "Splitting ({:.2}, {:.2}) -> ({:.2}, {:.2}) into {} steps",
                current.x, current.y, next.x, next.y, count
            );

            pending.push(next);
            let factor = 1.0 / count as f64;
            // k = 1 lies closest to `next`; the last pushed is visited first
            for k in 1..count {
                pending.push(interpolate(next, current, factor * k as f64));
            }
        }
    }

    path
}

/// Number of equal steps needed to cover `current -> next`.
fn split_count(current: Point, next: Point, max_step: i32) -> u32 {
    let distance = (next - current).abs().max_element();
    (distance / max_step as f64).ceil() as u32
}

fn interpolate(end: Point, start: Point, fraction: f64) -> Point {
    end + (start - end) * fraction
}
