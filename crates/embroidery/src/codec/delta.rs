//! Packing of stitch deltas into 3-byte motion records.
//!
//! Each axis is reduced greedily over the weights 81, 27, 9, 3, 1. A weight is
//! taken (positively or negatively) once the remaining delta reaches its
//! threshold of 41, 14, 5, 2 or 1, and the matching bit is set. The digits are
//! redundant, so other decompositions exist that sum to the same value; only
//! this one produces the bytes DST readers expect.

use tracing::trace;

use crate::constants::RECORD_SET_BITS;
use crate::types::{Axis, MotionRecord};
use crate::validation::EncodeError;

/// Target of one weighted digit: (byte index, bit index)
type BitSlot = (usize, u8);

/// One weight level of the ternary-like decomposition
struct Digit {
    weight: i32,
    threshold: i32,
    x_pos: BitSlot,
    x_neg: BitSlot,
    y_pos: BitSlot,
    y_neg: BitSlot,
}

/// Largest weight first; reduction order matters.
const DIGITS: [Digit; 5] = [
    Digit {
        weight: 81,
        threshold: 41,
        x_pos: (2, 2),
        x_neg: (2, 3),
        y_pos: (2, 5),
        y_neg: (2, 4),
    },
    Digit {
        weight: 27,
        threshold: 14,
        x_pos: (1, 2),
        x_neg: (1, 3),
        y_pos: (1, 5),
        y_neg: (1, 4),
    },
    Digit {
        weight: 9,
        threshold: 5,
        x_pos: (0, 2),
        x_neg: (0, 3),
        y_pos: (0, 5),
        y_neg: (0, 4),
    },
    Digit {
        weight: 3,
        threshold: 2,
        x_pos: (1, 0),
        x_neg: (1, 1),
        y_pos: (1, 7),
        y_neg: (1, 6),
    },
    Digit {
        weight: 1,
        threshold: 1,
        x_pos: (0, 0),
        x_neg: (0, 1),
        y_pos: (0, 7),
        y_neg: (0, 6),
    },
];

impl Digit {
    fn slots(&self, axis: Axis) -> (BitSlot, BitSlot) {
        match axis {
            Axis::X => (self.x_pos, self.x_neg),
            Axis::Y => (self.y_pos, self.y_neg),
        }
    }
}

/// Encode one stitch move as a normal motion record.
///
/// Deltas must lie in `-121..=121`; anything the five digits cannot cancel
/// out fails with [`EncodeError::NonZeroRemainder`].
pub fn encode_delta(dx: i32, dy: i32) -> Result<MotionRecord, EncodeError> {
    let mut bytes = [0u8, 0u8, RECORD_SET_BITS];
    pack_axis(&mut bytes, Axis::X, dx)?;
    pack_axis(&mut bytes, Axis::Y, dy)?;
    trace!("encode_delta({}, {}) -> {:02X?}", dx, dy, bytes);
    Ok(MotionRecord(bytes))
}

fn pack_axis(bytes: &mut [u8; 3], axis: Axis, delta: i32) -> Result<(), EncodeError> {
    let mut remaining = delta;

    for digit in &DIGITS {
        let (pos, neg) = digit.slots(axis);
        if remaining >= digit.threshold {
            bytes[pos.0] |= 1 << pos.1;
            remaining -= digit.weight;
        } else if remaining <= -digit.threshold {
            bytes[neg.0] |= 1 << neg.1;
            remaining += digit.weight;
        }
    }

    if remaining != 0 {
        return Err(EncodeError::NonZeroRemainder {
            axis,
            delta,
            remainder: remaining,
        });
    }
    Ok(())
}

/// Recover `(dx, dy)` from a record by summing its set digits.
///
/// Control bits are ignored, so this also reads jump records.
pub fn decode_delta(record: MotionRecord) -> (i32, i32) {
    let bytes = record.0;
    let is_set = |(byte, bit): BitSlot| bytes[byte] & (1 << bit) != 0;

    let mut dx = 0;
    let mut dy = 0;
    for digit in &DIGITS {
        for (axis, total) in [(Axis::X, &mut dx), (Axis::Y, &mut dy)] {
            let (pos, neg) = digit.slots(axis);
            if is_set(pos) {
                *total += digit.weight;
            }
            if is_set(neg) {
                *total -= digit.weight;
            }
        }
    }
    (dx, dy)
}
