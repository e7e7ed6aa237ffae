use serde::{Deserialize, Serialize};

use crate::constants::{END_OF_FILE, RECORD_SET_BITS};

/// A stitch position in device units (0.1 mm per unit).
pub type Point = glam::DVec2;

/// Ordered stitch positions; order is the needle path.
pub type StitchPath = Vec<Point>;

/// Axis of a stitch delta
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::X => f.write_str("x"),
            Axis::Y => f.write_str("y"),
        }
    }
}

/// Extents of a stitch path in device units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Degenerate box covering a single point.
    pub fn from_point(point: Point) -> Self {
        Self {
            min_x: point.x,
            max_x: point.x,
            min_y: point.y,
            max_y: point.y,
        }
    }

    /// Grow the box to include `point`.
    pub fn include(&mut self, point: Point) {
        self.min_x = self.min_x.min(point.x);
        self.max_x = self.max_x.max(point.x);
        self.min_y = self.min_y.min(point.y);
        self.max_y = self.max_y.max(point.y);
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// Record type carried in the low and high bits of byte 2
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordKind {
    /// Normal needle-down move
    Stitch,
    /// Stream terminator
    EndOfFile,
    /// Jump, color change or anything else written by other producers
    Other,
}

/// One 3-byte DST motion record.
///
/// `#[repr(transparent)]` over `[u8; 3]` so a record slice can be viewed as
/// raw file bytes with bytemuck.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, bytemuck::Pod, bytemuck::Zeroable,
)]
#[repr(transparent)]
pub struct MotionRecord(pub [u8; 3]);

impl MotionRecord {
    /// Zero-length stitch, used for the first point of a path.
    pub const ORIGIN: Self = Self([0x00, 0x00, RECORD_SET_BITS]);

    /// Trailer record.
    pub const END_OF_FILE: Self = Self(END_OF_FILE);

    pub fn bytes(&self) -> [u8; 3] {
        self.0
    }

    /// Classify the record from its control bits.
    pub fn kind(&self) -> RecordKind {
        let control = self.0[2];
        if self.0 == END_OF_FILE {
            RecordKind::EndOfFile
        } else if control & RECORD_SET_BITS == RECORD_SET_BITS && control & 0xC0 == 0 {
            RecordKind::Stitch
        } else {
            RecordKind::Other
        }
    }
}

impl From<[u8; 3]> for MotionRecord {
    fn from(bytes: [u8; 3]) -> Self {
        Self(bytes)
    }
}

/// Values rendered into the 512-byte header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderFields {
    /// `LA`: design label, at most 15 characters
    pub label: String,
    /// `ST`: number of stitch records
    pub stitch_count: usize,
    /// `CO`: number of color changes
    pub color_changes: i32,
    /// `+X`
    pub max_x: i32,
    /// `-X`
    pub min_x: i32,
    /// `+Y`
    pub max_y: i32,
    /// `-Y`
    pub min_y: i32,
    /// `AX`: last stitch x minus first stitch x
    pub ax: i32,
    /// `AY`: last stitch y minus first stitch y
    pub ay: i32,
    /// `MX`
    pub mx: i32,
    /// `MY`
    pub my: i32,
    /// `PD`
    pub pd: String,
}
