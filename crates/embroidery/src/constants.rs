/// Largest single-axis move a normal stitch record can carry (0.1 mm units).
pub const MAX_STITCH_STEP: i32 = 121;

/// Largest coordinate magnitude accepted by the encoder (100 m in device units).
///
/// Keeps header extents and offsets inside `i32` and bounds the number of
/// points the splitter can insert for one step.
pub const MAX_COORDINATE: f64 = 1_000_000.0;

/// Fixed size of the ASCII header block.
pub const HEADER_LEN: usize = 512;

/// Size of one motion record.
pub const RECORD_LEN: usize = 3;

/// Maximum number of label characters stored in the `LA` field.
pub const LABEL_WIDTH: usize = 15;

/// Control byte terminating every header field.
pub const FIELD_TERMINATOR: u8 = 0x1A;

/// Fill byte for the unused tail of the header block.
pub const HEADER_FILL: u8 = b' ';

/// Color changes reported in the header (single-color designs only).
pub const COLOR_CHANGES: i32 = 1;

/// Contents of the `PD` header field.
pub const PD_PLACEHOLDER: &str = "*****";

/// Low bits of byte 2 set on every normal stitch record.
pub const RECORD_SET_BITS: u8 = 0b0000_0011;

/// Trailer record terminating the stitch stream.
pub const END_OF_FILE: [u8; 3] = [0x00, 0x00, 0xF3];
