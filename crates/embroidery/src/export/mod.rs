//! File assembly for the DST exporter.
//!
//! This module provides:
//! - [`DstEncoder`] - Reusable encoder running convert, split, header, records, trailer
//! - [`EncodeStage`] - Stage reached by the last encode call
//! - [`EncodedDesign`] / [`EncodeSummary`] - Output bytes and the values behind them
//!
//! ## File layout
//!
//! ```text
//! bytes 0..512          ASCII header (see codec::encode_header)
//! bytes 512..512+3n     n motion records, n = points after splitting
//! last 3 bytes          00 00 F3
//! ```
//!
//! The first record is always a zero move for the first point, so a path of
//! n points yields n records, not n - 1.

mod encoder;
mod file;

pub use encoder::{encode_dst, encode_records, DstEncoder, EncodeStage, EncodeSummary, EncodedDesign};
pub use file::dst_path;
