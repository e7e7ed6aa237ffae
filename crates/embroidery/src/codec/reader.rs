//! Reading DST files back into header fields and stitch positions.

use crate::constants::{HEADER_LEN, RECORD_LEN};
use crate::types::{HeaderFields, MotionRecord, RecordKind};
use crate::validation::DecodeError;

use super::delta::decode_delta;

/// A parsed DST file
#[derive(Debug, Clone)]
pub struct DstFile {
    pub header: HeaderFields,
    /// Motion records up to, not including, the end-of-file record
    pub records: Vec<MotionRecord>,
}

impl DstFile {
    /// Parse a complete file: header, records, trailer.
    ///
    /// Bytes after the end-of-file record are ignored.
    pub fn parse(bytes: &[u8]) -> Result<Self, DecodeError> {
        let header = HeaderFields::parse(bytes)?;

        let body = &bytes[HEADER_LEN..];
        let mut records = Vec::with_capacity(body.len() / RECORD_LEN);
        let mut terminated = false;

        for (index, chunk) in body.chunks(RECORD_LEN).enumerate() {
            let chunk: [u8; RECORD_LEN] =
                chunk
                    .try_into()
                    .map_err(|_| DecodeError::MalformedRecord {
                        offset: HEADER_LEN + index * RECORD_LEN,
                    })?;
            let record = MotionRecord(chunk);
            if record.kind() == RecordKind::EndOfFile {
                terminated = true;
                break;
            }
            records.push(record);
        }

        if !terminated {
            return Err(DecodeError::MissingTrailer);
        }

        Ok(Self { header, records })
    }

    /// Per-record deltas, in order.
    pub fn deltas(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.records.iter().map(|&r| decode_delta(r))
    }

    /// Absolute positions reached after each record, starting from the origin.
    pub fn stitch_positions(&self) -> Vec<(i32, i32)> {
        self.deltas()
            .scan((0, 0), |pos, (dx, dy)| {
                pos.0 += dx;
                pos.1 += dy;
                Some(*pos)
            })
            .collect()
    }

    /// Number of records that are not normal stitches.
    pub fn non_stitch_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.kind() != RecordKind::Stitch)
            .count()
    }
}
