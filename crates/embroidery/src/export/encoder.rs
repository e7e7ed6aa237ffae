//! DST encoder: turns a stitch path into a complete file buffer.

use embroidery_config::EncoderConfig;
use tracing::{debug, error, trace};

use crate::bounds::bounding_box;
use crate::codec::encode_delta;
use crate::constants::{END_OF_FILE, HEADER_LEN, RECORD_LEN};
use crate::convert::convert;
use crate::split::split_with_max_step;
use crate::types::{HeaderFields, MotionRecord, Point};
use crate::validation::{stitch_delta, validate_finite, validate_range, EncodeError};

/// Progress of a single encode call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EncodeStage {
    #[default]
    Idle,
    Converting,
    Splitting,
    BoundingBox,
    WritingHeader,
    WritingRecords,
    WritingTrailer,
    Done,
    Failed,
}

/// What went into a generated file
#[derive(Debug, Clone)]
pub struct EncodeSummary {
    pub header: HeaderFields,
    /// Points after splitting (equals the number of motion records)
    pub path_len: usize,
    /// Points inserted by the splitter
    pub inserted: usize,
}

/// A generated DST file
#[derive(Debug, Clone)]
pub struct EncodedDesign {
    pub bytes: Vec<u8>,
    pub summary: EncodeSummary,
}

/// Encoder for Tajima DST files.
///
/// Each call runs the full pipeline on its own copy of the input:
/// 1. Scale points into device units
/// 2. Split steps longer than the configured maximum
/// 3. Compute the bounding box and header
/// 4. Emit one motion record per point, then the end-of-file record
///
/// The config is validated at the start of every call, and converted
/// coordinates beyond [`MAX_COORDINATE`](crate::constants::MAX_COORDINATE)
/// are rejected.
///
/// Paths with fewer than two points produce no file. On any error the partial
/// buffer is dropped. The working path is cleared after every call, so one
/// encoder can be reused.
///
/// # Example
///
/// ```ignore
/// let mut encoder = DstEncoder::new(EncoderConfig::default());
/// if let Some(bytes) = encoder.encode(&points, "rose")? {
///     std::fs::write("rose.dst", bytes)?;
/// }
/// ```
#[derive(Debug, Default)]
pub struct DstEncoder {
    config: EncoderConfig,
    /// Working copy of the path being encoded
    stitches: Vec<Point>,
    /// Stage reached by the most recent call
    stage: EncodeStage,
}

impl DstEncoder {
    /// Create an encoder with the given settings.
    pub fn new(config: EncoderConfig) -> Self {
        Self {
            config,
            stitches: Vec::new(),
            stage: EncodeStage::Idle,
        }
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Stage reached by the last call: `Done`, `Failed`, or `Idle` when the
    /// input was too short to encode.
    pub fn stage(&self) -> EncodeStage {
        self.stage
    }

    /// Points held in the working path (always 0 between calls).
    pub fn working_len(&self) -> usize {
        self.stitches.len()
    }

    /// Encode `points` into DST bytes.
    ///
    /// Returns `Ok(None)` when fewer than two points are given.
    pub fn encode(&mut self, points: &[Point], label: &str) -> Result<Option<Vec<u8>>, EncodeError> {
        Ok(self
            .encode_with_summary(points, label)?
            .map(|design| design.bytes))
    }

    /// Like [`DstEncoder::encode`], also returning the header values used.
    pub fn encode_with_summary(
        &mut self,
        points: &[Point],
        label: &str,
    ) -> Result<Option<EncodedDesign>, EncodeError> {
        self.stage = EncodeStage::Idle;

        if points.len() < 2 {
            debug!("DstEncoder: {} point(s), nothing to encode", points.len());
            return Ok(None);
        }

        let result = self.run(points, label);
        self.finish(result).map(Some)
    }

    /// Record the outcome of a call and drop the working path.
    fn finish(&mut self, result: Result<EncodedDesign, EncodeError>) -> Result<EncodedDesign, EncodeError> {
        self.stitches.clear();

        match result {
            Ok(design) => {
                self.stage = EncodeStage::Done;
                debug!(
                    "DstEncoder: wrote {} bytes ({} records)",
                    design.bytes.len(),
                    design.summary.path_len
                );
                Ok(design)
            }
            Err(err) => {
                error!("DstEncoder: failed during {:?}: {}", self.stage, err);
                self.stage = EncodeStage::Failed;
                Err(err)
            }
        }
    }

    fn run(&mut self, points: &[Point], label: &str) -> Result<EncodedDesign, EncodeError> {
        self.stage = EncodeStage::Converting;
        self.config.validate()?;
        validate_finite(points)?;
        let converted = convert(points, self.config.scale_x, self.config.scale_y);
        validate_finite(&converted)?;
        validate_range(&converted)?;

        self.stage = EncodeStage::Splitting;
        self.stitches = split_with_max_step(&converted, self.config.max_step);
        let inserted = self.stitches.len() - converted.len();
        debug!(
            "DstEncoder: {} points, {} after splitting",
            converted.len(),
            self.stitches.len()
        );

        self.write_design(label, inserted)
    }

    /// Header, records and trailer for the current working path.
    fn write_design(&mut self, label: &str, inserted: usize) -> Result<EncodedDesign, EncodeError> {
        self.stage = EncodeStage::BoundingBox;
        let bounds = bounding_box(&self.stitches)?;

        self.stage = EncodeStage::WritingHeader;
        let header = HeaderFields::from_path(&self.stitches, &bounds, label)?;
        let header_bytes = header.to_bytes()?;

        let mut bytes = Vec::with_capacity(HEADER_LEN + (self.stitches.len() + 1) * RECORD_LEN);
        bytes.extend_from_slice(&header_bytes);

        self.stage = EncodeStage::WritingRecords;
        let records = encode_records(&self.stitches)?;
        bytes.extend_from_slice(bytemuck::cast_slice(records.as_slice()));

        self.stage = EncodeStage::WritingTrailer;
        bytes.extend_from_slice(&END_OF_FILE);

        Ok(EncodedDesign {
            bytes,
            summary: EncodeSummary {
                header,
                path_len: self.stitches.len(),
                inserted,
            },
        })
    }
}

/// Motion records for a split path: a zero move for the first point, then one
/// record per step.
pub fn encode_records(path: &[Point]) -> Result<Vec<MotionRecord>, EncodeError> {
    if path.is_empty() {
        return Ok(Vec::new());
    }

    let mut records = Vec::with_capacity(path.len());
    records.push(MotionRecord::ORIGIN);

    for pair in path.windows(2) {
        let (dx, dy) = stitch_delta(pair[0], pair[1]);
        trace!("step ({}, {})", dx, dy);
        records.push(encode_delta(dx, dy)?);
    }

    Ok(records)
}

/// Encode with default settings (points already in device units).
pub fn encode_dst(points: &[Point], label: &str) -> Result<Option<Vec<u8>>, EncodeError> {
    DstEncoder::default().encode(points, label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::DstFile;
    use crate::constants::MAX_STITCH_STEP;
    use embroidery_config::ConfigError;

    fn square(side: f64) -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(side, 0.0),
            Point::new(side, side),
            Point::new(0.0, side),
            Point::new(0.0, 0.0),
        ]
    }

    #[test]
    fn test_degenerate_input_produces_nothing() {
        let mut encoder = DstEncoder::default();
        assert!(encoder.encode(&[], "empty").unwrap().is_none());
        assert!(encoder.encode(&[Point::new(5.0, 5.0)], "one").unwrap().is_none());
        assert_eq!(encoder.stage(), EncodeStage::Idle);
    }

    #[test]
    fn test_simple_file_length() {
        let points = [Point::new(1.0, 1.0), Point::new(2.0, 2.0)];
        let bytes = encode_dst(&points, "simple").unwrap().unwrap();
        assert_eq!(bytes.len(), 512 + 2 * 3 + 3);
    }

    #[test]
    fn test_long_line_file_length() {
        let points = [Point::new(0.0, 0.0), Point::new(500.0, 0.0)];
        let bytes = encode_dst(&points, "line").unwrap().unwrap();
        assert_eq!(bytes.len(), 533);
    }

    #[test]
    fn test_square_header_and_length() {
        let mut encoder = DstEncoder::default();
        let design = encoder
            .encode_with_summary(&square(500.0), "square")
            .unwrap()
            .unwrap();

        assert_eq!(design.summary.path_len, 21);
        assert_eq!(design.summary.inserted, 16);
        assert_eq!(design.bytes.len(), 512 + 21 * 3 + 3);

        let header = &design.summary.header;
        assert_eq!((header.min_x, header.max_x), (0, 500));
        assert_eq!((header.min_y, header.max_y), (0, 500));
        assert_eq!((header.ax, header.ay), (0, 0));
        assert_eq!(header.stitch_count, 21);
    }

    #[test]
    fn test_triangle_file_length() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(500.0, 0.0),
            Point::new(250.0, 500.0),
            Point::new(0.0, 0.0),
        ];
        let bytes = encode_dst(&points, "triangle").unwrap().unwrap();
        assert_eq!(bytes.len(), 512 + 16 * 3 + 3);
    }

    #[test]
    fn test_layout_first_record_and_trailer() {
        let bytes = encode_dst(&square(250.0), "layout").unwrap().unwrap();

        assert_eq!(&bytes[512..515], &[0x00, 0x00, 0x03]);
        assert_eq!(&bytes[bytes.len() - 3..], &[0x00, 0x00, 0xF3]);
        assert_eq!((bytes.len() - 512 - 3) % 3, 0);
    }

    #[test]
    fn test_records_decode_to_truncated_steps() {
        let points = [Point::new(0.0, 0.0), Point::new(40.0, -7.0), Point::new(-81.0, 113.0)];
        let bytes = encode_dst(&points, "steps").unwrap().unwrap();
        let file = DstFile::parse(&bytes).unwrap();
        assert_eq!(
            file.stitch_positions(),
            vec![(0, 0), (40, -7), (-81, 113)]
        );
    }

    #[test]
    fn test_scale_applied_before_splitting() {
        let config = EncoderConfig {
            scale_x: 10.0,
            scale_y: 10.0,
            ..Default::default()
        };
        let mut encoder = DstEncoder::new(config);
        let design = encoder
            .encode_with_summary(&[Point::new(0.0, 0.0), Point::new(50.0, 0.0)], "scaled")
            .unwrap()
            .unwrap();
        assert_eq!(design.summary.header.max_x, 500);
        assert_eq!(design.summary.path_len, 6);
    }

    #[test]
    fn test_non_finite_rejected() {
        let mut encoder = DstEncoder::default();
        let points = [Point::new(0.0, 0.0), Point::new(f64::NAN, 1.0)];
        assert!(matches!(
            encoder.encode(&points, "nan"),
            Err(EncodeError::NonFiniteCoordinate { index: 1, .. })
        ));
        assert_eq!(encoder.stage(), EncodeStage::Failed);
        assert_eq!(encoder.working_len(), 0);
    }

    #[test]
    fn test_encoder_reusable_after_failure() {
        let mut encoder = DstEncoder::default();
        let bad = [Point::new(0.0, 0.0), Point::new(f64::INFINITY, 0.0)];
        assert!(encoder.encode(&bad, "bad").is_err());

        let good = [Point::new(0.0, 0.0), Point::new(10.0, 10.0)];
        let bytes = encoder.encode(&good, "good").unwrap().unwrap();
        assert_eq!(bytes.len(), 521);
        assert_eq!(encoder.stage(), EncodeStage::Done);
        assert_eq!(encoder.working_len(), 0);
    }

    #[test]
    fn test_records_fail_on_oversized_step() {
        let path = [Point::new(0.0, 0.0), Point::new(MAX_STITCH_STEP as f64 + 1.0, 0.0)];
        assert!(matches!(
            encode_records(&path),
            Err(EncodeError::NonZeroRemainder { .. })
        ));
    }

    #[test]
    fn test_oversized_max_step_rejected() {
        let config = EncoderConfig {
            max_step: 200,
            ..Default::default()
        };
        let mut encoder = DstEncoder::new(config);
        let points = [Point::new(0.0, 0.0), Point::new(180.0, 0.0)];
        assert!(matches!(
            encoder.encode(&points, "x"),
            Err(EncodeError::Config(ConfigError::InvalidMaxStep(200)))
        ));
        assert_eq!(encoder.stage(), EncodeStage::Failed);
        assert_eq!(encoder.working_len(), 0);
    }

    #[test]
    fn test_out_of_range_coordinates_rejected() {
        let mut encoder = DstEncoder::default();
        let points = [Point::new(0.0, 0.0), Point::new(3.0e9, -3.0e9)];
        assert!(matches!(
            encoder.encode(&points, "huge"),
            Err(EncodeError::CoordinateOutOfRange { index: 1, .. })
        ));
        assert_eq!(encoder.stage(), EncodeStage::Failed);

        // In range before scaling, out of range after
        let mut encoder = DstEncoder::new(EncoderConfig::with_scale(1000.0));
        let points = [Point::new(0.0, 0.0), Point::new(5000.0, 0.0)];
        assert!(matches!(
            encoder.encode(&points, "scaled"),
            Err(EncodeError::CoordinateOutOfRange { index: 1, .. })
        ));
    }

    #[test]
    fn test_record_failure_discards_output() {
        let mut encoder = DstEncoder::default();
        encoder.stitches = vec![Point::new(0.0, 0.0), Point::new(200.0, 0.0)];

        let result = encoder.write_design("oversized", 0);
        assert_eq!(encoder.stage(), EncodeStage::WritingRecords);

        let result = encoder.finish(result);
        assert!(matches!(
            result,
            Err(EncodeError::NonZeroRemainder { delta: 200, .. })
        ));
        assert_eq!(encoder.stage(), EncodeStage::Failed);
        assert_eq!(encoder.working_len(), 0);

        let good = [Point::new(0.0, 0.0), Point::new(10.0, 10.0)];
        assert_eq!(encoder.encode(&good, "good").unwrap().unwrap().len(), 521);
    }

    #[test]
    fn test_input_not_mutated() {
        let points = square(500.0);
        let copy = points.clone();
        encode_dst(&points, "copy").unwrap();
        assert_eq!(points, copy);
    }
}
