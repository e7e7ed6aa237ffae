//! The 512-byte DST header
//!
//! Eleven tagged fields, each rendered as `TAG:value` left-justified in a fixed
//! width, then `\n` and `0x1A`. Spaces inside a rendered field become NUL
//! bytes. The block is then filled with plain spaces up to 512 bytes.

use tracing::debug;

use crate::constants::{
    COLOR_CHANGES, FIELD_TERMINATOR, HEADER_FILL, HEADER_LEN, LABEL_WIDTH, PD_PLACEHOLDER,
};
use crate::types::{BoundingBox, HeaderFields, Point};
use crate::validation::{sanitize_label, DecodeError, EncodeError};

/// Field tags in file order
const TAGS: [&str; 11] = ["LA", "ST", "CO", "+X", "-X", "+Y", "-Y", "AX", "AY", "MX", "MY"];

const PD_TAG: &str = "PD";

impl HeaderFields {
    /// Gather header values for a final (already split) stitch path.
    ///
    /// Extents and the first-to-last offset are truncated toward zero.
    pub fn from_path(
        path: &[Point],
        bounds: &BoundingBox,
        label: &str,
    ) -> Result<Self, EncodeError> {
        let (first, last) = match (path.first(), path.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => {
                return Err(EncodeError::InvalidInput {
                    reason: "header of an empty path",
                });
            }
        };

        Ok(Self {
            label: sanitize_label(label),
            stitch_count: path.len(),
            color_changes: COLOR_CHANGES,
            max_x: bounds.max_x as i32,
            min_x: bounds.min_x as i32,
            max_y: bounds.max_y as i32,
            min_y: bounds.min_y as i32,
            ax: (last.x - first.x) as i32,
            ay: (last.y - first.y) as i32,
            mx: 0,
            my: 0,
            pd: PD_PLACEHOLDER.to_string(),
        })
    }

    /// Render the tagged fields, without the trailing fill.
    pub fn render_fields(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_LEN);
        push_field(&mut out, "LA", &self.label, LABEL_WIDTH);
        push_field(&mut out, "ST", &self.stitch_count, 6);
        push_field(&mut out, "CO", &self.color_changes, 2);
        push_field(&mut out, "+X", &self.max_x, 4);
        push_field(&mut out, "-X", &self.min_x, 4);
        push_field(&mut out, "+Y", &self.max_y, 4);
        push_field(&mut out, "-Y", &self.min_y, 4);
        push_field(&mut out, "AX", &self.ax, 5);
        push_field(&mut out, "AY", &self.ay, 5);
        push_field(&mut out, "MX", &self.mx, 5);
        push_field(&mut out, "MY", &self.my, 5);
        push_field(&mut out, PD_TAG, &self.pd, 5);
        out
    }

    /// Render the full 512-byte header block.
    pub fn to_bytes(&self) -> Result<[u8; HEADER_LEN], EncodeError> {
        let fields = self.render_fields();
        if fields.len() > HEADER_LEN {
            return Err(EncodeError::HeaderOverflow { len: fields.len() });
        }

        let mut header = [HEADER_FILL; HEADER_LEN];
        header[..fields.len()].copy_from_slice(&fields);
        Ok(header)
    }

    /// Parse a header block written by [`HeaderFields::to_bytes`] or any
    /// other DST producer using the same field layout.
    pub fn parse(header: &[u8]) -> Result<Self, DecodeError> {
        if header.len() < HEADER_LEN {
            return Err(DecodeError::TooShort { len: header.len() });
        }

        let mut values: Vec<(String, String)> = Vec::with_capacity(12);
        let mut rest = &header[..HEADER_LEN];
        while values.len() < 12 {
            let end = rest
                .windows(2)
                .position(|w| w == [b'\n', FIELD_TERMINATOR])
                .ok_or_else(|| DecodeError::MalformedHeader {
                    reason: format!("field {} is not terminated", values.len() + 1),
                })?;
            let field = &rest[..end];
            rest = &rest[end + 2..];

            let text = std::str::from_utf8(field).map_err(|_| DecodeError::MalformedHeader {
                reason: format!("field {} is not ASCII", values.len() + 1),
            })?;
            let (tag, value) = text.split_once(':').ok_or_else(|| DecodeError::MalformedHeader {
                reason: format!("field {:?} has no tag", text),
            })?;
            // Padding NULs trail the value; interior ones stood for spaces
            let value = value.trim_end_matches('\0').replace('\0', " ");
            values.push((tag.to_string(), value));
        }

        let mut fields = values.into_iter();
        let mut next = |expected: &str| -> Result<String, DecodeError> {
            match fields.next() {
                Some((tag, value)) if tag == expected => Ok(value),
                Some((tag, _)) => Err(DecodeError::MalformedHeader {
                    reason: format!("expected tag {}, found {}", expected, tag),
                }),
                None => Err(DecodeError::MalformedHeader {
                    reason: format!("missing tag {}", expected),
                }),
            }
        };

        let label = next(TAGS[0])?;
        let stitch_count = parse_number(TAGS[1], &next(TAGS[1])?)?;
        let color_changes = parse_number(TAGS[2], &next(TAGS[2])?)?;
        let max_x = parse_number(TAGS[3], &next(TAGS[3])?)?;
        let min_x = parse_number(TAGS[4], &next(TAGS[4])?)?;
        let max_y = parse_number(TAGS[5], &next(TAGS[5])?)?;
        let min_y = parse_number(TAGS[6], &next(TAGS[6])?)?;
        let ax = parse_number(TAGS[7], &next(TAGS[7])?)?;
        let ay = parse_number(TAGS[8], &next(TAGS[8])?)?;
        let mx = parse_number(TAGS[9], &next(TAGS[9])?)?;
        let my = parse_number(TAGS[10], &next(TAGS[10])?)?;
        let pd = next(PD_TAG)?;

        Ok(Self {
            label,
            stitch_count,
            color_changes,
            max_x,
            min_x,
            max_y,
            min_y,
            ax,
            ay,
            mx,
            my,
            pd,
        })
    }
}

/// Build the header for a final stitch path.
pub fn encode_header(
    path: &[Point],
    bounds: &BoundingBox,
    label: &str,
) -> Result<[u8; HEADER_LEN], EncodeError> {
    let fields = HeaderFields::from_path(path, bounds, label)?;
    debug!(
        "Header: {} stitches, X {}..{}, Y {}..{}, offset ({}, {})",
        fields.stitch_count,
        fields.min_x,
        fields.max_x,
        fields.min_y,
        fields.max_y,
        fields.ax,
        fields.ay
    );
    fields.to_bytes()
}

/// Parse the header fields out of the first 512 bytes of a DST file.
pub fn parse_header(bytes: &[u8]) -> Result<HeaderFields, DecodeError> {
    HeaderFields::parse(bytes)
}

fn push_field(out: &mut Vec<u8>, tag: &str, value: &dyn std::fmt::Display, width: usize) {
    let rendered = format!("{}:{:<width$}\n", tag, value, width = width);
    out.extend(rendered.bytes().map(|b| if b == b' ' { 0 } else { b }));
    out.push(FIELD_TERMINATOR);
}

fn parse_number<T: std::str::FromStr>(tag: &str, value: &str) -> Result<T, DecodeError> {
    value
        .trim()
        .parse()
        .map_err(|_| DecodeError::MalformedHeader {
            reason: format!("{} value {:?} is not a number", tag, value),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(500.0, 0.0),
            Point::new(500.0, 500.0),
            Point::new(0.0, 500.0),
            Point::new(0.0, 0.0),
        ]
    }

    fn bounds_of(points: &[Point]) -> BoundingBox {
        crate::bounds::bounding_box(points).unwrap()
    }

    #[test]
    fn test_render_field_layout() {
        let mut out = Vec::new();
        push_field(&mut out, "ST", &6, 6);
        assert_eq!(out, b"ST:6\0\0\0\0\0\n\x1A");

        let mut out = Vec::new();
        push_field(&mut out, "AX", &-25, 5);
        assert_eq!(out, b"AX:-25\0\0\n\x1A");
    }

    #[test]
    fn test_header_exact_bytes() {
        let points = [Point::new(1.0, 1.0), Point::new(2.0, 2.0)];
        let header = encode_header(&points, &bounds_of(&points), "testProject").unwrap();

        let mut expected = Vec::new();
        expected.extend_from_slice(b"LA:testProject\0\0\0\0\n\x1A");
        expected.extend_from_slice(b"ST:2\0\0\0\0\0\n\x1A");
        expected.extend_from_slice(b"CO:1\0\n\x1A");
        expected.extend_from_slice(b"+X:2\0\0\0\n\x1A");
        expected.extend_from_slice(b"-X:1\0\0\0\n\x1A");
        expected.extend_from_slice(b"+Y:2\0\0\0\n\x1A");
        expected.extend_from_slice(b"-Y:1\0\0\0\n\x1A");
        expected.extend_from_slice(b"AX:1\0\0\0\0\n\x1A");
        expected.extend_from_slice(b"AY:1\0\0\0\0\n\x1A");
        expected.extend_from_slice(b"MX:0\0\0\0\0\n\x1A");
        expected.extend_from_slice(b"MY:0\0\0\0\0\n\x1A");
        expected.extend_from_slice(b"PD:*****\n\x1A");

        assert_eq!(&header[..expected.len()], expected.as_slice());
        assert!(header[expected.len()..].iter().all(|&b| b == b' '));
        assert_eq!(header.len(), HEADER_LEN);
    }

    #[test]
    fn test_header_square_fields() {
        let points = square();
        let fields = HeaderFields::from_path(&points, &bounds_of(&points), "square").unwrap();
        assert_eq!(fields.max_x, 500);
        assert_eq!(fields.min_x, 0);
        assert_eq!(fields.max_y, 500);
        assert_eq!(fields.min_y, 0);
        assert_eq!(fields.ax, 0);
        assert_eq!(fields.ay, 0);
        assert_eq!(fields.color_changes, 1);
        assert_eq!(fields.pd, "*****");
    }

    #[test]
    fn test_header_round_trip() {
        let points = [
            Point::new(-40.7, 12.0),
            Point::new(300.2, -90.9),
            Point::new(15.0, 250.5),
        ];
        let fields = HeaderFields::from_path(&points, &bounds_of(&points), "my design").unwrap();
        let bytes = fields.to_bytes().unwrap();
        let parsed = parse_header(&bytes).unwrap();

        assert_eq!(parsed, fields);
        assert_eq!(parsed.label, "my design");
        assert_eq!(parsed.min_x, -40);
        assert_eq!(parsed.max_x, 300);
        assert_eq!(parsed.min_y, -90);
        assert_eq!(parsed.max_y, 250);
        assert_eq!(parsed.ax, 55);
        assert_eq!(parsed.ay, 238);
    }

    #[test]
    fn test_header_long_label_truncated() {
        let points = square();
        let bytes = encode_header(&points, &bounds_of(&points), "a label that is far too long").unwrap();
        let parsed = parse_header(&bytes).unwrap();
        assert_eq!(parsed.label, "a label that is");
    }

    #[test]
    fn test_header_empty_path() {
        let bounds = BoundingBox::from_point(Point::ZERO);
        assert!(matches!(
            encode_header(&[], &bounds, "x"),
            Err(EncodeError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_header_overflow() {
        let fields = HeaderFields {
            label: "x".repeat(600),
            stitch_count: 2,
            color_changes: 1,
            max_x: 0,
            min_x: 0,
            max_y: 0,
            min_y: 0,
            ax: 0,
            ay: 0,
            mx: 0,
            my: 0,
            pd: PD_PLACEHOLDER.to_string(),
        };
        assert!(matches!(
            fields.to_bytes(),
            Err(EncodeError::HeaderOverflow { .. })
        ));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            parse_header(&[b' '; 10]),
            Err(DecodeError::TooShort { len: 10 })
        ));
        assert!(matches!(
            parse_header(&[b' '; HEADER_LEN]),
            Err(DecodeError::MalformedHeader { .. })
        ));
    }
}
