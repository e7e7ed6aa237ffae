//! Writing encoded designs to storage

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::types::Point;
use crate::validation::{sanitize_label, EncodeError};

use super::encoder::DstEncoder;

/// File name used when a label has no usable characters
const FALLBACK_STEM: &str = "design";

impl DstEncoder {
    /// Encode and write the whole file to `writer`.
    ///
    /// Nothing is written unless encoding succeeds. Returns the number of
    /// bytes written, or `None` for input with fewer than two points.
    pub fn encode_to_writer<W: Write>(
        &mut self,
        writer: &mut W,
        points: &[Point],
        label: &str,
    ) -> Result<Option<usize>, EncodeError> {
        let Some(bytes) = self.encode(points, label)? else {
            return Ok(None);
        };
        writer.write_all(&bytes)?;
        writer.flush()?;
        Ok(Some(bytes.len()))
    }

    /// Encode and write `<output_dir>/<label>.dst`.
    ///
    /// The file is written under a temporary name and renamed into place, so
    /// a failed export never leaves a truncated `.dst` behind.
    pub fn export_file(
        &mut self,
        points: &[Point],
        label: &str,
    ) -> Result<Option<PathBuf>, EncodeError> {
        let Some(bytes) = self.encode(points, label)? else {
            return Ok(None);
        };

        let path = dst_path(&self.config().output_dir, label);
        let tmp_path = path.with_extension("dst.tmp");
        debug!("Writing {} bytes to {}", bytes.len(), tmp_path.display());

        if let Err(err) = fs::write(&tmp_path, &bytes).and_then(|_| fs::rename(&tmp_path, &path)) {
            // Remove the partial temp file
            let _ = fs::remove_file(&tmp_path);
            return Err(err.into());
        }

        info!("Exported {}", path.display());
        Ok(Some(path))
    }
}

/// Output path for a label: printable label characters, path separators and
/// other unsafe characters replaced by `_`.
pub fn dst_path(dir: &Path, label: &str) -> PathBuf {
    let stem: String = sanitize_label(label)
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    let stem = if stem.trim_matches('_').is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        stem
    };
    dir.join(format!("{}.dst", stem))
}
