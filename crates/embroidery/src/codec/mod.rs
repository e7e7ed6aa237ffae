//! DST wire format: motion records, header block, and a reader for both.

mod delta;
mod header;
mod reader;

pub use delta::{decode_delta, encode_delta};
pub use header::{encode_header, parse_header};
pub use reader::DstFile;
