//! Tajima DST embroidery encoder
//!
//! This crate turns a path of stitch points into a DST machine file:
//! - [`convert`] - Scaling caller coordinates into device units (0.1 mm)
//! - [`split`] - Breaking up steps longer than a record can carry
//! - [`bounds`] - Bounding box of the final path
//! - [`codec`] - Motion record packing, the 512-byte header, and a reader
//! - [`export`] - [`DstEncoder`], which runs the whole pipeline
//! - [`validation`] - Error types and input checks

pub mod bounds;
pub mod codec;
pub mod constants;
pub mod convert;
pub mod export;
pub mod split;
pub mod types;
pub mod validation;

pub use bounds::*;
pub use codec::*;
pub use constants::*;
pub use convert::*;
pub use export::*;
pub use split::*;
pub use types::*;
pub use validation::*;

pub use embroidery_config::EncoderConfig;
