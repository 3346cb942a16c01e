//! Process co-registered rasters in block-aligned chunks,
//! and tabulate the unique combinations of their values.
//!
//! The crate has two core pieces:
//!
//! - [`chunking`]: partition a raster's pixel grid into
//!   block-aligned, size-bounded chunks with geospatial
//!   bounding boxes.
//!
//! - [`combine`]: stream any number of co-registered
//!   integer-valued bands in lock-step and assign a stable
//!   sequential id to each distinct tuple of values, with
//!   per-combination pixel counts.
//!
//! Raster I/O is abstracted behind the [`reader`] traits;
//! GDAL-backed implementations are available with the
//! default `gdal` feature.

pub mod chunking;
pub mod combine;
pub mod geometry;
pub mod reader;

pub mod prelude;

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

use std::fmt;

/// Validation failures raised before any raster I/O is
/// attempted. Carried inside [`Error`]; callers that need
/// to tell a configuration mistake from a storage failure
/// can downcast to this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CombineError {
    /// Malformed chunking parameters: a raster or block
    /// dimension was zero.
    InvalidArgument(String),
    /// Input layers disagree on dimensions or geotransform.
    LayerMismatch(String),
}

impl fmt::Display for CombineError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CombineError::InvalidArgument(msg) => write!(f, "invalid argument: {}", msg),
            CombineError::LayerMismatch(msg) => write!(f, "layer mismatch: {}", msg),
        }
    }
}

impl std::error::Error for CombineError {}
