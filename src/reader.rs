//! Abstractions over raster band I/O.
//!
//! The chunking and combination code never touches file
//! formats directly; it consumes the [`ChunkReader`] and
//! [`ChunkWriter`] traits. GDAL-backed implementations are
//! provided with the `gdal` feature; tests use in-memory
//! implementations.
//!
//! Band values are surfaced as `f64` regardless of the
//! storage type, matching how GDAL converts on read.

use crate::chunking::ChunkDescriptor;
use crate::geometry::{GeoTransform, RasterDims, RasterOffset};
use crate::Result;
use ndarray::Array2;

/// Read access to a single raster band.
pub trait ChunkReader {
    /// Pixel dimensions of the band.
    fn size(&self) -> Result<RasterDims>;

    /// Native block size of the band.
    fn block_size(&self) -> Result<RasterDims>;

    /// Geotransform of the owning raster; the identity
    /// transform when it carries no georeferencing.
    fn geo_transform(&self) -> Result<GeoTransform>;

    /// Read a window of data into a caller-provided slice
    /// of length `size.0 * size.1`, row-major.
    fn read_into_slice(&self, out: &mut [f64], off: RasterOffset, size: RasterDims)
        -> Result<()>;

    /// Helper to read a window into an ndarray.
    fn read_window(&self, off: RasterOffset, size: RasterDims) -> Result<Array2<f64>> {
        let mut buf = vec![0.; size.0 * size.1];
        self.read_into_slice(&mut buf[..], off, size)?;
        Ok(Array2::from_shape_vec((size.1, size.0), buf)?)
    }

    /// Helper to read the window of a [`ChunkDescriptor`].
    fn read_chunk(&self, chunk: &ChunkDescriptor) -> Result<Array2<f64>> {
        self.read_window(chunk.offset, chunk.size)
    }
}

/// Write access to a single raster band. Object safe: the
/// combination engine takes `Option<&mut dyn ChunkWriter>`.
pub trait ChunkWriter {
    /// Write a window of data; `data` is row-major with
    /// shape `(height, width)`.
    fn write_window(&mut self, off: RasterOffset, data: &Array2<f64>) -> Result<()>;
}

#[cfg(feature = "gdal")]
mod gdal_impl {
    use super::*;
    use crate::geometry::IDENTITY_TRANSFORM;
    use anyhow::{format_err, Context};
    use gdal::raster::Buffer;
    use gdal::Dataset;

    /// A `ChunkReader` over a band of an open dataset.
    /// `Send`, but not `Sync`: obtains a `RasterBand`
    /// handle for each read.
    pub struct DatasetReader(pub Dataset, pub isize);

    impl ChunkReader for DatasetReader {
        fn size(&self) -> Result<RasterDims> {
            Ok(self.0.raster_size())
        }

        fn block_size(&self) -> Result<RasterDims> {
            Ok(self.0.rasterband(self.1)?.block_size())
        }

        fn geo_transform(&self) -> Result<GeoTransform> {
            Ok(self.0.geo_transform().unwrap_or(IDENTITY_TRANSFORM))
        }

        fn read_into_slice(
            &self,
            out: &mut [f64],
            off: RasterOffset,
            size: RasterDims,
        ) -> Result<()> {
            let band = self.0.rasterband(self.1)?;
            Ok(band
                .read_into_slice(off, size, size, out, None)
                .with_context(|| {
                    format_err!(
                        "reading window @ ({},{}) of dimension ({}x{})",
                        off.0,
                        off.1,
                        size.0,
                        size.1
                    )
                })?)
        }
    }

    /// A `ChunkReader` that is both `Send` and `Sync`.
    /// Opens the dataset for each read. `P` may be set to
    /// [`Path`][std::path::Path] or a `PathBuf`.
    pub struct RasterPathReader<'a, P: ?Sized>(pub &'a P, pub isize);

    use std::path::Path;
    impl<'a, P> ChunkReader for RasterPathReader<'a, P>
    where
        P: AsRef<Path> + ?Sized,
    {
        fn size(&self) -> Result<RasterDims> {
            Ok(Dataset::open(self.0.as_ref())?.raster_size())
        }

        fn block_size(&self) -> Result<RasterDims> {
            DatasetReader(Dataset::open(self.0.as_ref())?, self.1).block_size()
        }

        fn geo_transform(&self) -> Result<GeoTransform> {
            DatasetReader(Dataset::open(self.0.as_ref())?, self.1).geo_transform()
        }

        fn read_into_slice(
            &self,
            out: &mut [f64],
            off: RasterOffset,
            size: RasterDims,
        ) -> Result<()> {
            DatasetReader(Dataset::open(self.0.as_ref())?, self.1)
                .read_into_slice(out, off, size)
        }
    }

    /// A `ChunkWriter` over a band of an open (updatable)
    /// dataset.
    pub struct DatasetWriter(pub Dataset, pub isize);

    impl ChunkWriter for DatasetWriter {
        fn write_window(&mut self, off: RasterOffset, data: &Array2<f64>) -> Result<()> {
            let mut band = self.0.rasterband(self.1)?;
            let (rows, cols) = data.dim();
            band.write(
                off,
                (cols, rows),
                &Buffer::new((cols, rows), data.iter().cloned().collect()),
            )
            .with_context(|| {
                format_err!(
                    "writing window @ ({},{}) of dimension ({}x{})",
                    off.0,
                    off.1,
                    cols,
                    rows
                )
            })?;
            Ok(())
        }
    }
}

#[cfg(feature = "gdal")]
pub use gdal_impl::{DatasetReader, DatasetWriter, RasterPathReader};
