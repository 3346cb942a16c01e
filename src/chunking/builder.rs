use crate::geometry::{PixelTransform, RasterDims};
use crate::{CombineError, Result};

use super::{div_ceil, ChunkPlan};

/// Constructors
impl ChunkPlan {
    /// Construct a `ChunkPlan` from raster dimensions and
    /// the native block size. Fails with
    /// [`CombineError::InvalidArgument`] when any dimension
    /// is zero.
    pub fn new(dims: RasterDims, block: RasterDims) -> Result<Self> {
        if dims.0 < 1 || dims.1 < 1 {
            return Err(CombineError::InvalidArgument(format!(
                "raster dimensions must be positive: {}x{}",
                dims.0, dims.1
            ))
            .into());
        }
        if block.0 < 1 || block.1 < 1 {
            return Err(CombineError::InvalidArgument(format!(
                "block dimensions must be positive: {}x{}",
                block.0, block.1
            ))
            .into());
        }
        Ok(ChunkPlan {
            width: dims.0,
            height: dims.1,

            block_width: block.0,
            block_height: block.1,
            max_pixels: 0,

            transform: PixelTransform::identity(),
        })
    }

    /// Construct a `ChunkPlan` from a raster dataset,
    /// reading the dimensions, the block size of the given
    /// band, and the geotransform from it.
    #[cfg(feature = "gdal")]
    pub fn for_dataset(ds: &gdal::Dataset, band: isize) -> Result<Self> {
        use crate::geometry::transform_from_dataset;
        use anyhow::Context;

        let block = ds
            .rasterband(band)
            .with_context(|| format!("unable to open rasterband {}", band))?
            .block_size();
        Ok(ChunkPlan::new(ds.raster_size(), block)?
            .with_transform(transform_from_dataset(ds)))
    }
}

/// Builder methods to configure the parameters
impl ChunkPlan {
    /// Set the pixel budget per chunk. Zero (the default)
    /// yields one chunk per native block.
    pub fn with_max_pixels(mut self, max_pixels: u64) -> Self {
        self.max_pixels = max_pixels;
        self
    }

    /// Set the pixel-to-geo transform used for chunk
    /// bounding boxes.
    pub fn with_transform(mut self, transform: PixelTransform) -> Self {
        self.transform = transform;
        self
    }
}

/// Getter methods to read the parameters of the plan
impl ChunkPlan {
    pub fn width(&self) -> usize {
        self.width
    }
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn block_size(&self) -> RasterDims {
        (self.block_width, self.block_height)
    }
    pub fn max_pixels(&self) -> u64 {
        self.max_pixels
    }
    pub fn transform(&self) -> &PixelTransform {
        &self.transform
    }

    /// Dimensions of the block grid: the number of native
    /// blocks along each axis.
    pub fn block_grid(&self) -> (usize, usize) {
        (
            div_ceil(self.width, self.block_width),
            div_ceil(self.height, self.block_height),
        )
    }
}
