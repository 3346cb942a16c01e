//! Partition rasters into block-aligned chunks.
//!
//! Large rasters are sub-divided internally into
//! rectangular blocks of a specific size. The individual
//! blocks support _random access_ while data within a block
//! may require reading the entire block (eg. if the blocks
//! are compressed). While the GDAL API supports reading an
//! arbitrary window of data, the underlying driver
//! implements this by reading all the necessary blocks and
//! copying the necessary data into the buffer. Thus, it is
//! more efficient to read along block boundaries.
//!
//! This module computes a traversal plan for a raster: an
//! ordered sequence of [`ChunkDescriptor`]s that exactly
//! tiles the pixel grid, places every chunk boundary on a
//! native block boundary, and bounds the pixel area of each
//! chunk by a configurable budget. The plan is a pure
//! function of its inputs; the same parameters always
//! produce the same sequence.

use serde_derive::Serialize;

use crate::geometry::{GeoBounds, PixelTransform, RasterDims, RasterOffset};

/// One element of a chunk traversal plan.
///
/// Chunks are emitted in row-major order: all chunks of the
/// first band of block-rows left to right, then the next,
/// and so on. The union of all chunk rectangles tiles the
/// raster exactly, and `offset` is always a multiple of the
/// native block size in both dimensions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChunkDescriptor {
    /// Position of this chunk within its row of chunks.
    pub chunk_x: usize,
    /// Index of the row of chunks this chunk belongs to.
    pub chunk_y: usize,
    /// Top-left pixel of the chunk in the full raster.
    pub offset: RasterOffset,
    /// Pixel dimensions; smaller than the nominal size at
    /// the right/bottom raster edges.
    pub size: RasterDims,
    /// Geospatial bounding box of the chunk.
    pub bounds: GeoBounds,
}

impl ChunkDescriptor {
    /// Pixel area of this chunk.
    #[inline]
    pub fn pixels(&self) -> u64 {
        self.size.0 as u64 * self.size.1 as u64
    }
}

/// Configuration for computing a chunk traversal plan.
/// Supports configuring the following parameters.
///
/// - `dims` - the dimensions of all the raster bands to be
/// processed (typically from the same dataset).
///
/// - `block` - the native block size of the bands, as
/// reported by the storage engine. Need not evenly divide
/// the raster dimensions.
///
/// - `max_pixels` - pixel budget per chunk. Zero means one
/// chunk per native block. Positive budgets accumulate
/// whole blocks (and whole block-rows) while the chunk area
/// stays within the budget; a chunk is never smaller than
/// one block even if that block alone exceeds it.
///
/// - `transform` - pixel-to-geo transform used for the
/// chunk bounding boxes; identity when the raster carries
/// no georeferencing.
#[derive(Clone, Debug, PartialEq)]
pub struct ChunkPlan {
    width: usize,
    height: usize,

    block_width: usize,
    block_height: usize,
    max_pixels: u64,

    transform: PixelTransform,
}

mod builder;
mod iters;

#[inline]
fn div_ceil(num: usize, den: usize) -> usize {
    (num + den - 1) / den
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sizes(plan: &ChunkPlan) -> Vec<RasterDims> {
        plan.chunks().iter().map(|c| c.size).collect()
    }

    /// Every pixel of the raster must be covered by exactly
    /// one chunk, and every chunk offset must sit on a
    /// block boundary.
    fn check_tiling(plan: &ChunkPlan) {
        let (width, height) = (plan.width(), plan.height());
        let (bw, bh) = plan.block_size();
        let mut covered = vec![0u8; width * height];

        for chunk in plan {
            let (x, y) = (chunk.offset.0 as usize, chunk.offset.1 as usize);
            assert_eq!(x % bw, 0, "offset not on block boundary: {:?}", chunk);
            assert_eq!(y % bh, 0, "offset not on block boundary: {:?}", chunk);
            for i in y..y + chunk.size.1 {
                for j in x..x + chunk.size.0 {
                    covered[i * width + j] += 1;
                }
            }
        }
        assert!(
            covered.iter().all(|&c| c == 1),
            "tiling has gaps or overlaps"
        );
    }

    #[test]
    fn one_chunk_per_block() {
        // 10x10 raster with 4x4 blocks: 3x3 block grid with
        // clipped sizes at the right/bottom edges.
        let plan = ChunkPlan::new((10, 10), (4, 4)).unwrap();
        assert_eq!(plan.block_grid(), (3, 3));
        assert_eq!(
            sizes(&plan),
            vec![
                (4, 4),
                (4, 4),
                (2, 4),
                (4, 4),
                (4, 4),
                (2, 4),
                (4, 2),
                (4, 2),
                (2, 2),
            ]
        );
        check_tiling(&plan);
    }

    #[test]
    fn budget_within_block_row() {
        // Budget of 20 pixels: a full block-row (40) does
        // not fit, so blocks accumulate within each row.
        let plan = ChunkPlan::new((10, 10), (4, 4)).unwrap().with_max_pixels(20);
        assert_eq!(
            sizes(&plan),
            vec![
                (4, 4),
                (4, 4),
                (2, 4),
                (4, 4),
                (4, 4),
                (2, 4),
                // final ragged row fits the budget whole
                (10, 2),
            ]
        );
        check_tiling(&plan);
    }

    #[test]
    fn budget_spans_block_rows() {
        // Budget of 50 pixels: one full block-row (40)
        // fits, but absorbing the next (80) would not.
        let plan = ChunkPlan::new((10, 10), (4, 4)).unwrap().with_max_pixels(50);
        assert_eq!(sizes(&plan), vec![(10, 4), (10, 4), (10, 2)]);
        check_tiling(&plan);
    }

    #[test]
    fn budget_absorbs_ragged_row() {
        // Budget equal to the raster area: all block-rows,
        // including the ragged final one, collapse into a
        // single chunk.
        let plan = ChunkPlan::new((10, 10), (4, 4)).unwrap().with_max_pixels(100);
        assert_eq!(sizes(&plan), vec![(10, 10)]);
        check_tiling(&plan);
    }

    #[test]
    fn oversized_block_still_emitted() {
        // A single block exceeds the budget; it is emitted
        // on its own rather than split.
        let plan = ChunkPlan::new((8, 8), (4, 4)).unwrap().with_max_pixels(3);
        assert!(sizes(&plan).iter().all(|&s| s == (4, 4)));
        assert_eq!(plan.chunks().len(), 4);
        check_tiling(&plan);
    }

    #[test]
    fn budget_respected() {
        for &max in &[1u64, 7, 16, 33, 64, 100, 1000] {
            let plan = ChunkPlan::new((37, 23), (16, 8)).unwrap().with_max_pixels(max);
            check_tiling(&plan);
            for chunk in &plan {
                let single_block = chunk.size.0 <= 16 && chunk.size.1 <= 8;
                assert!(
                    chunk.pixels() <= max || single_block,
                    "chunk {:?} exceeds budget {}",
                    chunk,
                    max
                );
            }
        }
    }

    #[test]
    fn chunk_grid_indices() {
        let plan = ChunkPlan::new((10, 10), (4, 4)).unwrap().with_max_pixels(20);
        let chunks = plan.chunks();
        // Rows of chunks are numbered consecutively, and
        // positions restart within each row.
        assert_eq!(chunks[0].chunk_x, 0);
        assert_eq!(chunks[0].chunk_y, 0);
        assert_eq!(chunks[2].chunk_x, 2);
        assert_eq!(chunks[2].chunk_y, 0);
        assert_eq!(chunks[3].chunk_x, 0);
        assert_eq!(chunks[3].chunk_y, 1);
        assert_eq!(chunks.last().unwrap().chunk_y, 2);
    }

    #[test]
    fn geo_bounds_per_chunk() {
        use crate::geometry::transform_from_gdal;
        let plan = ChunkPlan::new((10, 10), (4, 4))
            .unwrap()
            .with_transform(transform_from_gdal(&[100., 10., 0., 200., 0., -10.]));
        let chunks = plan.chunks();
        let b = &chunks[0].bounds;
        assert_eq!((b.min_x, b.max_x), (100., 140.));
        assert_eq!((b.min_y, b.max_y), (160., 200.));
        // Bottom-right chunk is clipped to 2x2 pixels.
        let b = &chunks.last().unwrap().bounds;
        assert_eq!((b.min_x, b.max_x), (180., 200.));
        assert_eq!((b.min_y, b.max_y), (100., 120.));
    }

    #[test]
    fn rejects_zero_dims() {
        assert!(ChunkPlan::new((0, 10), (4, 4)).is_err());
        assert!(ChunkPlan::new((10, 0), (4, 4)).is_err());
        assert!(ChunkPlan::new((10, 10), (0, 4)).is_err());
        assert!(ChunkPlan::new((10, 10), (4, 0)).is_err());
    }

    #[test]
    fn invalid_args_downcast() {
        use crate::CombineError;
        let err = ChunkPlan::new((0, 10), (4, 4)).unwrap_err();
        match err.downcast_ref::<CombineError>() {
            Some(CombineError::InvalidArgument(_)) => {}
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
