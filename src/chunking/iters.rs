use crate::geometry::GeoBounds;

use super::{ChunkDescriptor, ChunkPlan};

impl ChunkPlan {
    fn descriptor(
        &self,
        chunk_x: usize,
        chunk_y: usize,
        offset: (usize, usize),
        size: (usize, usize),
    ) -> ChunkDescriptor {
        let offset = (offset.0 as isize, offset.1 as isize);
        ChunkDescriptor {
            chunk_x,
            chunk_y,
            offset,
            size,
            bounds: GeoBounds::of_window(&self.transform, offset, size),
        }
    }

    /// Width of the block at grid position `bx`, clipped to
    /// the raster edge.
    #[inline]
    fn block_width_at(&self, bx: usize) -> usize {
        self.block_width.min(self.width - bx * self.block_width)
    }

    /// Height of the block-row at grid position `by`,
    /// clipped to the raster edge.
    #[inline]
    fn block_height_at(&self, by: usize) -> usize {
        self.block_height.min(self.height - by * self.block_height)
    }

    /// Compute the traversal plan.
    ///
    /// Chunks are emitted in row-major order. With a zero
    /// budget each chunk is one native block; otherwise
    /// consecutive whole blocks (and, for full-width
    /// chunks, consecutive whole block-rows) are
    /// accumulated while the chunk area stays within
    /// `max_pixels`. A chunk never spans a partial block in
    /// either dimension, and is never smaller than one
    /// block.
    pub fn chunks(&self) -> Vec<ChunkDescriptor> {
        let (nbx, nby) = self.block_grid();
        let mut chunks = Vec::new();

        if self.max_pixels == 0 {
            for by in 0..nby {
                for bx in 0..nbx {
                    chunks.push(self.descriptor(
                        bx,
                        by,
                        (bx * self.block_width, by * self.block_height),
                        (self.block_width_at(bx), self.block_height_at(by)),
                    ));
                }
            }
            return chunks;
        }

        let max = self.max_pixels;
        let mut chunk_y = 0;
        let mut by = 0;
        while by < nby {
            let row_height = self.block_height_at(by);

            if self.width as u64 * row_height as u64 <= max {
                // The whole block-row fits: emit a
                // full-width chunk and absorb following
                // whole block-rows while the budget holds.
                let mut height = row_height;
                let mut rows = 1;
                while by + rows < nby {
                    let next = self.block_height_at(by + rows);
                    if self.width as u64 * (height + next) as u64 > max {
                        break;
                    }
                    height += next;
                    rows += 1;
                }
                chunks.push(self.descriptor(
                    0,
                    chunk_y,
                    (0, by * self.block_height),
                    (self.width, height),
                ));
                by += rows;
            } else {
                // Accumulate consecutive whole blocks
                // within this block-row.
                let mut chunk_x = 0;
                let mut bx = 0;
                while bx < nbx {
                    let mut width = self.block_width_at(bx);
                    let mut blocks = 1;
                    while bx + blocks < nbx {
                        let next = self.block_width_at(bx + blocks);
                        if (width + next) as u64 * row_height as u64 > max {
                            break;
                        }
                        width += next;
                        blocks += 1;
                    }
                    chunks.push(self.descriptor(
                        chunk_x,
                        chunk_y,
                        (bx * self.block_width, by * self.block_height),
                        (width, row_height),
                    ));
                    bx += blocks;
                    chunk_x += 1;
                }
                by += 1;
            }
            chunk_y += 1;
        }
        chunks
    }
}

impl<'a> IntoIterator for &'a ChunkPlan {
    type Item = ChunkDescriptor;
    type IntoIter = std::vec::IntoIter<ChunkDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.chunks().into_iter()
    }
}
