//! Overlay co-registered bands into a combination table.
//!
//! The engine streams any number of input bands in
//! lock-step, chunk by chunk, and assigns a stable
//! sequential id to each distinct tuple of integer pixel
//! values while tallying per-combination pixel counts.
//! Optionally the per-pixel id is materialized to an output
//! band using the same traversal, so peak memory is bounded
//! by the chunk budget plus the table of distinct
//! combinations.
//!
//! Floating point band values are truncated toward zero
//! before keying: `0.9` and `-0.9` both map to `0`, `1.5`
//! to `1`.

use std::collections::HashMap;

use anyhow::Context;
use ndarray::Array2;
use serde_derive::Serialize;

use crate::chunking::ChunkPlan;
use crate::reader::{ChunkReader, ChunkWriter};
use crate::{CombineError, Result};

/// Default pixel budget per chunk; bounds the working set
/// of one streaming step.
pub const DEFAULT_CHUNK_PIXELS: u64 = 0x10000;

/// One distinct combination of input values.
///
/// Ids are assigned in first-discovery order during the
/// streaming pass, starting at 1, with no gaps: the Nth
/// distinct tuple discovered receives id N.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CombinationRecord {
    /// Sequential id, stable within one run.
    pub id: u64,
    /// Number of pixels observed with this tuple.
    pub count: u64,
    /// The tuple of truncated values, one per input layer.
    pub values: Box<[i64]>,
}

/// Deduplicated table of value combinations.
///
/// Records are held in discovery order; [`sorted_records`]
/// gives the presentation order (ascending lexicographic by
/// values), in which ids are generally not contiguous.
///
/// [`sorted_records`]: CombinationTable::sorted_records
#[derive(Debug, Clone, Default)]
pub struct CombinationTable {
    layers: usize,
    index: HashMap<Box<[i64]>, usize>,
    records: Vec<CombinationRecord>,
    pixels: u64,
}

impl CombinationTable {
    /// An empty table for tuples of `layers` components.
    pub fn new(layers: usize) -> Self {
        CombinationTable {
            layers,
            ..Default::default()
        }
    }

    /// Record one pixel with the given tuple, returning its
    /// combination id. Inserts with the next sequential id
    /// on first encounter, increments the count otherwise.
    pub fn record(&mut self, key: &[i64]) -> u64 {
        debug_assert_eq!(key.len(), self.layers);
        self.pixels += 1;
        if let Some(&idx) = self.index.get(key) {
            self.records[idx].count += 1;
            return self.records[idx].id;
        }
        let id = self.records.len() as u64 + 1;
        self.index.insert(key.into(), self.records.len());
        self.records.push(CombinationRecord {
            id,
            count: 1,
            values: key.into(),
        });
        id
    }

    /// Id of the given tuple, if it has been observed.
    pub fn lookup(&self, key: &[i64]) -> Option<u64> {
        self.index.get(key).map(|&idx| self.records[idx].id)
    }

    /// Record for the given id.
    pub fn get(&self, id: u64) -> Option<&CombinationRecord> {
        self.records.get(id.checked_sub(1)? as usize)
    }

    /// Records in discovery (id) order.
    pub fn records(&self) -> &[CombinationRecord] {
        &self.records
    }

    /// Records sorted by ascending tuple value. This is the
    /// presentation order of the table; sort by `id` to
    /// recover discovery order.
    pub fn sorted_records(&self) -> Vec<&CombinationRecord> {
        let mut rows: Vec<_> = self.records.iter().collect();
        rows.sort_by(|a, b| a.values.cmp(&b.values));
        rows
    }

    /// Number of distinct combinations.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Tuple arity: one component per input layer.
    pub fn num_layers(&self) -> usize {
        self.layers
    }

    /// Total pixels recorded; equals the sum of all counts.
    pub fn total_count(&self) -> u64 {
        self.pixels
    }
}

/// Streams a set of co-registered layers into a
/// [`CombinationTable`].
///
/// Construction validates that all layers report identical
/// dimensions and geotransform, and derives the chunk
/// traversal plan from the first layer's native block size.
#[derive(Debug)]
pub struct Combiner<R: ChunkReader> {
    layers: Vec<R>,
    plan: ChunkPlan,
}

impl<R: ChunkReader> Combiner<R> {
    /// Validate the layers and build a combiner with the
    /// default chunk budget. Fails with
    /// [`CombineError::LayerMismatch`] when the layers
    /// disagree on dimensions or geotransform, or when no
    /// layer is given.
    pub fn new(layers: Vec<R>) -> Result<Self> {
        let first = layers
            .first()
            .ok_or_else(|| CombineError::LayerMismatch("no input layers".into()))?;

        let dims = first.size()?;
        let transform = first.geo_transform()?;
        for (i, layer) in layers.iter().enumerate().skip(1) {
            let size = layer.size()?;
            if size != dims {
                return Err(CombineError::LayerMismatch(format!(
                    "layer {} has dimensions {}x{}, expected {}x{}",
                    i, size.0, size.1, dims.0, dims.1
                ))
                .into());
            }
            if layer.geo_transform()? != transform {
                return Err(CombineError::LayerMismatch(format!(
                    "layer {} has a different geotransform",
                    i
                ))
                .into());
            }
        }

        let plan = ChunkPlan::new(dims, first.block_size()?)?
            .with_transform(crate::geometry::transform_from_gdal(&transform))
            .with_max_pixels(DEFAULT_CHUNK_PIXELS);
        Ok(Combiner { layers, plan })
    }

    /// Override the pixel budget per chunk. Zero streams
    /// one native block at a time.
    pub fn with_chunk_pixels(mut self, max_pixels: u64) -> Self {
        self.plan = self.plan.clone().with_max_pixels(max_pixels);
        self
    }

    pub fn plan(&self) -> &ChunkPlan {
        &self.plan
    }

    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }

    /// Number of chunks the streaming pass will visit.
    pub fn num_chunks(&self) -> usize {
        self.plan.chunks().len()
    }

    /// Run the streaming pass. When `output` is given, the
    /// combination id of every pixel is written there chunk
    /// by chunk; the output band must have the same
    /// dimensions as the inputs, and the caller is
    /// responsible for a data type wide enough for the
    /// maximum id (ids pass through `f64`, exact up to
    /// 2^53). On an I/O failure the pass aborts and a
    /// partially written output is left undefined.
    pub fn run(&self, output: Option<&mut dyn ChunkWriter>) -> Result<CombinationTable> {
        self.run_with_progress(output, |_, _| ())
    }

    /// Like [`run`][Combiner::run], invoking `progress`
    /// with `(chunks done, chunks total)` after each chunk.
    pub fn run_with_progress<F>(
        &self,
        mut output: Option<&mut dyn ChunkWriter>,
        mut progress: F,
    ) -> Result<CombinationTable>
    where
        F: FnMut(usize, usize),
    {
        let chunks = self.plan.chunks();
        let total = chunks.len();

        let mut table = CombinationTable::new(self.layers.len());
        let mut key = vec![0i64; self.layers.len()];

        for (done, chunk) in chunks.iter().enumerate() {
            let arrays = self
                .layers
                .iter()
                .enumerate()
                .map(|(i, layer)| {
                    layer
                        .read_chunk(chunk)
                        .with_context(|| format!("reading layer {} of chunk {:?}", i, chunk.offset))
                })
                .collect::<Result<Vec<Array2<f64>>>>()?;

            let (rows, cols) = arrays[0].dim();
            let mut ids = if output.is_some() {
                Some(Array2::<f64>::zeros((rows, cols)))
            } else {
                None
            };

            for i in 0..rows {
                for j in 0..cols {
                    for (k, arr) in arrays.iter().enumerate() {
                        // Truncation toward zero, as with
                        // integer casts.
                        key[k] = arr[(i, j)] as i64;
                    }
                    let id = table.record(&key);
                    if let Some(ids) = &mut ids {
                        ids[(i, j)] = id as f64;
                    }
                }
            }

            if let (Some(out), Some(ids)) = (output.as_mut(), ids) {
                out.write_window(chunk.offset, &ids)
                    .with_context(|| format!("writing ids of chunk {:?}", chunk.offset))?;
            }
            progress(done + 1, total);
        }

        Ok(table)
    }
}

/// Convenience wrapper: validate `layers`, stream with the
/// default chunk budget, and return the table.
pub fn combine<R: ChunkReader>(
    layers: Vec<R>,
    output: Option<&mut dyn ChunkWriter>,
) -> Result<CombinationTable> {
    Combiner::new(layers)?.run(output)
}
