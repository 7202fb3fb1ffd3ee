//! Flat inner-product vector index.
//!
//! The catalog is small enough (a PoC-scale corpus) that an exact scan
//! beats any approximate structure: every query does a rayon-parallel dot
//! product against all stored vectors and keeps the top k. Vectors are
//! unit-normalized at build time, so inner product equals cosine
//! similarity.

use catalog::{CatalogIndex, ItemId};
use embedder::vector::{dot, normalize};
use rayon::prelude::*;
use tracing::{debug, instrument};

/// Exact nearest-neighbor index over all catalog embeddings.
pub struct VectorIndex {
    ids: Vec<ItemId>,
    vectors: Vec<Vec<f32>>,
    dimension: usize,
}

impl VectorIndex {
    /// Build the index from a loaded catalog.
    ///
    /// Rows are ordered by item id for determinism. Vectors are normalized
    /// again here so a hand-edited catalog can't break the cosine
    /// invariant.
    #[instrument(skip(catalog))]
    pub fn from_catalog(catalog: &CatalogIndex) -> Self {
        let mut rows: Vec<(ItemId, Vec<f32>)> = catalog
            .embeddings()
            .map(|r| (r.item_id, r.vector.clone()))
            .collect();
        rows.sort_unstable_by_key(|(id, _)| *id);

        let dimension = rows.first().map(|(_, v)| v.len()).unwrap_or(0);
        let mut ids = Vec::with_capacity(rows.len());
        let mut vectors = Vec::with_capacity(rows.len());
        for (id, mut vector) in rows {
            normalize(&mut vector);
            ids.push(id);
            vectors.push(vector);
        }

        debug!(rows = ids.len(), dimension, "built vector index");
        Self {
            ids,
            vectors,
            dimension,
        }
    }

    /// Top-k most similar items to the query, best first.
    ///
    /// The query is normalized on the way in. Returns fewer than k results
    /// when the index is smaller than k.
    pub fn search(&self, query: &[f32], k: usize) -> Vec<(ItemId, f32)> {
        if self.ids.is_empty() || k == 0 {
            return Vec::new();
        }
        let mut q = query.to_vec();
        normalize(&mut q);

        let mut scored: Vec<(ItemId, f32)> = self
            .vectors
            .par_iter()
            .zip(self.ids.par_iter())
            .map(|(v, id)| (*id, dot(&q, v)))
            .collect();

        scored.sort_unstable_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);
        scored
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Embedding dimension (0 for an empty index)
    pub fn dimension(&self) -> usize {
        self.dimension
    }
}
