//! Similarity source - personalization by reference photo.
//!
//! Given a user profile carrying a photo embedding, pulls an oversized
//! pool of nearest catalog items from the vector index. The pool is
//! bigger than the requested limit so the downstream filters can drop
//! items without starving the final ranking.

use crate::types::{Candidate, CandidateSource, UserProfile};
use crate::vector_index::VectorIndex;
use catalog::CatalogIndex;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Pool multiplier over the requested limit
const DEFAULT_POOL_FACTOR: usize = 5;

/// Generates candidates by embedding similarity to the user's photo.
#[derive(Clone)]
pub struct SimilaritySource {
    catalog: Arc<CatalogIndex>,
    index: Arc<VectorIndex>,
    pool_factor: usize,
}

impl SimilaritySource {
    pub fn new(catalog: Arc<CatalogIndex>, index: Arc<VectorIndex>) -> Self {
        Self {
            catalog,
            index,
            pool_factor: DEFAULT_POOL_FACTOR,
        }
    }

    /// Configure the pool multiplier (default: 5)
    pub fn with_pool_factor(mut self, factor: usize) -> Self {
        self.pool_factor = factor.max(1);
        self
    }

    /// Generate similarity candidates for a profile.
    ///
    /// Returns an empty set when the profile has no photo embedding.
    #[instrument(skip(self, profile))]
    pub fn get_candidates(&self, profile: &UserProfile, limit: usize) -> Vec<Candidate> {
        let Some(query) = profile.embedding.as_deref() else {
            debug!("profile has no photo embedding, skipping similarity source");
            return Vec::new();
        };

        let pool = self.index.search(query, limit * self.pool_factor);
        let mut candidates = Vec::with_capacity(pool.len());
        for (item_id, similarity) in pool {
            let Some(record) = self.catalog.get_embedding(item_id) else {
                continue;
            };
            let mut candidate = Candidate::new(
                item_id,
                CandidateSource::Similarity,
                similarity,
                record.style,
                record.confidence,
            );
            candidate.metadata.similarity = Some(similarity);
            candidates.push(candidate);
        }

        debug!(count = candidates.len(), "generated similarity candidates");
        candidates
    }
}
