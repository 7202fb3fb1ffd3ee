//! Filter to ensure minimum tagging quality.
//!
//! The style tagger assigns every item a softmax confidence; items the
//! tagger was unsure about make weak recommendations, so they are
//! dropped here.

use crate::traits::Filter;
use anyhow::Result;
use matcher::{Candidate, UserProfile};

/// Removes candidates below a tagger-confidence threshold.
pub struct MinConfidenceFilter {
    min_confidence: f32,
}

impl MinConfidenceFilter {
    /// Create a new MinConfidenceFilter.
    ///
    /// # Arguments
    /// * `min_confidence` - Minimum softmax confidence (typically 0.3)
    pub fn new(min_confidence: f32) -> Self {
        Self { min_confidence }
    }
}

impl Filter for MinConfidenceFilter {
    fn name(&self) -> &str {
        "MinConfidenceFilter"
    }

    fn apply(&self, candidates: Vec<Candidate>, _profile: &UserProfile) -> Result<Vec<Candidate>> {
        let filtered: Vec<Candidate> = candidates
            .into_iter()
            .filter(|candidate| candidate.confidence >= self.min_confidence)
            .collect();

        Ok(filtered)
    }
}
