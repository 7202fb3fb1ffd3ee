//! Scoring stage: blends similarity with trend velocity.
//!
//! The composer turns filtered candidates into a final ranking. Each
//! candidate keeps its source's base score and gets a boost
//! proportional to the latest positive velocity of its style; a
//! declining style never subtracts from the score.

use matcher::{Candidate, CandidateSource};
use catalog::Style;
use rayon::prelude::*;
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Default weight of the velocity boost relative to the base score
pub const DEFAULT_VELOCITY_WEIGHT: f32 = 0.25;

/// A candidate with its final composed score.
#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    pub candidate: Candidate,
    pub score: f32,
}

/// Composes final scores from base scores and per-style velocities.
#[derive(Clone)]
pub struct TrendComposer {
    velocities: HashMap<Style, f32>,
    velocity_weight: f32,
}

impl TrendComposer {
    /// Create a composer from the latest per-style velocities.
    pub fn new(velocities: HashMap<Style, f32>) -> Self {
        Self {
            velocities,
            velocity_weight: DEFAULT_VELOCITY_WEIGHT,
        }
    }

    /// Configure the velocity weight (default: 0.25)
    pub fn with_velocity_weight(mut self, weight: f32) -> Self {
        self.velocity_weight = weight;
        self
    }

    /// Score all candidates in parallel.
    ///
    /// Trending candidates already carry velocity in their base score,
    /// so only similarity candidates receive the boost. The velocity is
    /// recorded in the candidate metadata either way so callers can
    /// explain the ranking.
    #[instrument(skip(self, candidates))]
    pub fn compose(&self, candidates: Vec<Candidate>) -> Vec<ScoredCandidate> {
        let scored: Vec<ScoredCandidate> = candidates
            .into_par_iter()
            .map(|mut candidate| {
                let velocity = self
                    .velocities
                    .get(&candidate.style)
                    .copied()
                    .unwrap_or(0.0);
                let score = match candidate.source {
                    CandidateSource::Similarity => {
                        candidate.base_score + self.velocity_weight * velocity.max(0.0)
                    }
                    CandidateSource::Trending => candidate.base_score,
                };
                candidate.metadata.velocity = Some(velocity);
                ScoredCandidate { candidate, score }
            })
            .collect();

        debug!(count = scored.len(), "composed candidate scores");
        scored
    }

    /// Sort scored candidates best-first and keep the top `limit`.
    pub fn rank(mut scored: Vec<ScoredCandidate>, limit: usize) -> Vec<ScoredCandidate> {
        scored.sort_unstable_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(limit);
        scored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use matcher::CandidateSource;

    #[test]
    fn test_velocity_boost_reorders_similarity_candidates() {
        let velocities = HashMap::from([(Style::Grunge, 2.0), (Style::Formal, 0.0)]);
        let composer = TrendComposer::new(velocities);

        let candidates = vec![
            Candidate::new(0, CandidateSource::Similarity, 0.80, Style::Formal, 0.9),
            Candidate::new(1, CandidateSource::Similarity, 0.75, Style::Grunge, 0.9),
        ];

        let ranked = TrendComposer::rank(composer.compose(candidates), 10);
        // 0.75 + 0.25 * 2.0 = 1.25 beats 0.80
        assert_eq!(ranked[0].candidate.item_id, 1);
        assert!((ranked[0].score - 1.25).abs() < 1e-6);
        assert_eq!(ranked[0].candidate.metadata.velocity, Some(2.0));
    }

    #[test]
    fn test_negative_velocity_is_clamped() {
        let velocities = HashMap::from([(Style::Vintage, -5.0)]);
        let composer = TrendComposer::new(velocities);

        let candidates = vec![Candidate::new(
            0,
            CandidateSource::Similarity,
            0.6,
            Style::Vintage,
            0.9,
        )];
        let scored = composer.compose(candidates);
        assert!((scored[0].score - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_trending_base_score_is_not_boosted_twice() {
        let velocities = HashMap::from([(Style::Streetwear, 3.0)]);
        let composer = TrendComposer::new(velocities);

        let candidates = vec![Candidate::new(
            0,
            CandidateSource::Trending,
            3.7,
            Style::Streetwear,
            0.7,
        )];
        let scored = composer.compose(candidates);
        assert!((scored[0].score - 3.7).abs() < 1e-6);
        assert_eq!(scored[0].candidate.metadata.velocity, Some(3.0));
    }

    #[test]
    fn test_rank_truncates() {
        let composer = TrendComposer::new(HashMap::new());
        let candidates = (0..10)
            .map(|i| {
                Candidate::new(
                    i,
                    CandidateSource::Similarity,
                    i as f32 / 10.0,
                    Style::Minimalist,
                    0.9,
                )
            })
            .collect();

        let ranked = TrendComposer::rank(composer.compose(candidates), 3);
        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].candidate.item_id, 9);
    }
}
